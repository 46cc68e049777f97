//! Mission CLI - command-line front end for the waypoint path planner.
//!
//! Reads a mission file, plans a path, prints it, and optionally writes the
//! augmented mission (with an `autogenPoints` array) back to disk.

mod mission_file;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mission_core::{
    AltitudeBounds, GeoRecord, MissionWorld, ObstacleRecord, Origin, PlanError,
};

use mission_file::{AutogenPoint, MissionFile};

/// Plan a 3-D waypoint path for a fixed-wing mission.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the mission JSON file.
    #[arg(long)]
    file: String,

    /// Integrate the air-drop target into the tour, if present.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    drop: bool,

    /// Integrate the off-axis imaging target into the tour, if present.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    off: bool,

    /// Route around stationary obstacles.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    obstacles: bool,

    /// Nominal upload target for the planned path (never dialed).
    #[arg(long, default_value = "127.0.0.1:5760")]
    ip: String,

    /// Write the augmented mission (with `autogenPoints`) to this path.
    #[arg(long)]
    out: Option<String>,
}

fn plan_error_exit_code(err: &PlanError) -> u8 {
    match err {
        PlanError::InvalidMission(_) => 2,
        PlanError::OutOfBounds(_) => 3,
        PlanError::InfeasibleSlope(_, _) => 4,
        PlanError::NoRouteBetweenWaypoints(_, _) => 5,
        PlanError::ProjectionError(_) => 6,
    }
}

fn run(args: Args) -> Result<Vec<AutogenPoint>> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("reading mission file {}", args.file))?;
    let mission: MissionFile =
        serde_json::from_str(&raw).with_context(|| format!("parsing mission file {}", args.file))?;

    let fly_zone = mission
        .fly_zones
        .first()
        .context("mission file has no flyZones entry")?;

    let origin = Origin {
        latitude: mission.lost_comms_pos.latitude,
        longitude: mission.lost_comms_pos.longitude,
    };
    let alt_bounds = AltitudeBounds {
        min_ft: fly_zone.altitude_min,
        max_ft: fly_zone.altitude_max,
    };

    let mut world = MissionWorld::new(origin, alt_bounds);

    let boundary: Vec<GeoRecord> = fly_zone
        .boundary_points
        .iter()
        .map(|p| GeoRecord::new(p.latitude, p.longitude, 0.0))
        .collect();
    world.add_boundaries(&boundary)?;
    tracing::info!(count = boundary.len(), "loaded fly-zone boundary");

    let waypoints: Vec<GeoRecord> = mission
        .waypoints
        .iter()
        .map(|w| GeoRecord::new(w.latitude, w.longitude, w.altitude))
        .collect();
    world.add_waypoints(&waypoints)?;
    tracing::info!(count = waypoints.len(), "loaded waypoints");

    if args.obstacles && !mission.stationary_obstacles.is_empty() {
        let obstacles: Vec<ObstacleRecord> = mission
            .stationary_obstacles
            .iter()
            .map(|o| ObstacleRecord {
                latitude: o.latitude,
                longitude: o.longitude,
                radius_ft: o.radius,
                height_ft: o.height,
            })
            .collect();
        world.add_obstacles(&obstacles)?;
        tracing::info!(count = obstacles.len(), "loaded obstacles");
    }

    if args.drop {
        if let Some(drop) = mission.air_drop_pos {
            world.add_drop(GeoRecord::new(drop.latitude, drop.longitude, 0.0))?;
            tracing::info!("loaded air-drop target");
        }
    }

    if args.off {
        if let Some(off_axis) = mission.off_axis_odlc_pos {
            world.add_off_axis(GeoRecord::new(off_axis.latitude, off_axis.longitude, 0.0))?;
            tracing::info!("loaded off-axis target");
        }
    }

    tracing::info!(target = %args.ip, "planning path for upload target");
    let path = mission_core::plan_mission(&mut world)?;

    let geo = path.path_lat_lon_alt(&world);
    Ok(geo
        .into_iter()
        .map(|(latitude, longitude, altitude)| AutogenPoint {
            latitude,
            longitude,
            altitude,
        })
        .collect())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let file = args.file.clone();
    let out = args.out.clone();

    match run(args) {
        Ok(autogen) => {
            for point in &autogen {
                println!(
                    "{:.6}, {:.6}, {:.1} ft",
                    point.latitude, point.longitude, point.altitude
                );
            }
            if let Some(out_path) = out {
                if let Err(err) = write_output(&file, &out_path, autogen) {
                    eprintln!("failed to write output: {err:#}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("mission planning failed: {err:#}");
            if let Some(plan_err) = err.downcast_ref::<PlanError>() {
                return ExitCode::from(plan_error_exit_code(plan_err));
            }
            ExitCode::FAILURE
        }
    }
}

fn write_output(file: &str, out_path: &str, autogen: Vec<AutogenPoint>) -> Result<()> {
    let raw = fs::read_to_string(file).with_context(|| format!("re-reading mission file {file}"))?;
    let mut mission: MissionFile = serde_json::from_str(&raw)?;
    mission.autogen_points = Some(autogen);
    let serialized = serde_json::to_string_pretty(&mission)?;
    fs::write(out_path, serialized).with_context(|| format!("writing output to {out_path}"))?;
    tracing::info!(path = %out_path, "wrote augmented mission");
    Ok(())
}
