//! Pure planning logic for a 3-D fixed-wing waypoint mission: geodetic
//! projection, visibility-graph construction, and A* path search.
//!
//! This crate has no I/O or logging dependencies of its own — it is
//! consumed by a thin binary shell that owns mission-file parsing,
//! configuration, and process-level concerns.

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod graph;
pub mod planner;
pub mod world;

pub use config::PlannerConfig;
pub use error::{PlanError, PlanResult, WaypointIndex};
pub use frame::{Frame, Origin};
pub use geometry::{Cylinder, Path3, Point2, Point3, Ring, Segment3};
pub use graph::{build_graph, VisibilityGraph};
pub use planner::{plan_path, Path};
pub use world::{AltitudeBounds, GeoRecord, MissionWorld, Obstacle, ObstacleRecord, Waypoint};

/// Runs the full pipeline over an already-populated [`MissionWorld`]:
/// builds the visibility graph, then plans the waypoint tour with
/// drop/off-axis detour integration.
pub fn plan_mission(world: &mut MissionWorld) -> PlanResult<Path> {
    let graph = build_graph(world)?;
    plan_path(world, &graph)
}
