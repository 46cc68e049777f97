//! Visibility graph construction: node population (waypoints, obstacle
//! octagon samples, drop/off-axis targets) and edge filtering (climb-slope
//! feasibility, fly-zone containment, obstacle avoidance).

use std::f64::consts::PI;

use crate::error::{PlanError, PlanResult};
use crate::geometry::{Cylinder, Point2, Point3, Segment3};
use crate::world::MissionWorld;

const OCTAGON_SAMPLES: usize = 8;

/// The visibility graph: an arena of node coordinates plus an adjacency
/// list, built once and never mutated afterward. Node indices are stable —
/// waypoint `i` always occupies node index `i`.
#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    pub nodes: Vec<Point3>,
    adjacency: Vec<Vec<(usize, f64)>>,
    pub waypoint_node_count: usize,
    pub drop_node: Option<usize>,
    pub off_axis_node: Option<usize>,
}

impl VisibilityGraph {
    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.adjacency[node]
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].iter().any(|&(n, _)| n == b)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|adj| adj.len()).sum::<usize>() / 2
    }
}

/// Builds the visibility graph from a fully-populated [`MissionWorld`].
pub fn build_graph(world: &MissionWorld) -> PlanResult<VisibilityGraph> {
    let ring = world.boundary_ring()?.clone();
    let config = world.config();

    let mut nodes: Vec<Point3> = world.waypoints.iter().map(|w| w.point).collect();
    let waypoint_node_count = nodes.len();

    for obstacle in &world.obstacles {
        let clearance = obstacle.radius_m + config.obstacle_sample_clearance_m;
        let alt_min = world.alt_bounds().min_ft;
        let mut z = alt_min;
        while z < obstacle.height_ft {
            for j in 0..OCTAGON_SAMPLES {
                let angle = 2.0 * PI * (j as f64) / (OCTAGON_SAMPLES as f64);
                let x = clearance * angle.cos() + obstacle.center.x;
                let y = clearance * angle.sin() + obstacle.center.y;
                let sample = Point2::new(x, y);
                if ring.contains(sample) {
                    nodes.push(Point3::new(x, y, z));
                }
            }
            z += config.obstacle_altitude_step_ft;
        }
    }

    let drop_node = world.drop.map(|p| {
        nodes.push(p);
        nodes.len() - 1
    });
    let off_axis_node = world.off_axis_optimal.map(|p| {
        nodes.push(p);
        nodes.len() - 1
    });

    let cylinders: Vec<Cylinder> = world
        .obstacles
        .iter()
        .map(|o| Cylinder::new(o.center, o.radius_m, world.alt_bounds().min_ft, o.height_ft))
        .collect();

    let n = nodes.len();
    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let slope_cutoff = config.slope_cutoff;

    for i in 0..n {
        for j in (i + 1)..n {
            let a = nodes[i];
            let b = nodes[j];
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let dz = b.z - a.z;

            let slope_xz = if dx != 0.0 { (dz / dx).abs() } else { 2.0 };
            let slope_yz = if dy != 0.0 { (dz / dy).abs() } else { 2.0 };
            if slope_xz >= slope_cutoff && slope_yz >= slope_cutoff {
                continue;
            }

            let seg = Segment3::new(a, b);
            // Always run the boundary/obstacle check, even with zero
            // obstacles — the source unconditionally added the edge first
            // in that case, which is a bug (see spec §4.4/§9).
            let mut blocked = ring.intersects_segment(seg);
            if !blocked {
                for cylinder in &cylinders {
                    if cylinder.intersects_segment(seg) {
                        blocked = true;
                        break;
                    }
                }
            }
            if blocked {
                continue;
            }

            let weight = a.distance(b);
            adjacency[i].push((j, weight));
            adjacency[j].push((i, weight));
        }
    }

    // Deterministic neighbour iteration order: sort each node's adjacency
    // list by the neighbour's coordinates.
    for (i, adj) in adjacency.iter_mut().enumerate() {
        let base = nodes[i];
        adj.sort_by(|&(a, _), &(b, _)| {
            let pa = nodes[a];
            let pb = nodes[b];
            coordinate_key(base, pa)
                .partial_cmp(&coordinate_key(base, pb))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    if nodes.is_empty() {
        return Err(PlanError::InvalidMission(
            "mission produced no graph nodes".into(),
        ));
    }

    Ok(VisibilityGraph {
        nodes,
        adjacency,
        waypoint_node_count,
        drop_node,
        off_axis_node,
    })
}

/// A sort key over a neighbour's absolute coordinates, for deterministic
/// tie-breaking independent of arrival order.
fn coordinate_key(_base: Point3, p: Point3) -> (f64, f64, f64) {
    (p.x, p.y, p.z)
}
