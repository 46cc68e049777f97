//! A* path search over the visibility graph, waypoint-tour orchestration,
//! and drop/off-axis detour integration.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{PlanError, PlanResult};
use crate::geometry::{Path3, Point3};
use crate::graph::VisibilityGraph;
use crate::world::MissionWorld;

/// Total ordering wrapper over `f64` so it can sit in a `BinaryHeap`.
#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for FloatOrd {}
impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    node: usize,
    g_score: FloatOrd,
    f_score: FloatOrd,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.g_score == other.g_score && self.f_score == other.f_score
    }
}
impl Eq for OpenNode {}
impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OpenNode {
    // `BinaryHeap` is a max-heap; invert so the lowest f-score (then
    // g-score, then node index for a deterministic tie-break) pops first
    // via `Reverse` at the call site.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// The 3-D octile distance heuristic: admissible and consistent, since it
/// never exceeds the true Euclidean distance between `a` and `b`.
fn octile_heuristic(a: Point3, b: Point3) -> f64 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let dz = (a.z - b.z).abs();
    let mut d = [dx, dy, dz];
    d.sort_by(|l, r| l.partial_cmp(r).unwrap_or(Ordering::Equal));
    let (dmin, dmid, dmax) = (d[0], d[1], d[2]);

    let straight = 1.0;
    let diag2 = std::f64::consts::SQRT_2;
    let diag3 = 3.0_f64.sqrt();

    (diag3 - diag2) * dmin + (diag2 - straight) * dmid + dmax * diag2
}

/// Runs A* between two node indices in the graph, returning the node-index
/// path (inclusive of both endpoints) or `None` if unreachable.
fn astar(graph: &VisibilityGraph, start: usize, goal: usize) -> Option<Vec<usize>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<usize, f64> = HashMap::new();
    let mut came_from: HashMap<usize, usize> = HashMap::new();
    let mut closed: std::collections::HashSet<usize> = std::collections::HashSet::new();

    g_score.insert(start, 0.0);
    open.push(OpenNode {
        node: start,
        g_score: FloatOrd(0.0),
        f_score: FloatOrd(octile_heuristic(graph.nodes[start], graph.nodes[goal])),
    });

    while let Some(current) = open.pop() {
        if current.node == goal {
            let mut path = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = came_from.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Some(path);
        }
        if closed.contains(&current.node) {
            continue;
        }
        closed.insert(current.node);

        let best_g = *g_score.get(&current.node).unwrap_or(&f64::INFINITY);
        for &(neighbor, weight) in graph.neighbors(current.node) {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative_g = best_g + weight;
            if tentative_g < *g_score.get(&neighbor).unwrap_or(&f64::INFINITY) {
                g_score.insert(neighbor, tentative_g);
                came_from.insert(neighbor, current.node);
                let h = octile_heuristic(graph.nodes[neighbor], graph.nodes[goal]);
                open.push(OpenNode {
                    node: neighbor,
                    g_score: FloatOrd(tentative_g),
                    f_score: FloatOrd(tentative_g + h),
                });
            }
        }
    }
    None
}

fn astar_length(graph: &VisibilityGraph, start: usize, goal: usize) -> Option<f64> {
    let path = astar(graph, start, goal)?;
    let mut total = 0.0;
    for w in path.windows(2) {
        let (a, b) = (w[0], w[1]);
        let weight = graph
            .neighbors(a)
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, w)| w)
            .expect("adjacent path nodes must share an edge");
        total += weight;
    }
    Some(total)
}

/// The planned path: an ordered sequence of graph nodes.
#[derive(Debug, Clone)]
pub struct Path {
    pub nodes: Vec<Point3>,
}

impl Path {
    /// Inverts the projection on each node's `(x, y)`, preserving `z` as
    /// altitude in feet.
    pub fn path_lat_lon_alt(&self, world: &MissionWorld) -> Vec<(f64, f64, f64)> {
        let frame = world.frame();
        self.nodes
            .iter()
            .map(|p| {
                let (lat, lon) = frame.reverse(p.x, p.y);
                (lat, lon, p.z)
            })
            .collect()
    }
}

/// Runs the full planning pipeline: builds the waypoint tour, then
/// integrates the drop and off-axis targets per §4.5.
pub fn plan_path(world: &mut MissionWorld, graph: &VisibilityGraph) -> PlanResult<Path> {
    if world.waypoints.is_empty() {
        return Err(PlanError::InvalidMission("mission has no waypoints".into()));
    }
    if world.waypoints.len() == 1 {
        return Ok(Path {
            nodes: vec![world.waypoints[0].point],
        });
    }

    let slope_cutoff = world.config().slope_cutoff;
    let mut path_nodes: Vec<usize> = Vec::new();
    for i in 0..world.waypoints.len() - 1 {
        let start = i;
        let goal = i + 1;

        // A direct edge between these two waypoints would be rejected by
        // the slope filter regardless of obstacles or boundary — report
        // the specific cause rather than a generic unreachability.
        let a = graph.nodes[start];
        let b = graph.nodes[goal];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let dz = b.z - a.z;
        let slope_xz = if dx != 0.0 { (dz / dx).abs() } else { 2.0 };
        let slope_yz = if dy != 0.0 { (dz / dy).abs() } else { 2.0 };
        if slope_xz >= slope_cutoff && slope_yz >= slope_cutoff && !graph.has_edge(start, goal) {
            let detour_exists = astar(graph, start, goal).is_some();
            if !detour_exists {
                return Err(PlanError::InfeasibleSlope(i, i + 1));
            }
        }

        let segment = astar(graph, start, goal)
            .ok_or(PlanError::NoRouteBetweenWaypoints(i, i + 1))?;
        if i == 0 {
            path_nodes.extend(segment);
        } else {
            path_nodes.extend(&segment[1..]);
        }
    }

    let mut off_axis_satisfied = world.off_axis_optimal.is_none();
    let mut drop_satisfied = world.drop.is_none();
    let off_axis_ratio = world.config().off_axis_satisfied_ratio;
    let drop_radius = world.config().drop_satisfied_radius_ft;
    let off_axis_raw = world.off_axis;
    let drop_raw = world.drop;

    {
        let polyline = Path3::new(path_nodes.iter().map(|&n| graph.nodes[n]).collect());

        if let Some(off_axis) = off_axis_raw {
            let q = polyline.project_and_interpolate(off_axis);
            let horizontal_dist = q.horizontal_distance(off_axis);
            if horizontal_dist > 0.0 && q.z / horizontal_dist > off_axis_ratio {
                off_axis_satisfied = true;
                // Relocate the stored optimal viewing point to where the
                // tour already satisfies the camera cone, per §4.5 step 2.
                world.off_axis_optimal = Some(q);
            }
        }

        if let Some(drop_target) = drop_raw {
            let q = polyline.project_and_interpolate(drop_target);
            let horizontal_dist = q.horizontal_distance(drop_target);
            if horizontal_dist < drop_radius {
                drop_satisfied = true;
                // Relocate the stored drop to the point on the tour that
                // already satisfies it, per §4.5 step 3.
                world.drop = Some(q);
            }
        }
    }

    let tail = *path_nodes.last().expect("tour always has at least one node");
    let mut trailing: Vec<usize> = Vec::new();

    match (off_axis_satisfied, drop_satisfied) {
        (true, true) => {}
        (false, true) => {
            let off_node = graph
                .off_axis_node
                .expect("off-axis node must exist when off-axis is unsatisfied");
            let seg = astar(graph, tail, off_node)
                .ok_or(PlanError::NoRouteBetweenWaypoints(world.waypoints.len() - 1, off_node))?;
            trailing.extend(&seg[1..]);
        }
        (true, false) => {
            let drop_node = graph
                .drop_node
                .expect("drop node must exist when drop is unsatisfied");
            let seg = astar(graph, tail, drop_node)
                .ok_or(PlanError::NoRouteBetweenWaypoints(world.waypoints.len() - 1, drop_node))?;
            trailing.extend(&seg[1..]);
        }
        (false, false) => {
            let off_node = graph.off_axis_node.expect("off-axis node must exist");
            let drop_node = graph.drop_node.expect("drop node must exist");

            let off_first_len = astar_length(graph, tail, off_node);
            let drop_first_len = astar_length(graph, tail, drop_node);

            let off_first = match (off_first_len, drop_first_len) {
                (Some(a), Some(b)) => a < b,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => {
                    return Err(PlanError::NoRouteBetweenWaypoints(
                        world.waypoints.len() - 1,
                        off_node,
                    ))
                }
            };

            if off_first {
                let first = astar(graph, tail, off_node)
                    .ok_or(PlanError::NoRouteBetweenWaypoints(world.waypoints.len() - 1, off_node))?;
                trailing.extend(&first[1..]);
                let tail2 = *trailing.last().unwrap();
                let second = astar(graph, tail2, drop_node)
                    .ok_or(PlanError::NoRouteBetweenWaypoints(off_node, drop_node))?;
                trailing.extend(&second[1..]);
            } else {
                let first = astar(graph, tail, drop_node)
                    .ok_or(PlanError::NoRouteBetweenWaypoints(world.waypoints.len() - 1, drop_node))?;
                trailing.extend(&first[1..]);
                let tail2 = *trailing.last().unwrap();
                let second = astar(graph, tail2, off_node)
                    .ok_or(PlanError::NoRouteBetweenWaypoints(drop_node, off_node))?;
                trailing.extend(&second[1..]);
            }
        }
    }

    path_nodes.extend(trailing);

    Ok(Path {
        nodes: path_nodes.into_iter().map(|n| graph.nodes[n]).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Origin;
    use crate::graph::build_graph;
    use crate::world::{AltitudeBounds, GeoRecord, MissionWorld, ObstacleRecord};

    fn origin() -> Origin {
        Origin {
            latitude: 38.145,
            longitude: -76.428,
        }
    }

    fn square_bounds() -> Vec<GeoRecord> {
        vec![
            GeoRecord::new(38.140, -76.433, 0.0),
            GeoRecord::new(38.140, -76.423, 0.0),
            GeoRecord::new(38.150, -76.423, 0.0),
            GeoRecord::new(38.150, -76.433, 0.0),
        ]
    }

    #[test]
    fn octile_heuristic_is_admissible() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert!(octile_heuristic(a, b) <= a.distance(b) + 1e-9);
    }

    #[test]
    fn single_waypoint_path_is_that_waypoint() {
        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&square_bounds()).unwrap();
        world
            .add_waypoints(&[GeoRecord::new(38.145, -76.428, 200.0)])
            .unwrap();
        let graph = build_graph(&world).unwrap();
        let path = plan_path(&mut world, &graph).unwrap();
        assert_eq!(path.nodes.len(), 1);
    }

    #[test]
    fn two_waypoints_no_obstacles_direct_path() {
        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&square_bounds()).unwrap();
        world
            .add_waypoints(&[
                GeoRecord::new(38.1455, -76.4275, 200.0),
                GeoRecord::new(38.1460, -76.4270, 200.0),
            ])
            .unwrap();
        let graph = build_graph(&world).unwrap();
        let path = plan_path(&mut world, &graph).unwrap();
        assert_eq!(path.nodes.len(), 2);
    }

    #[test]
    fn obstacle_on_direct_line_forces_detour() {
        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&square_bounds()).unwrap();
        world
            .add_waypoints(&[
                GeoRecord::new(38.1455, -76.4275, 200.0),
                GeoRecord::new(38.1460, -76.4270, 200.0),
            ])
            .unwrap();
        world
            .add_obstacles(&[ObstacleRecord {
                latitude: 38.14575,
                longitude: -76.42725,
                radius_ft: 300.0,
                height_ft: 750.0,
            }])
            .unwrap();
        let graph = build_graph(&world).unwrap();
        let path = plan_path(&mut world, &graph).unwrap();
        assert!(path.nodes.len() >= 3);

        let cyl_center_xy = {
            let frame = world.frame();
            let (x, y) = frame.forward(38.14575, -76.42725);
            crate::geometry::Point2::new(x, y)
        };
        let radius_m = world.config().feet_to_meters(300.0);
        for node in &path.nodes {
            assert!(node.xy().distance(cyl_center_xy) >= radius_m - 1e-6);
        }
    }

    #[test]
    fn infeasible_slope_between_waypoints_with_no_detour_available() {
        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&square_bounds()).unwrap();
        // A waypoint pair separated by a vertical jump too steep on both
        // axes for any direct edge, with no obstacle nodes to detour via.
        world
            .add_waypoints(&[
                GeoRecord::new(38.1455, -76.4275, 10.0),
                GeoRecord::new(38.14551, -76.42751, 400.0),
            ])
            .unwrap();
        let graph = build_graph(&world).unwrap();
        let result = plan_path(&mut world, &graph);
        assert!(matches!(result, Err(PlanError::InfeasibleSlope(0, 1))));
    }

    #[test]
    fn no_route_between_waypoints_when_boundary_blocks_every_edge() {
        // A square fly-zone with a deep notch cut from its top middle,
        // leaving two disconnected "towers" joined only by a base strip.
        // With no obstacles to contribute detour nodes, a waypoint in each
        // tower has no surviving edge at all.
        let frame = crate::frame::Frame::new(origin());
        let notch = vec![
            (-50.0, -50.0),
            (50.0, -50.0),
            (50.0, 50.0),
            (20.0, 50.0),
            (20.0, -20.0),
            (-20.0, -20.0),
            (-20.0, 50.0),
            (-50.0, 50.0),
        ];
        let boundary: Vec<GeoRecord> = notch
            .iter()
            .map(|&(x, y)| {
                let (lat, lon) = frame.reverse(x, y);
                GeoRecord::new(lat, lon, 0.0)
            })
            .collect();

        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&boundary).unwrap();

        let (lat_a, lon_a) = frame.reverse(-35.0, 40.0);
        let (lat_b, lon_b) = frame.reverse(35.0, 40.0);
        world
            .add_waypoints(&[
                GeoRecord::new(lat_a, lon_a, 200.0),
                GeoRecord::new(lat_b, lon_b, 200.0),
            ])
            .unwrap();

        let graph = build_graph(&world).unwrap();
        assert_eq!(graph.edge_count(), 0);
        let result = plan_path(&mut world, &graph);
        assert!(matches!(
            result,
            Err(PlanError::NoRouteBetweenWaypoints(0, 1))
        ));
    }

    /// A large square (±2000m) fly-zone, big enough that detour targets
    /// placed hundreds of metres from the tour still land inside it.
    fn large_square_bounds(frame: &crate::frame::Frame) -> Vec<GeoRecord> {
        let corners = [
            (-2000.0, -2000.0),
            (2000.0, -2000.0),
            (2000.0, 2000.0),
            (-2000.0, 2000.0),
        ];
        corners
            .iter()
            .map(|&(x, y)| {
                let (lat, lon) = frame.reverse(x, y);
                GeoRecord::new(lat, lon, 0.0)
            })
            .collect()
    }

    #[test]
    fn off_axis_pre_satisfied_relocates_optimal_point_and_appends_nothing() {
        let frame = crate::frame::Frame::new(origin());
        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&large_square_bounds(&frame)).unwrap();

        let (lat_a, lon_a) = frame.reverse(0.0, 0.0);
        let (lat_b, lon_b) = frame.reverse(500.0, 0.0);
        world
            .add_waypoints(&[
                GeoRecord::new(lat_a, lon_a, 200.0),
                GeoRecord::new(lat_b, lon_b, 200.0),
            ])
            .unwrap();

        // Close enough to the tour line that the camera cone already
        // covers it: tour altitude 200ft over a ~1m horizontal offset.
        let (off_lat, off_lon) = frame.reverse(250.0, 1.0);
        world
            .add_off_axis(GeoRecord::new(off_lat, off_lon, 0.0))
            .unwrap();

        let graph = build_graph(&world).unwrap();
        let path = plan_path(&mut world, &graph).unwrap();

        assert_eq!(path.nodes.len(), 2, "no off-axis detour should be appended");
        let optimal = world
            .off_axis_optimal
            .expect("optimal viewing point stays set once satisfied");
        assert!(
            (optimal.z - 200.0).abs() < 1e-6,
            "relocated optimal point should sit on the tour at its altitude, got {optimal:?}"
        );
        assert!(
            (optimal.x - 250.0).abs() < 1e-6 && optimal.y.abs() < 1e-6,
            "relocated optimal point should be the tour projection, got {optimal:?}"
        );
    }

    #[test]
    fn drop_pre_satisfied_relocates_drop_and_appends_nothing() {
        let frame = crate::frame::Frame::new(origin());
        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&large_square_bounds(&frame)).unwrap();

        let (lat_a, lon_a) = frame.reverse(0.0, 0.0);
        let (lat_b, lon_b) = frame.reverse(500.0, 0.0);
        world
            .add_waypoints(&[
                GeoRecord::new(lat_a, lon_a, 200.0),
                GeoRecord::new(lat_b, lon_b, 200.0),
            ])
            .unwrap();

        // 5m off the tour line, well inside the 15ft satisfaction radius.
        let (drop_lat, drop_lon) = frame.reverse(250.0, 5.0);
        world
            .add_drop(GeoRecord::new(drop_lat, drop_lon, 0.0))
            .unwrap();

        let graph = build_graph(&world).unwrap();
        let path = plan_path(&mut world, &graph).unwrap();

        assert_eq!(path.nodes.len(), 2, "no drop detour should be appended");
        let resolved = world.drop.expect("drop stays set once satisfied");
        assert!(
            (resolved.z - 200.0).abs() < 1e-6,
            "relocated drop should sit on the tour at its altitude, got {resolved:?}"
        );
        assert!(
            (resolved.x - 250.0).abs() < 1e-6 && resolved.y.abs() < 1e-6,
            "relocated drop should be the tour projection, got {resolved:?}"
        );
    }

    #[test]
    fn both_unsatisfied_appends_closer_target_first() {
        let frame = crate::frame::Frame::new(origin());
        let mut world = MissionWorld::new(origin(), AltitudeBounds { min_ft: 0.0, max_ft: 400.0 });
        world.add_boundaries(&large_square_bounds(&frame)).unwrap();

        let (lat_a, lon_a) = frame.reverse(0.0, 0.0);
        let (lat_b, lon_b) = frame.reverse(500.0, 0.0);
        world
            .add_waypoints(&[
                GeoRecord::new(lat_a, lon_a, 200.0),
                GeoRecord::new(lat_b, lon_b, 200.0),
            ])
            .unwrap();

        // Drop: 400m past the tour's tail, collinear with it — the tour
        // endpoint is the closest point, 400 units away (well over 15),
        // so it is unsatisfied but reachable by a shallow direct climb
        // (dz/dx = 300/400 = 0.75, under the slope cutoff).
        let (drop_lat, drop_lon) = frame.reverse(900.0, 0.0);
        world
            .add_drop(GeoRecord::new(drop_lat, drop_lon, 0.0))
            .unwrap();

        // Off-axis: far enough off the tour's midpoint (1000m north) that
        // the cone ratio (200ft / 1000m) is nowhere near the 2.74
        // satisfaction threshold, and its boundary-projected optimal point
        // ends up much farther from the tour tail than the drop node.
        let (off_lat, off_lon) = frame.reverse(250.0, 1000.0);
        world
            .add_off_axis(GeoRecord::new(off_lat, off_lon, 0.0))
            .unwrap();

        let graph = build_graph(&world).unwrap();
        let path = plan_path(&mut world, &graph).unwrap();

        // Tour (2 nodes) + drop detour + off-axis detour.
        assert_eq!(path.nodes.len(), 4);

        let drop_point = path.nodes[2];
        let off_axis_point = path.nodes[3];
        assert!(
            (drop_point.z - 500.0).abs() < 1e-6,
            "closer target (drop) should be appended first, got {drop_point:?}"
        );
        assert!(
            (off_axis_point.z - 325.0).abs() < 1e-6,
            "farther target (off-axis) should be appended last, got {off_axis_point:?}"
        );
    }
}
