//! 2-D and 3-D geometry primitives.
//!
//! Hand-written rather than pulled from an external geometry crate — the
//! spec's design notes call out that the small set of operations needed
//! here (point-in-polygon, ring↔segment crossing, segment↔cylinder-hull
//! crossing, point-on-ring projection) doesn't justify a heavy dependency.
//!
//! Horizontal coordinates (`x`, `y`) are metres; `z` is feet. Lengths mix
//! both units directly without conversion, per the data model's mixed-unit
//! convention — see `mission-core::config` for where unit choices are named.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// 3-D Euclidean distance, mixing metre and foot components directly
    /// (see module docs).
    pub fn distance(&self, other: Point3) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }

    pub fn horizontal_distance(&self, other: Point3) -> f64 {
        self.xy().distance(other.xy())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3 {
    pub a: Point3,
    pub b: Point3,
}

impl Segment3 {
    pub fn new(a: Point3, b: Point3) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }
}

/// Standard 2-D segment-segment intersection test via orientation of
/// triplets (the textbook CCW-based test).
fn orientation(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether `p`, known to be collinear with segment `ab`, lies within its
/// bounding box (i.e. actually on the finite segment).
fn on_segment(a: Point2, b: Point2, p: Point2) -> bool {
    p.x >= a.x.min(b.x) - 1e-9
        && p.x <= a.x.max(b.x) + 1e-9
        && p.y >= a.y.min(b.y) - 1e-9
        && p.y <= a.y.max(b.y) + 1e-9
}

pub fn segments_intersect_2d(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);

    if (o1 > 0.0) != (o2 > 0.0) && (o3 > 0.0) != (o4 > 0.0) && o1 != 0.0 && o2 != 0.0 {
        return true;
    }

    // Collinear special cases.
    if o1 == 0.0 && on_segment(p1, p2, p3) {
        return true;
    }
    if o2 == 0.0 && on_segment(p1, p2, p4) {
        return true;
    }
    if o3 == 0.0 && on_segment(p3, p4, p1) {
        return true;
    }
    if o4 == 0.0 && on_segment(p3, p4, p2) {
        return true;
    }
    false
}

/// Whether `p1p2` crosses `p3p4` transversally: each segment's endpoints
/// lie on strictly opposite sides of the other's line. Unlike
/// `segments_intersect_2d`, a segment that only *touches* the other at a
/// shared point (an endpoint landing exactly on the other segment, with no
/// side-to-side crossing) is not counted as an intersection here.
///
/// This is what a candidate graph edge needs for the boundary-ring check:
/// the off-axis optimal viewing point is constructed to sit exactly on the
/// fly-zone boundary (§4.3), so any edge reaching it necessarily terminates
/// on a ring edge's line by construction — that is a legitimate arrival,
/// not a crossing, and must not be rejected the way `segments_intersect_2d`
/// would reject it.
fn segments_cross_transversally(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> bool {
    let o1 = orientation(p1, p2, p3);
    let o2 = orientation(p1, p2, p4);
    let o3 = orientation(p3, p4, p1);
    let o4 = orientation(p3, p4, p2);
    (o1 > 0.0) != (o2 > 0.0)
        && (o3 > 0.0) != (o4 > 0.0)
        && o1 != 0.0
        && o2 != 0.0
        && o3 != 0.0
        && o4 != 0.0
}

/// Closest point on a finite 2-D segment to `p`, with the interpolation
/// parameter `t` in `[0, 1]`.
fn closest_point_on_segment(a: Point2, b: Point2, p: Point2) -> (Point2, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-12 {
        return (a, 0.0);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    (Point2::new(a.x + t * dx, a.y + t * dy), t)
}

/// A closed boundary ring (the fly-zone boundary). Points are not required
/// to repeat the first vertex at the end — closure is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub points: Vec<Point2>,
}

impl Ring {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn edge(&self, i: usize) -> (Point2, Point2) {
        let n = self.points.len();
        (self.points[i], self.points[(i + 1) % n])
    }

    /// Ray-casting point-in-polygon test (boundary points count as inside).
    pub fn contains(&self, p: Point2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > p.y) != (pj.y > p.y)
                && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Whether any two non-adjacent edges of the ring cross each other.
    /// Adjacent edges are expected to share an endpoint and are skipped.
    pub fn self_intersects(&self) -> bool {
        let n = self.points.len();
        if n < 4 {
            return false;
        }
        for i in 0..n {
            let (a1, a2) = self.edge(i);
            for j in (i + 1)..n {
                if j == i || (j + 1) % n == i || (i + 1) % n == j {
                    continue;
                }
                let (b1, b2) = self.edge(j);
                if segments_intersect_2d(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether the 2-D projection of `seg` crosses any ring edge. A segment
    /// that only touches the boundary at one of its own endpoints (as an
    /// edge into the off-axis optimal viewing point always does) does not
    /// count — see `segments_cross_transversally`.
    pub fn intersects_segment(&self, seg: Segment3) -> bool {
        let n = self.points.len();
        if n < 2 {
            return false;
        }
        let (p1, p2) = (seg.a.xy(), seg.b.xy());
        for i in 0..n {
            let (e1, e2) = self.edge(i);
            if segments_cross_transversally(p1, p2, e1, e2) {
                return true;
            }
        }
        false
    }

    /// Closest point on the ring to `p`, and the signed distance (negative
    /// when `p` is inside the ring, positive when outside).
    pub fn project(&self, p: Point2) -> (Point2, f64) {
        let n = self.points.len();
        assert!(n >= 2, "ring needs at least 2 points to project onto");
        let mut best_point = self.points[0];
        let mut best_dist = f64::MAX;
        for i in 0..n {
            let (e1, e2) = self.edge(i);
            let (candidate, _) = closest_point_on_segment(e1, e2, p);
            let d = candidate.distance(p);
            if d < best_dist {
                best_dist = d;
                best_point = candidate;
            }
        }
        let signed = if self.contains(p) { -best_dist } else { best_dist };
        (best_point, signed)
    }
}

/// A vertical cylinder's horizontal cross-section: a buffered disc boundary
/// extruded from `alt_min_ft` to `height_ft`. Per the spec's design note,
/// collision is tested as 2-D projection of the edge against the 2-D
/// buffered-disc *boundary* (not the filled disc) — obstacles are assumed
/// tall enough that altitude rarely provides clearance, and this matches
/// the source's use of the buffered circle's boundary rather than its
/// interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub center: Point2,
    pub radius_m: f64,
    pub alt_min_ft: f64,
    pub height_ft: f64,
}

impl Cylinder {
    pub fn new(center: Point2, radius_m: f64, alt_min_ft: f64, height_ft: f64) -> Self {
        Self {
            center,
            radius_m,
            alt_min_ft,
            height_ft,
        }
    }

    /// Whether the 2-D projection of `seg` crosses this cylinder's buffered
    /// boundary circle.
    pub fn intersects_segment(&self, seg: Segment3) -> bool {
        let a = seg.a.xy();
        let b = seg.b.xy();
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let fx = a.x - self.center.x;
        let fy = a.y - self.center.y;

        let r = self.radius_m;
        let aa = dx * dx + dy * dy;
        let bb = 2.0 * (fx * dx + fy * dy);
        let cc = fx * fx + fy * fy - r * r;

        if aa.abs() < 1e-12 {
            // Degenerate (zero-length) segment: a point is "on" the
            // boundary only within floating-point tolerance.
            return (cc).abs() < 1e-9;
        }

        let disc = bb * bb - 4.0 * aa * cc;
        if disc < 0.0 {
            return false;
        }
        let sqrt_disc = disc.sqrt();
        let t1 = (-bb - sqrt_disc) / (2.0 * aa);
        let t2 = (-bb + sqrt_disc) / (2.0 * aa);
        (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
    }
}

/// An ordered 3-D polyline, used to project the drop/off-axis targets onto
/// the already-built waypoint tour. Projection and interpolation operate
/// on the horizontal (x, y) components only — matching the source, whose
/// underlying geometry library resolves line position/length using 2-D
/// coordinates even on 3-D-tagged geometries — with `z` then linearly
/// interpolated along the same parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Path3 {
    pub points: Vec<Point3>,
}

impl Path3 {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Finds the closest point on the polyline to `target`'s horizontal
    /// position, returning the interpolated 3-D point (with `z` linearly
    /// interpolated along the same segment).
    pub fn project_and_interpolate(&self, target: Point3) -> Point3 {
        let n = self.points.len();
        assert!(n >= 2, "path needs at least 2 points to project onto");
        let target_xy = target.xy();

        let mut best_dist = f64::MAX;
        let mut best = self.points[0];
        for i in 0..n - 1 {
            let a = self.points[i];
            let b = self.points[i + 1];
            let (closest_xy, t) = closest_point_on_segment(a.xy(), b.xy(), target_xy);
            let d = closest_xy.distance(target_xy);
            if d < best_dist {
                best_dist = d;
                let z = a.z + t * (b.z - a.z);
                best = Point3::new(closest_xy.x, closest_xy.y, z);
            }
        }
        best
    }
}
