//! Typed store of projected mission entities: fly-zone, waypoints,
//! obstacles, and the optional drop/off-axis targets.

use crate::config::PlannerConfig;
use crate::error::{PlanError, PlanResult};
use crate::frame::{Frame, Origin};
use crate::geometry::{Point2, Point3, Ring};

/// A raw geodetic waypoint/target record, as the mission file provides it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
}

impl GeoRecord {
    pub fn new(latitude: f64, longitude: f64, altitude_ft: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_ft,
        }
    }
}

/// The lower/upper altitude band (feet) the fly-zone permits.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AltitudeBounds {
    pub min_ft: f64,
    pub max_ft: f64,
}

/// A 3-D waypoint the aircraft must visit, in visit order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub point: Point3,
    pub order: usize,
}

/// A vertical cylindrical no-fly obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Point2,
    pub radius_m: f64,
    pub height_ft: f64,
}

#[derive(Debug, Clone)]
pub struct MissionWorld {
    origin: Option<Frame>,
    alt_bounds: AltitudeBounds,
    config: PlannerConfig,
    pub boundary_ring: Option<Ring>,
    pub waypoints: Vec<Waypoint>,
    pub obstacles: Vec<Obstacle>,
    pub drop: Option<Point3>,
    pub off_axis: Option<Point3>,
    pub off_axis_optimal: Option<Point3>,
}

impl MissionWorld {
    pub fn new(origin: Origin, alt_bounds: AltitudeBounds) -> Self {
        Self::with_config(origin, alt_bounds, PlannerConfig::default())
    }

    pub fn with_config(origin: Origin, alt_bounds: AltitudeBounds, config: PlannerConfig) -> Self {
        Self {
            origin: Some(Frame::new(origin)),
            alt_bounds,
            config,
            boundary_ring: None,
            waypoints: Vec::new(),
            obstacles: Vec::new(),
            drop: None,
            off_axis: None,
            off_axis_optimal: None,
        }
    }

    pub fn frame(&self) -> &Frame {
        self.origin.as_ref().expect("MissionWorld constructed without an origin")
    }

    pub fn alt_bounds(&self) -> AltitudeBounds {
        self.alt_bounds
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn boundary_ring(&self) -> PlanResult<&Ring> {
        self.boundary_ring
            .as_ref()
            .ok_or_else(|| PlanError::InvalidMission("fly-zone boundary not set".into()))
    }

    /// Projects and buffers the raw boundary points into the fly-zone ring.
    /// Each vertex is nudged inward by `config.boundary_buffer_m` along each
    /// axis: 5m is a crude margin against GPS drift, applied relative to the
    /// origin's latitude/longitude (not the polygon's own centroid).
    pub fn add_boundaries(&mut self, bounds: &[GeoRecord]) -> PlanResult<()> {
        if bounds.len() < 3 {
            return Err(PlanError::InvalidMission(
                "fly-zone boundary needs at least 3 points".into(),
            ));
        }
        let frame = *self.frame();
        let origin = frame.origin();
        let buffer = self.config.boundary_buffer_m;

        let mut points = Vec::with_capacity(bounds.len());
        for b in bounds {
            let (mut x, mut y) = frame.forward(b.latitude, b.longitude);
            x += buffer * if b.latitude > origin.latitude { -1.0 } else { 1.0 };
            y += buffer * if b.longitude > origin.longitude { -1.0 } else { 1.0 };
            points.push(Point2::new(x, y));
        }
        let ring = Ring::new(points);
        if ring.self_intersects() {
            return Err(PlanError::InvalidMission(
                "fly-zone boundary is self-intersecting".into(),
            ));
        }
        self.boundary_ring = Some(ring);
        Ok(())
    }

    /// Projects and appends waypoints, in the order given.
    pub fn add_waypoints(&mut self, waypoints: &[GeoRecord]) -> PlanResult<()> {
        let frame = *self.frame();
        let ring = self.boundary_ring()?.clone();
        for w in waypoints {
            let (x, y) = frame.forward(w.latitude, w.longitude);
            let point = Point3::new(x, y, w.altitude_ft);
            if !ring.contains(point.xy()) {
                return Err(PlanError::OutOfBounds(format!(
                    "waypoint {} at ({:.6}, {:.6}) is outside the fly-zone",
                    self.waypoints.len(),
                    w.latitude,
                    w.longitude
                )));
            }
            let order = self.waypoints.len();
            self.waypoints.push(Waypoint { point, order });
        }
        Ok(())
    }

    /// Projects and appends obstacles. Obstacle centres are not required to
    /// lie inside the fly-zone (the containment invariant applies to the
    /// *sample nodes* the graph builder derives from them, not the raw
    /// centre) — filtering those samples is the graph builder's job.
    pub fn add_obstacles(&mut self, obstacles: &[ObstacleRecord]) -> PlanResult<()> {
        let frame = *self.frame();
        for o in obstacles {
            let (x, y) = frame.forward(o.latitude, o.longitude);
            self.obstacles.push(Obstacle {
                center: Point2::new(x, y),
                radius_m: self.config.feet_to_meters(o.radius_ft),
                height_ft: o.height_ft,
            });
        }
        Ok(())
    }

    /// Stores the drop target at the fixed planner altitude, regardless of
    /// any altitude the mission file supplied for it.
    pub fn add_drop(&mut self, drop: GeoRecord) -> PlanResult<()> {
        let frame = *self.frame();
        let (x, y) = frame.forward(drop.latitude, drop.longitude);
        self.drop = Some(Point3::new(x, y, self.config.drop_altitude_ft));
        Ok(())
    }

    /// Stores the off-axis target and computes its optimal viewing point:
    /// the projection onto the fly-zone boundary, at whichever altitude
    /// puts it inside the camera's off-nadir cone (capped at the planner's
    /// altitude ceiling for this target).
    pub fn add_off_axis(&mut self, off_axis: GeoRecord) -> PlanResult<()> {
        let frame = *self.frame();
        let ring = self.boundary_ring()?.clone();
        let (x, y) = frame.forward(off_axis.latitude, off_axis.longitude);
        let point = Point3::new(x, y, 0.0);

        let (viewing_xy, _signed_dist) = ring.project(point.xy());
        let horizontal_dist = viewing_xy.distance(point.xy());
        let half_angle = self.config.off_axis_camera_angle_deg.to_radians();
        let z = (horizontal_dist * half_angle.tan()).min(self.config.off_axis_altitude_ceiling_ft);

        self.off_axis_optimal = Some(Point3::new(viewing_xy.x, viewing_xy.y, z));
        self.off_axis = Some(point);
        Ok(())
    }
}

/// A raw geodetic obstacle record (radius/height in feet).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_ft: f64,
    pub height_ft: f64,
}
