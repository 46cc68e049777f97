//! Error kinds surfaced by mission planning.
//!
//! Every variant is fatal for the current planning invocation — there is no
//! local recovery inside the planner. The caller decides whether to drop an
//! optional feature (e.g. obstacles) and retry.

use thiserror::Error;

/// A waypoint pair, used to identify which leg of the tour failed.
pub type WaypointIndex = usize;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// Missing required fields, zero waypoints, a degenerate fly-zone
    /// (fewer than 3 boundary points), or a self-intersecting boundary.
    #[error("invalid mission: {0}")]
    InvalidMission(String),

    /// A waypoint or target lies outside the (buffered) fly-zone polygon.
    #[error("point outside fly-zone: {0}")]
    OutOfBounds(String),

    /// A pair of consecutive waypoints is connected by no edge surviving the
    /// slope filter even in isolation (an unavoidable, too-steep climb).
    #[error("infeasible climb slope between waypoints {0} and {1}")]
    InfeasibleSlope(WaypointIndex, WaypointIndex),

    /// A\* found no path between waypoints `i` and `j`.
    #[error("no route between waypoints {0} and {1}")]
    NoRouteBetweenWaypoints(WaypointIndex, WaypointIndex),

    /// Coordinate conversion failure; should be impossible inside mission
    /// bounds, but surfaced rather than unwrapped.
    #[error("projection error: {0}")]
    ProjectionError(String),
}

pub type PlanResult<T> = Result<T, PlanError>;
