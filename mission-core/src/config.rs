//! Tunable constants for graph construction and the drop/off-axis detour
//! decision. Named here, with the spec's values as defaults, instead of
//! inline magic numbers (see the "slope filter" open question).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Per-axis climb-slope cutoff (`|Δz/Δx|` or `|Δz/Δy|`). An edge is
    /// rejected only when *both* axis slopes meet or exceed this.
    pub slope_cutoff: f64,
    /// Inward nudge applied to each raw boundary vertex, in metres.
    pub boundary_buffer_m: f64,
    /// Extra horizontal clearance added to an obstacle's buffered radius
    /// when placing octagon sample nodes, in metres.
    pub obstacle_sample_clearance_m: f64,
    /// Vertical spacing between obstacle sample rings, in feet.
    pub obstacle_altitude_step_ft: f64,
    /// Feet-per-metre conversion for obstacle radii (obstacle radii are
    /// given in feet, horizontal buffers are computed in metres).
    pub feet_to_meters: f64,
    /// Camera off-nadir half-angle, in degrees, used to set the optimal
    /// off-axis viewing altitude.
    pub off_axis_camera_angle_deg: f64,
    /// Altitude ceiling for the off-axis viewing point, in feet.
    pub off_axis_altitude_ceiling_ft: f64,
    /// `altitude / horizontal_distance` ratio above which an off-axis
    /// target is already within the camera cone from the planned tour.
    pub off_axis_satisfied_ratio: f64,
    /// Fixed altitude at which the drop target is placed, in feet.
    pub drop_altitude_ft: f64,
    /// Horizontal distance, in feet, within which the drop target counts
    /// as already satisfied by the planned tour.
    pub drop_satisfied_radius_ft: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            slope_cutoff: 0.9,
            boundary_buffer_m: 5.0,
            obstacle_sample_clearance_m: 5.0,
            obstacle_altitude_step_ft: 60.0,
            feet_to_meters: 0.3048,
            off_axis_camera_angle_deg: 75.0,
            off_axis_altitude_ceiling_ft: 325.0,
            off_axis_satisfied_ratio: 2.74,
            drop_altitude_ft: 500.0,
            drop_satisfied_radius_ft: 15.0,
        }
    }
}

impl PlannerConfig {
    pub fn feet_to_meters(&self, feet: f64) -> f64 {
        feet * self.feet_to_meters
    }
}
