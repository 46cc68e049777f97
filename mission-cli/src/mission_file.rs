//! JSON schema for the mission file the planner reads and writes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoWaypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StationaryObstacle {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyZone {
    #[serde(rename = "altitudeMin")]
    pub altitude_min: f64,
    #[serde(rename = "altitudeMax")]
    pub altitude_max: f64,
    #[serde(rename = "boundaryPoints")]
    pub boundary_points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutogenPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionFile {
    #[serde(rename = "lostCommsPos")]
    pub lost_comms_pos: GeoPoint,
    #[serde(rename = "flyZones")]
    pub fly_zones: Vec<FlyZone>,
    pub waypoints: Vec<GeoWaypoint>,
    #[serde(rename = "stationaryObstacles", default)]
    pub stationary_obstacles: Vec<StationaryObstacle>,
    #[serde(rename = "airDropPos", skip_serializing_if = "Option::is_none")]
    pub air_drop_pos: Option<GeoPoint>,
    #[serde(rename = "offAxisOdlcPos", skip_serializing_if = "Option::is_none")]
    pub off_axis_odlc_pos: Option<GeoPoint>,
    #[serde(rename = "autogenPoints", skip_serializing_if = "Option::is_none")]
    pub autogen_points: Option<Vec<AutogenPoint>>,
}
