//! Immutable state views published after each tick.
//!
//! Reader threads never touch live simulation state; they consume these
//! snapshots. A view is built once per tick, after all systems have run,
//! and is never partially updated.

use serde::{Deserialize, Serialize};

use crate::types::{ObstacleId, Vector3};

/// Fully-integrated vehicle kinematics at one tick boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightView {
    /// World position (meters).
    pub position: Vector3,
    /// Velocity over ground (m/s).
    pub movement: Vector3,
    /// Direction of travel over ground (degrees).
    pub track: f64,
    /// Direction the nose points (degrees).
    pub heading: f64,
    /// Speed relative to the air mass (m/s).
    pub true_airspeed: f64,
    /// Speed relative to the ground, after wind (m/s).
    pub ground_speed: f64,
    /// Climb/descent rate (m/s, positive up).
    pub vertical_speed: f64,
    /// Flight-path pitch (degrees).
    pub pitch: f64,
}

/// One reduced contact: an obstacle and the distance reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorContact {
    pub obstacle: ObstacleId,
    pub distance: f64,
}

/// The aggregate measurement of one sensor for one sensing pass.
///
/// Contacts are sorted ascending by distance (nearest first). The previous
/// result is replaced wholesale each pass, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorResult {
    pub sensor: String,
    pub contacts: Vec<SensorContact>,
}
