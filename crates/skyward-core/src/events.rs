//! Events exchanged between the tick loop and its observers.

use serde::{Deserialize, Serialize};

use crate::state::{FlightView, SensorResult};
use crate::types::SimTime;

/// Published after every tick, synchronously and in tick order.
///
/// One instance per tick, shared by all observers for that tick; the
/// contained views reflect a fully-integrated state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    pub time: SimTime,
    pub ticks_per_second: u32,
    pub flight: FlightView,
    pub sensors: Vec<SensorResult>,
}

/// A control adjustment queued by the autopilot, consumed by exactly one
/// tick. All channels default to zero (no change).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaRequest {
    pub heading_delta: f64,
    pub airspeed_delta: f64,
    pub vertical_speed_delta: f64,
}

impl DeltaRequest {
    pub fn heading(delta: f64) -> Self {
        Self {
            heading_delta: delta,
            ..Default::default()
        }
    }

    pub fn airspeed(delta: f64) -> Self {
        Self {
            airspeed_delta: delta,
            ..Default::default()
        }
    }

    pub fn vertical_speed(delta: f64) -> Self {
        Self {
            vertical_speed_delta: delta,
            ..Default::default()
        }
    }
}
