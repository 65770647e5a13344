//! Configuration records and whole-load validation.
//!
//! Loading validates every per-entity invariant and the pairwise
//! altitude/time non-overlap of wind layers before anything is activated.
//! A failed validation reports the complete list of violations; nothing
//! is ever partially applied.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_TICK_RATE;
use crate::enums::{ReductionPolicy, SensorForm};
use crate::types::Vector3;

/// One wind layer: an altitude/time band with steady and gust wind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindLayerConfig {
    /// Baseline wind speed (m/s).
    pub steady_speed: f64,
    /// Peak gust speed (m/s). Must be >= steady_speed.
    pub gust_speed: f64,
    /// Direction the wind blows toward (degrees, [0, 360)).
    pub direction_deg: f64,
    /// Band start time (simulation seconds).
    pub time_start: f64,
    /// Band end time (simulation seconds, exclusive).
    pub time_end: f64,
    /// Band bottom altitude (meters).
    pub altitude_bottom: f64,
    /// Band top altitude (meters, exclusive).
    pub altitude_top: f64,
}

/// One range sensor mounted on the vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name: String,
    /// Mounting position in the vehicle body frame (meters).
    pub mount_position: Vector3,
    /// Boresight direction in the vehicle body frame.
    pub boresight: Vector3,
    /// Aperture half-angle (degrees, [0, 90)).
    pub aperture_deg: f64,
    /// Radius of the sensing surface at the mounting point (meters).
    pub surface_radius: f64,
    /// Maximum sensing range past the mounting point (meters).
    pub range: f64,
    /// Reported-distance quantization step (meters). 0 = raw distances.
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub form: SensorForm,
    #[serde(default)]
    pub reduction: ReductionPolicy,
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same gust schedule.
    pub seed: u64,
    /// Base tick rate (Hz).
    pub ticks_per_second: u32,
    /// Wall-clock speedup factor. Fixed once the runner starts.
    pub speedup: f64,
    pub wind_layers: Vec<WindLayerConfig>,
    pub sensors: Vec<SensorConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks_per_second: DEFAULT_TICK_RATE,
            speedup: 1.0,
            wind_layers: Vec::new(),
            sensors: Vec::new(),
        }
    }
}

/// A single configuration violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("wind layer {index}: {field} {reason}")]
    WindLayerField {
        index: usize,
        field: &'static str,
        reason: String,
    },
    #[error("wind layers {first} and {second} overlap in altitude x time")]
    WindLayerOverlap { first: usize, second: usize },
    #[error("sensor `{name}`: {field} {reason}")]
    SensorField {
        name: String,
        field: &'static str,
        reason: String,
    },
    #[error("ticks_per_second must be > 0")]
    ZeroTickRate,
    #[error("speedup must be > 0, got {0}")]
    NonPositiveSpeedup(f64),
}

/// The complete list of violations found in one load attempt.
#[derive(Debug, Clone)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "configuration rejected ({} violations):", self.0.len())?;
        for err in &self.0 {
            writeln!(f, "  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl SimConfig {
    /// Parse a configuration record from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate the whole configuration, returning it with wind layers
    /// sorted ascending by `time_start`, or the complete violation list.
    pub fn validated(mut self) -> Result<Self, ConfigErrors> {
        let mut errors = Vec::new();

        if self.ticks_per_second == 0 {
            errors.push(ConfigError::ZeroTickRate);
        }
        if !(self.speedup > 0.0) {
            errors.push(ConfigError::NonPositiveSpeedup(self.speedup));
        }

        for (index, layer) in self.wind_layers.iter().enumerate() {
            validate_wind_layer(index, layer, &mut errors);
        }
        for (first, a) in self.wind_layers.iter().enumerate() {
            for (offset, b) in self.wind_layers[first + 1..].iter().enumerate() {
                if bands_overlap(a, b) {
                    errors.push(ConfigError::WindLayerOverlap {
                        first,
                        second: first + 1 + offset,
                    });
                }
            }
        }

        for sensor in &self.sensors {
            validate_sensor(sensor, &mut errors);
        }

        if !errors.is_empty() {
            return Err(ConfigErrors(errors));
        }

        self.wind_layers
            .sort_by(|a, b| a.time_start.total_cmp(&b.time_start));
        Ok(self)
    }
}

fn validate_wind_layer(index: usize, layer: &WindLayerConfig, errors: &mut Vec<ConfigError>) {
    let mut field_err = |field: &'static str, reason: String| {
        errors.push(ConfigError::WindLayerField {
            index,
            field,
            reason,
        });
    };

    if !(layer.steady_speed >= 0.0) {
        field_err("steady_speed", format!("must be >= 0, got {}", layer.steady_speed));
    }
    if !(layer.gust_speed >= layer.steady_speed) {
        field_err(
            "gust_speed",
            format!(
                "must be >= steady_speed ({}), got {}",
                layer.steady_speed, layer.gust_speed
            ),
        );
    }
    if !(0.0..360.0).contains(&layer.direction_deg) {
        field_err(
            "direction_deg",
            format!("must be in [0, 360), got {}", layer.direction_deg),
        );
    }
    if !(layer.altitude_bottom < layer.altitude_top) {
        field_err(
            "altitude_bottom",
            format!(
                "must be < altitude_top, got [{}, {}]",
                layer.altitude_bottom, layer.altitude_top
            ),
        );
    }
    if !(layer.time_start < layer.time_end) {
        field_err(
            "time_start",
            format!(
                "must be < time_end, got [{}, {}]",
                layer.time_start, layer.time_end
            ),
        );
    }
}

fn validate_sensor(sensor: &SensorConfig, errors: &mut Vec<ConfigError>) {
    let mut field_err = |field: &'static str, reason: String| {
        errors.push(ConfigError::SensorField {
            name: sensor.name.clone(),
            field,
            reason,
        });
    };

    if !(sensor.range > 0.0) {
        field_err("range", format!("must be > 0, got {}", sensor.range));
    }
    if !(sensor.surface_radius > 0.0) {
        field_err(
            "surface_radius",
            format!("must be > 0, got {}", sensor.surface_radius),
        );
    }
    if !(0.0..90.0).contains(&sensor.aperture_deg) {
        field_err(
            "aperture_deg",
            format!("must be in [0, 90), got {}", sensor.aperture_deg),
        );
    }
    if !(sensor.accuracy >= 0.0) {
        field_err("accuracy", format!("must be >= 0, got {}", sensor.accuracy));
    }
}

/// Two layers conflict when their altitude/time rectangles strictly overlap.
/// Shared edges are allowed; adjacent bands are how the field is meant to
/// be laid out.
fn bands_overlap(a: &WindLayerConfig, b: &WindLayerConfig) -> bool {
    a.altitude_bottom < b.altitude_top
        && b.altitude_bottom < a.altitude_top
        && a.time_start < b.time_end
        && b.time_start < a.time_end
}
