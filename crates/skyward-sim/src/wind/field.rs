//! The layered wind field: resolves the wind effect at an (altitude, time)
//! query by blending the layers bracketing the query point.
//!
//! Probes are taken at altitude +/- Ra and time +/- Rt. Inside a layer and
//! away from its edges all probes land in the same layer and its effect is
//! used exactly; within a half-width of a band edge the adjacent layers are
//! blended so the resolved effect is continuous across the boundary. A
//! missing neighbor blends toward still air, so the field degrades smoothly
//! to "no wind" at its boundaries.

use rand_chacha::ChaCha8Rng;

use skyward_core::config::WindLayerConfig;
use skyward_core::constants::{ALTITUDE_BLEND_HALF_WIDTH, TIME_BLEND_HALF_WIDTH};
use skyward_core::types::{shortest_angle_deg, wrap_deg};

use crate::flight::FlightState;
use crate::wind::layer::{WindEffect, WindLayer};

/// Ordered collection of wind layers with a monotone search cursor.
#[derive(Debug, Clone)]
pub struct WindField {
    /// Sorted ascending by time_start (enforced at load).
    layers: Vec<WindLayer>,
    /// Index of the oldest layer still relevant; never moves backward for
    /// non-decreasing query times.
    cursor: usize,
}

impl WindField {
    /// Build from validated, time-sorted layer configs.
    pub fn from_config(configs: &[WindLayerConfig]) -> Self {
        Self {
            layers: configs.iter().map(WindLayer::from_config).collect(),
            cursor: 0,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Rewind for a simulation restart.
    pub fn reset(&mut self) {
        self.cursor = 0;
        for layer in &mut self.layers {
            layer.reset_schedule();
        }
    }

    /// Resolve the wind at the vehicle's altitude and the given time, and
    /// write the resulting track and ground speed back onto the flight state.
    pub fn apply(&mut self, flight: &mut FlightState, time: f64, rng: &mut ChaCha8Rng) {
        let altitude = flight.position().z;
        let heading = flight.heading();
        let airspeed = flight.true_airspeed();

        let effect = self
            .resolve(altitude, time, heading, airspeed, rng)
            .unwrap_or_else(|| WindEffect::calm(heading, airspeed));
        flight.apply_wind_effect(effect.track, effect.ground_speed);
    }

    /// Resolve the blended wind effect, or None when no layer is in range.
    pub fn resolve(
        &mut self,
        altitude: f64,
        time: f64,
        heading: f64,
        airspeed: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<WindEffect> {
        self.advance_cursor(time);

        let ra = ALTITUDE_BLEND_HALF_WIDTH;
        let rt = TIME_BLEND_HALF_WIDTH;
        let early = time - rt;
        let late = time + rt;

        // The four candidates bracketing the query point.
        let lower_early = self.find(altitude - ra, early);
        let upper_early = self.find(altitude + ra, early);
        let lower_late = self.find(altitude - ra, late);
        let upper_late = self.find(altitude + ra, late);

        if lower_early.is_none()
            && upper_early.is_none()
            && lower_late.is_none()
            && upper_late.is_none()
        {
            return None;
        }

        // All probes inside one layer: that layer's exact effect.
        if let (Some(a), Some(b), Some(c), Some(d)) =
            (lower_early, upper_early, lower_late, upper_late)
        {
            if a == b && b == c && c == d {
                return Some(self.layer_effect(a, time, heading, airspeed, rng));
            }
        }

        let early_full = lower_early.is_some() && upper_early.is_some();
        let late_full = lower_late.is_some() && upper_late.is_some();
        let calm = WindEffect::calm(heading, airspeed);

        if early_full != late_full {
            // A full altitude bracket on only one time edge: blend each
            // altitude edge across time first, then across altitude.
            let lower = self.blend_time(lower_early, lower_late, time, heading, airspeed, rng);
            let upper = self.blend_time(upper_early, upper_late, time, heading, airspeed, rng);

            let lower_top = max_edge(
                [lower_early, lower_late],
                |i| self.layers[i].altitude_top(),
            );
            let upper_bottom = min_edge(
                [upper_early, upper_late],
                |i| self.layers[i].altitude_bottom(),
            );
            let (lower_edge, upper_edge) = clip_edges(lower_top, upper_bottom)?;

            let t = blend_parameter(altitude, upper_edge - ra, lower_edge + ra);
            Some(mix(lower.unwrap_or(calm), upper.unwrap_or(calm), t))
        } else {
            // Blend across altitude at each time edge, then across time.
            let early_eff =
                self.blend_altitude(lower_early, upper_early, altitude, early, heading, airspeed, rng);
            let late_eff =
                self.blend_altitude(lower_late, upper_late, altitude, late, heading, airspeed, rng);

            let early_end = max_edge([lower_early, upper_early], |i| self.layers[i].time_end());
            let late_start = min_edge([lower_late, upper_late], |i| self.layers[i].time_start());
            let (early_edge, late_edge) = clip_edges(early_end, late_start)?;

            let t = blend_parameter(time, late_edge - rt, early_edge + rt);
            Some(mix(early_eff.unwrap_or(calm), late_eff.unwrap_or(calm), t))
        }
    }

    /// Advance past layers whose band ended before anything the current
    /// query (or any later one) can still probe.
    fn advance_cursor(&mut self, time: f64) {
        while self.cursor < self.layers.len()
            && self.layers[self.cursor].time_end() <= time - TIME_BLEND_HALF_WIDTH
        {
            self.cursor += 1;
        }
    }

    /// The single layer (if any) whose band contains the probe point,
    /// searched from the cursor forward.
    fn find(&self, altitude: f64, time: f64) -> Option<usize> {
        self.layers[self.cursor..]
            .iter()
            .position(|layer| layer.contains(altitude, time))
            .map(|offset| self.cursor + offset)
    }

    fn layer_effect(
        &mut self,
        index: usize,
        time: f64,
        heading: f64,
        airspeed: f64,
        rng: &mut ChaCha8Rng,
    ) -> WindEffect {
        self.layers[index].effect(heading, airspeed, time, rng)
    }

    /// Elementary blend of two altitude-bracketing candidates at one time
    /// edge. A missing partner contributes still air clipped to the present
    /// layer's band edge.
    #[allow(clippy::too_many_arguments)]
    fn blend_altitude(
        &mut self,
        lower: Option<usize>,
        upper: Option<usize>,
        altitude: f64,
        eval_time: f64,
        heading: f64,
        airspeed: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<WindEffect> {
        match (lower, upper) {
            (None, None) => None,
            (Some(a), Some(b)) if a == b => {
                Some(self.layer_effect(a, eval_time, heading, airspeed, rng))
            }
            _ => {
                let ra = ALTITUDE_BLEND_HALF_WIDTH;
                let lower_top = lower.map(|i| self.layers[i].altitude_top());
                let upper_bottom = upper.map(|i| self.layers[i].altitude_bottom());
                let (lower_edge, upper_edge) = clip_edges(lower_top, upper_bottom)?;

                let t = blend_parameter(altitude, upper_edge - ra, lower_edge + ra);
                let calm = WindEffect::calm(heading, airspeed);
                let lower_eff = match lower {
                    Some(i) => self.layer_effect(i, eval_time, heading, airspeed, rng),
                    None => calm,
                };
                let upper_eff = match upper {
                    Some(i) => self.layer_effect(i, eval_time, heading, airspeed, rng),
                    None => calm,
                };
                Some(mix(lower_eff, upper_eff, t))
            }
        }
    }

    /// Elementary blend of one altitude edge's candidates across time.
    /// Each candidate's effect is evaluated at the probe time it was found
    /// with; a candidate spanning both probes is used exactly.
    fn blend_time(
        &mut self,
        early: Option<usize>,
        late: Option<usize>,
        time: f64,
        heading: f64,
        airspeed: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<WindEffect> {
        match (early, late) {
            (None, None) => None,
            (Some(a), Some(b)) if a == b => {
                Some(self.layer_effect(a, time, heading, airspeed, rng))
            }
            _ => {
                let rt = TIME_BLEND_HALF_WIDTH;
                let early_end = early.map(|i| self.layers[i].time_end());
                let late_start = late.map(|i| self.layers[i].time_start());
                let (early_edge, late_edge) = clip_edges(early_end, late_start)?;

                let t = blend_parameter(time, late_edge - rt, early_edge + rt);
                let calm = WindEffect::calm(heading, airspeed);
                let early_eff = match early {
                    Some(i) => self.layer_effect(i, time - rt, heading, airspeed, rng),
                    None => calm,
                };
                let late_eff = match late {
                    Some(i) => self.layer_effect(i, time + rt, heading, airspeed, rng),
                    None => calm,
                };
                Some(mix(early_eff, late_eff, t))
            }
        }
    }
}

/// Band edges for a blend where either side may be missing: the missing
/// side's synthetic zero-wind layer is clipped to the partner's edge.
fn clip_edges(first: Option<f64>, second: Option<f64>) -> Option<(f64, f64)> {
    match (first, second) {
        (Some(a), Some(b)) => Some((a, b)),
        (Some(a), None) => Some((a, a)),
        (None, Some(b)) => Some((b, b)),
        (None, None) => None,
    }
}

/// Largest edge value among the present candidates.
fn max_edge(candidates: [Option<usize>; 2], edge: impl Fn(usize) -> f64) -> Option<f64> {
    candidates
        .iter()
        .flatten()
        .map(|&i| edge(i))
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
}

/// Smallest edge value among the present candidates.
fn min_edge(candidates: [Option<usize>; 2], edge: impl Fn(usize) -> f64) -> Option<f64> {
    candidates
        .iter()
        .flatten()
        .map(|&i| edge(i))
        .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
}

/// Position of `value` within the blend zone [zone_lo, zone_hi], in [0, 1].
fn blend_parameter(value: f64, zone_lo: f64, zone_hi: f64) -> f64 {
    let width = zone_hi - zone_lo;
    if width > f64::EPSILON {
        ((value - zone_lo) / width).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Blend two wind effects: ground speed linearly, track via the signed
/// shortest-angle difference so blending never jumps across the 0/360 seam.
fn mix(a: WindEffect, b: WindEffect, t: f64) -> WindEffect {
    WindEffect {
        track: wrap_deg(a.track + shortest_angle_deg(a.track, b.track) * t),
        ground_speed: a.ground_speed + (b.ground_speed - a.ground_speed) * t,
    }
}
