//! A single wind layer: an altitude/time band with steady wind and
//! lazily scheduled gusts.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyward_core::config::WindLayerConfig;
use skyward_core::constants::{GUST_MAX_DURATION, GUST_MIN_DURATION, GUST_RISE_TIME, MAX_CALM_TIME};
use skyward_core::types::{wrap_deg, Vector3};

/// Wind-resolved track and ground speed for one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindEffect {
    pub track: f64,
    pub ground_speed: f64,
}

impl WindEffect {
    /// The effect of still air: the vehicle tracks its heading at airspeed.
    pub fn calm(heading: f64, true_airspeed: f64) -> Self {
        Self {
            track: heading,
            ground_speed: true_airspeed,
        }
    }
}

/// One altitude/time band of wind. Band fields are immutable after load;
/// only the gust schedule mutates, lazily, on query.
#[derive(Debug, Clone)]
pub struct WindLayer {
    steady_speed: f64,
    gust_speed: f64,
    direction_deg: f64,
    time_start: f64,
    time_end: f64,
    altitude_bottom: f64,
    altitude_top: f64,
    // Gust schedule, drawn on the first query past the previous window.
    next_gust_start: f64,
    next_gust_speed: f64,
    next_gust_duration: f64,
}

impl WindLayer {
    pub fn from_config(config: &WindLayerConfig) -> Self {
        Self {
            steady_speed: config.steady_speed,
            gust_speed: config.gust_speed,
            direction_deg: config.direction_deg,
            time_start: config.time_start,
            time_end: config.time_end,
            altitude_bottom: config.altitude_bottom,
            altitude_top: config.altitude_top,
            next_gust_start: f64::NEG_INFINITY,
            next_gust_speed: config.steady_speed,
            next_gust_duration: 0.0,
        }
    }

    pub fn time_start(&self) -> f64 {
        self.time_start
    }

    pub fn time_end(&self) -> f64 {
        self.time_end
    }

    pub fn altitude_bottom(&self) -> f64 {
        self.altitude_bottom
    }

    pub fn altitude_top(&self) -> f64 {
        self.altitude_top
    }

    /// Whether this band contains the query point. Bands are half-open at
    /// the top/end so adjacent bands hand over cleanly.
    pub fn contains(&self, altitude: f64, time: f64) -> bool {
        altitude >= self.altitude_bottom
            && altitude < self.altitude_top
            && time >= self.time_start
            && time < self.time_end
    }

    /// Current wind speed: the steady value, or the gust profile while a
    /// scheduled gust is in progress.
    ///
    /// The gust ramps linearly up over GUST_RISE_TIME, holds at the drawn
    /// peak, then ramps symmetrically back down before the window closes.
    pub fn instantaneous_speed(&mut self, time: f64, rng: &mut ChaCha8Rng) -> f64 {
        if self.gust_speed <= self.steady_speed {
            return self.steady_speed;
        }

        if time >= self.next_gust_start + self.next_gust_duration {
            self.schedule_next_gust(time, rng);
        }
        if time < self.next_gust_start {
            return self.steady_speed;
        }

        let into = time - self.next_gust_start;
        let remaining = self.next_gust_start + self.next_gust_duration - time;
        let rise = GUST_RISE_TIME.min(self.next_gust_duration / 2.0);
        let ramp = (into / rise).min(remaining / rise).clamp(0.0, 1.0);
        self.steady_speed + (self.next_gust_speed - self.steady_speed) * ramp
    }

    /// Forget the drawn schedule so a restarted clock draws afresh.
    pub fn reset_schedule(&mut self) {
        self.next_gust_start = f64::NEG_INFINITY;
        self.next_gust_speed = self.steady_speed;
        self.next_gust_duration = 0.0;
    }

    fn schedule_next_gust(&mut self, time: f64, rng: &mut ChaCha8Rng) {
        self.next_gust_start = time + rng.gen_range(0.0..MAX_CALM_TIME);
        self.next_gust_speed = rng.gen_range(self.steady_speed..self.gust_speed);
        self.next_gust_duration = rng.gen_range(GUST_MIN_DURATION..GUST_MAX_DURATION);
    }

    /// Resolve this layer's effect on the vehicle: add the wind vector to
    /// the air-mass velocity vector (wind triangle). `direction_deg` is the
    /// direction the wind blows toward.
    pub fn effect(
        &mut self,
        heading: f64,
        true_airspeed: f64,
        time: f64,
        rng: &mut ChaCha8Rng,
    ) -> WindEffect {
        let speed = self.instantaneous_speed(time, rng);
        let heading_rad = heading.to_radians();
        let direction_rad = self.direction_deg.to_radians();

        let east = true_airspeed * heading_rad.sin() + speed * direction_rad.sin();
        let north = true_airspeed * heading_rad.cos() + speed * direction_rad.cos();
        let ground_speed = Vector3::new(east, north, 0.0).horizontal_length();

        let track = if ground_speed < f64::EPSILON {
            heading
        } else {
            wrap_deg(east.atan2(north).to_degrees())
        };

        WindEffect {
            track,
            ground_speed,
        }
    }
}
