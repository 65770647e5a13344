//! Vehicle kinematic state and delta-bounded integration.
//!
//! `FlightState` is owned and mutated by the tick thread only; every other
//! thread consumes the `FlightView` snapshots published in TickEvents.
//! Control changes arrive as additive delta requests and are worked off a
//! bounded amount per tick.

use skyward_core::constants::{
    AIRSPEED_ACCEL, HEADING_RATE, VERTICAL_ACCEL, V_MAX, V_VERTICAL_MAX,
};
use skyward_core::events::DeltaRequest;
use skyward_core::state::FlightView;
use skyward_core::types::{wrap_deg, Vector3};

/// Position and kinematic state of the vehicle.
#[derive(Debug, Clone, Default)]
pub struct FlightState {
    position: Vector3,
    /// Velocity over ground (m/s), recomputed by `update_position`.
    movement: Vector3,
    /// Direction of travel over ground (degrees).
    track: f64,
    /// Direction the nose points (degrees, [0, 360)).
    heading: f64,
    /// Speed relative to the air mass (m/s, [0, V_MAX]).
    true_airspeed: f64,
    /// Speed over ground (m/s). Mirrors true_airspeed except between wind
    /// application and the next delta-integration step.
    ground_speed: f64,
    /// Climb/descent rate (m/s, positive up).
    vertical_speed: f64,
    /// Flight-path pitch (degrees), derived by `update_position`.
    pitch: f64,
    // Pending delta accumulators, unbounded at request time.
    delta_heading: f64,
    delta_airspeed: f64,
    delta_vertical_speed: f64,
}

impl FlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn movement(&self) -> Vector3 {
        self.movement
    }

    pub fn track(&self) -> f64 {
        self.track
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn true_airspeed(&self) -> f64 {
        self.true_airspeed
    }

    pub fn ground_speed(&self) -> f64 {
        self.ground_speed
    }

    pub fn vertical_speed(&self) -> f64 {
        self.vertical_speed
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Place the vehicle (scenario setup, not per-tick integration).
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Set the heading exactly, cancelling any in-flight heading request.
    pub fn set_heading(&mut self, heading: f64) {
        self.heading = wrap_deg(heading);
        self.delta_heading = 0.0;
    }

    /// Set the airspeed exactly, cancelling any in-flight airspeed request.
    pub fn set_airspeed(&mut self, airspeed: f64) {
        self.true_airspeed = airspeed.clamp(0.0, V_MAX);
        self.ground_speed = self.true_airspeed;
        self.delta_airspeed = 0.0;
    }

    /// Set the vertical speed exactly, cancelling any in-flight request.
    pub fn set_vertical_speed(&mut self, vertical_speed: f64) {
        self.vertical_speed = vertical_speed.clamp(-V_VERTICAL_MAX, V_VERTICAL_MAX);
        self.delta_vertical_speed = 0.0;
    }

    /// Accumulate a heading change to be worked off over upcoming ticks.
    pub fn request_delta_heading(&mut self, delta: f64) {
        self.delta_heading += delta;
    }

    pub fn request_delta_airspeed(&mut self, delta: f64) {
        self.delta_airspeed += delta;
    }

    pub fn request_delta_vertical_speed(&mut self, delta: f64) {
        self.delta_vertical_speed += delta;
    }

    /// Accumulate all three channels of a queued request.
    pub fn apply_request(&mut self, request: DeltaRequest) {
        self.delta_heading += request.heading_delta;
        self.delta_airspeed += request.airspeed_delta;
        self.delta_vertical_speed += request.vertical_speed_delta;
    }

    /// Work each pending delta off by at most one tick's worth of change,
    /// clamping live values into their legal ranges.
    ///
    /// Also ends any wind override of ground speed: after this step,
    /// ground speed mirrors true airspeed again.
    pub fn update_delta(&mut self, ticks_per_second: u32) {
        let tps = ticks_per_second as f64;

        if self.delta_heading != 0.0 {
            // Shorter of the per-tick turn rate or the exact remainder.
            let step = HEADING_RATE / tps;
            let applied = self.delta_heading.clamp(-step, step);
            self.heading = wrap_deg(self.heading + applied);
            self.delta_heading -= applied;
        }

        if self.delta_airspeed != 0.0 {
            let step = AIRSPEED_ACCEL / tps;
            let applied = self.delta_airspeed.clamp(-step, step);
            self.true_airspeed = (self.true_airspeed + applied).clamp(0.0, V_MAX);
            self.delta_airspeed -= applied;
        }

        if self.delta_vertical_speed != 0.0 {
            let step = VERTICAL_ACCEL / tps;
            let applied = self.delta_vertical_speed.clamp(-step, step);
            self.vertical_speed =
                (self.vertical_speed + applied).clamp(-V_VERTICAL_MAX, V_VERTICAL_MAX);
            self.delta_vertical_speed -= applied;
        }

        self.ground_speed = self.true_airspeed;
    }

    /// Recompute the movement vector from track, ground speed and vertical
    /// speed, and integrate it into the position.
    pub fn update_position(&mut self, ticks_per_second: u32) {
        let track_rad = self.track.to_radians();
        self.movement = Vector3::new(
            self.ground_speed * track_rad.sin(),
            self.ground_speed * track_rad.cos(),
            self.vertical_speed,
        );
        self.position += self.movement * (1.0 / ticks_per_second as f64);
        self.pitch = self.vertical_speed.atan2(self.ground_speed).to_degrees();
    }

    /// Write the wind-resolved track and ground speed back onto the state.
    /// The override holds until the next `update_delta`.
    pub fn apply_wind_effect(&mut self, track: f64, ground_speed: f64) {
        self.track = wrap_deg(track);
        self.ground_speed = ground_speed;
    }

    /// Return to the zero state (simulation reset).
    pub fn reset(&mut self) {
        *self = FlightState::default();
    }

    /// Immutable multi-field snapshot for publication.
    pub fn view(&self) -> FlightView {
        FlightView {
            position: self.position,
            movement: self.movement,
            track: self.track,
            heading: self.heading,
            true_airspeed: self.true_airspeed,
            ground_speed: self.ground_speed,
            vertical_speed: self.vertical_speed,
            pitch: self.pitch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TPS: u32 = 10;

    #[test]
    fn test_heading_delta_exact_after_enough_ticks() {
        let mut flight = FlightState::new();
        flight.request_delta_heading(90.0);

        for _ in 0..100 {
            flight.update_delta(TPS);
        }

        assert_eq!(
            flight.heading(),
            90.0,
            "90 degree request at 1 degree/tick should land exactly"
        );
    }

    #[test]
    fn test_heading_turn_rate_bounded() {
        let mut flight = FlightState::new();
        flight.request_delta_heading(90.0);

        let mut previous = flight.heading();
        for _ in 0..90 {
            flight.update_delta(TPS);
            let step = flight.heading() - previous;
            assert!(
                step > 0.0 && step <= 1.0 + 1e-12,
                "per-tick heading change should be at most 1 degree, got {step}"
            );
            previous = flight.heading();
        }
    }

    #[test]
    fn test_heading_wraps_and_takes_signed_direction() {
        let mut flight = FlightState::new();
        flight.set_heading(350.0);
        flight.request_delta_heading(20.0);

        for _ in 0..20 {
            flight.update_delta(TPS);
        }

        assert!(
            (flight.heading() - 10.0).abs() < 1e-9,
            "350 + 20 should wrap to 10, got {}",
            flight.heading()
        );
    }

    #[test]
    fn test_negative_heading_delta() {
        let mut flight = FlightState::new();
        flight.request_delta_heading(-30.0);

        for _ in 0..30 {
            flight.update_delta(TPS);
        }

        assert!(
            (flight.heading() - 330.0).abs() < 1e-9,
            "0 - 30 should wrap to 330, got {}",
            flight.heading()
        );
    }

    #[test]
    fn test_airspeed_monotonic_approach_and_clamp() {
        let mut flight = FlightState::new();
        flight.request_delta_airspeed(100.0); // far beyond V_MAX

        let mut previous = flight.true_airspeed();
        for _ in 0..500 {
            flight.update_delta(TPS);
            assert!(
                flight.true_airspeed() >= previous,
                "airspeed should approach the target monotonically"
            );
            assert!(flight.true_airspeed() <= V_MAX);
            previous = flight.true_airspeed();
        }
        assert_eq!(flight.true_airspeed(), V_MAX);
    }

    #[test]
    fn test_airspeed_step_size() {
        let mut flight = FlightState::new();
        flight.request_delta_airspeed(10.0);
        flight.update_delta(TPS);

        let expected = AIRSPEED_ACCEL / TPS as f64;
        assert!(
            (flight.true_airspeed() - expected).abs() < 1e-12,
            "one tick should apply accel/tps, got {}",
            flight.true_airspeed()
        );
    }

    #[test]
    fn test_vertical_speed_clamped_both_ways() {
        let mut flight = FlightState::new();
        flight.request_delta_vertical_speed(-100.0);
        for _ in 0..1000 {
            flight.update_delta(TPS);
            assert!(flight.vertical_speed() >= -V_VERTICAL_MAX);
        }
        assert_eq!(flight.vertical_speed(), -V_VERTICAL_MAX);
    }

    #[test]
    fn test_set_cancels_pending_delta() {
        let mut flight = FlightState::new();
        flight.request_delta_heading(90.0);
        flight.update_delta(TPS);
        assert!(flight.heading() > 0.0);

        flight.set_heading(180.0);
        flight.update_delta(TPS);
        assert_eq!(
            flight.heading(),
            180.0,
            "a direct set should cancel the in-flight request"
        );
    }

    #[test]
    fn test_ground_speed_mirrors_airspeed_after_update_delta() {
        let mut flight = FlightState::new();
        flight.set_airspeed(10.0);
        flight.apply_wind_effect(45.0, 13.0);
        assert_eq!(flight.ground_speed(), 13.0);

        flight.update_delta(TPS);
        assert_eq!(
            flight.ground_speed(),
            10.0,
            "the wind override should last only until the next delta step"
        );
    }

    #[test]
    fn test_position_integration_straight_line() {
        let mut flight = FlightState::new();
        flight.set_airspeed(10.0);
        flight.apply_wind_effect(90.0, 10.0); // due East

        for _ in 0..TPS * 5 {
            flight.update_position(TPS);
        }

        let pos = flight.position();
        assert!(
            (pos.x - 50.0).abs() < 1e-9,
            "5 s at 10 m/s East should move x by 50, got {}",
            pos.x
        );
        assert!(pos.y.abs() < 1e-9, "no North displacement, got {}", pos.y);
        assert!(pos.z.abs() < 1e-12);
    }

    #[test]
    fn test_movement_vector_decomposition() {
        let mut flight = FlightState::new();
        flight.set_airspeed(10.0);
        flight.set_vertical_speed(2.0);
        flight.apply_wind_effect(0.0, 10.0); // due North
        flight.update_position(TPS);

        let movement = flight.movement();
        assert!(movement.x.abs() < 1e-9);
        assert!((movement.y - 10.0).abs() < 1e-9);
        assert!((movement.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_returns_to_zero_state() {
        let mut flight = FlightState::new();
        flight.set_airspeed(10.0);
        flight.request_delta_heading(45.0);
        flight.update_delta(TPS);
        flight.update_position(TPS);

        flight.reset();
        assert_eq!(flight.view(), FlightView::default());
    }
}
