//! Tests for the engine tick pipeline: kinematics, wind, sensing, reset.

use skyward_core::config::{SensorConfig, SimConfig, WindLayerConfig};
use skyward_core::enums::{ReductionPolicy, SensorForm};
use skyward_core::events::DeltaRequest;
use skyward_core::types::Vector3;

use crate::engine::SimulationEngine;
use crate::obstacles::ObstacleField;

const TPS: u32 = 10;

fn base_config() -> SimConfig {
    SimConfig {
        ticks_per_second: TPS,
        ..Default::default()
    }
}

fn wind_layer(steady: f64, gust: f64, direction_deg: f64) -> WindLayerConfig {
    WindLayerConfig {
        steady_speed: steady,
        gust_speed: gust,
        direction_deg,
        time_start: 0.0,
        time_end: 3600.0,
        altitude_bottom: 0.0,
        altitude_top: 500.0,
    }
}

fn forward_sensor(name: &str) -> SensorConfig {
    SensorConfig {
        name: name.into(),
        mount_position: Vector3::new(0.0, 0.5, 0.0),
        boresight: Vector3::new(0.0, 1.0, 0.0),
        aperture_deg: 20.0,
        surface_radius: 0.1,
        range: 40.0,
        accuracy: 0.0,
        form: SensorForm::Cone,
        reduction: ReductionPolicy::Nearest,
    }
}

fn engine_with(config: SimConfig, field: ObstacleField) -> SimulationEngine {
    SimulationEngine::new(config, Box::new(field)).expect("config should be valid")
}

// ---- Tick timing ----

#[test]
fn test_tick_timing_one_second() {
    let mut engine = engine_with(base_config(), ObstacleField::new());

    for _ in 0..TPS {
        engine.tick(None);
    }

    assert_eq!(engine.time().tick, TPS as u64);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-10,
        "{TPS} ticks should equal 1.0 seconds, got {}",
        engine.time().elapsed_secs
    );
}

// ---- Delta requests through the pipeline ----

#[test]
fn test_heading_delta_lands_exactly() {
    let mut engine = engine_with(base_config(), ObstacleField::new());

    engine.tick(Some(DeltaRequest::heading(90.0)));
    for _ in 0..99 {
        engine.tick(None);
    }

    assert_eq!(
        engine.flight().heading(),
        90.0,
        "a 90 degree request at 10 ticks/s should land exactly within 100 ticks"
    );
}

#[test]
fn test_delta_request_consumed_once() {
    let mut engine = engine_with(base_config(), ObstacleField::new());

    engine.tick(Some(DeltaRequest::airspeed(1.0)));
    for _ in 0..20 {
        engine.tick(None);
    }

    assert!(
        (engine.flight().true_airspeed() - 1.0).abs() < 1e-9,
        "the request must apply once, not per tick: got {}",
        engine.flight().true_airspeed()
    );
}

#[test]
fn test_straight_line_displacement() {
    let mut engine = engine_with(base_config(), ObstacleField::new());
    engine.flight_mut().set_airspeed(10.0);
    engine.flight_mut().set_heading(90.0);

    // One tick to let the calm wind align track with heading.
    engine.tick(None);
    let start = engine.flight().position();

    for _ in 0..TPS * 10 {
        engine.tick(None);
    }

    let displacement = engine.flight().position() - start;
    assert!(
        (displacement.x - 100.0).abs() < 1e-6,
        "10 s due East at 10 m/s should displace x by 100, got {}",
        displacement.x
    );
    assert!(displacement.y.abs() < 1e-6);
}

// ---- Wind through the pipeline ----

#[test]
fn test_tailwind_ground_speed_in_event() {
    let mut config = base_config();
    config.wind_layers = vec![wind_layer(3.0, 3.0, 210.0)];
    let mut engine = engine_with(config, ObstacleField::new());

    engine.flight_mut().set_position(Vector3::new(0.0, 0.0, 100.0));
    engine.flight_mut().set_heading(210.0);
    engine.flight_mut().set_airspeed(10.0);

    // Past the band-edge blend zone, the layer's effect applies exactly.
    let mut event = engine.tick(None);
    for _ in 0..60 {
        event = engine.tick(None);
    }
    assert!(
        (event.flight.ground_speed - 13.0).abs() < 1e-9,
        "direct tailwind: ground speed should be 13, got {}",
        event.flight.ground_speed
    );
    assert!((event.flight.track - 210.0).abs() < 1e-9);
}

#[test]
fn test_headwind_ground_speed_in_event() {
    let mut config = base_config();
    config.wind_layers = vec![wind_layer(3.0, 3.0, 210.0)];
    let mut engine = engine_with(config, ObstacleField::new());

    engine.flight_mut().set_position(Vector3::new(0.0, 0.0, 100.0));
    engine.flight_mut().set_heading(30.0);
    engine.flight_mut().set_airspeed(10.0);

    let mut event = engine.tick(None);
    for _ in 0..60 {
        event = engine.tick(None);
    }
    assert!(
        (event.flight.ground_speed - 7.0).abs() < 1e-9,
        "direct headwind: ground speed should be 7, got {}",
        event.flight.ground_speed
    );
}

// ---- Sensors through the pipeline ----

#[test]
fn test_sensor_contacts_in_event() {
    let mut field = ObstacleField::new();
    let id = field.spawn(Vector3::new(0.0, 20.0, 0.0), 1.0);
    let mut config = base_config();
    config.sensors = vec![forward_sensor("fwd")];
    let mut engine = engine_with(config, field);

    let event = engine.tick(None);
    assert_eq!(event.sensors.len(), 1);
    assert_eq!(event.sensors[0].sensor, "fwd");
    assert_eq!(event.sensors[0].contacts.len(), 1);
    assert_eq!(event.sensors[0].contacts[0].obstacle, id);
}

#[test]
fn test_degenerate_sensor_does_not_halt_tick() {
    let mut field = ObstacleField::new();
    field.spawn(Vector3::new(0.0, 20.0, 0.0), 1.0);

    let mut broken = forward_sensor("broken");
    broken.aperture_deg = 0.0; // no well-defined volume
    let mut config = base_config();
    config.sensors = vec![broken, forward_sensor("fwd")];
    let mut engine = engine_with(config, field);

    let event = engine.tick(None);
    assert!(
        event.sensors[0].contacts.is_empty(),
        "the degenerate sensor reports nothing"
    );
    assert_eq!(
        event.sensors[1].contacts.len(),
        1,
        "the healthy sensor still samples"
    );
}

// ---- Configuration rejection ----

#[test]
fn test_invalid_config_rejected_with_all_violations() {
    let mut config = base_config();
    config.wind_layers = vec![
        wind_layer(3.0, 1.0, 0.0), // gust below steady
        wind_layer(2.0, 2.0, 400.0), // bad direction, overlaps the first
    ];

    let errors = SimulationEngine::new(config, Box::new(ObstacleField::new()))
        .err()
        .expect("load should be rejected")
        .0;

    assert_eq!(
        errors.len(),
        3,
        "gust bound, direction range and overlap should all be reported: {errors:?}"
    );
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let make = || {
        let mut config = base_config();
        config.seed = 12345;
        config.wind_layers = vec![wind_layer(2.0, 6.0, 45.0)];
        let mut engine = engine_with(config, ObstacleField::new());
        engine.flight_mut().set_position(Vector3::new(0.0, 0.0, 100.0));
        engine.flight_mut().set_airspeed(10.0);
        engine
    };
    let mut engine_a = make();
    let mut engine_b = make();

    for _ in 0..300 {
        let event_a = engine_a.tick(None);
        let event_b = engine_b.tick(None);

        let json_a = serde_json::to_string(&event_a).unwrap();
        let json_b = serde_json::to_string(&event_b).unwrap();
        assert_eq!(json_a, json_b, "events diverged with the same seed");
    }
}

// ---- Reset ----

#[test]
fn test_reset_returns_to_zero_state() {
    let mut config = base_config();
    config.wind_layers = vec![wind_layer(3.0, 3.0, 210.0)];
    config.sensors = vec![forward_sensor("fwd")];
    let mut field = ObstacleField::new();
    field.spawn(Vector3::new(0.0, 20.0, 0.0), 1.0);
    let mut engine = engine_with(config, field);

    engine.flight_mut().set_airspeed(10.0);
    for _ in 0..50 {
        engine.tick(None);
    }
    assert!(engine.time().tick > 0);

    engine.reset();
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.flight().position(), Vector3::ZERO);
    assert_eq!(engine.flight().true_airspeed(), 0.0);
    assert!(engine.sensors()[0].result().contacts.is_empty());
}
