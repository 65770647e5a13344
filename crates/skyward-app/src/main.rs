//! Headless demo mission: a drone climbs out of a calm surface layer into
//! a windy one, flies a square pattern through a ring of obstacles, and
//! reports what its sensors see. One snapshot JSON line per simulated
//! second on stdout.

use std::f64::consts::TAU;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use skyward_core::config::{SensorConfig, SimConfig, WindLayerConfig};
use skyward_core::enums::{ReductionPolicy, SensorForm};
use skyward_core::events::DeltaRequest;
use skyward_core::types::Vector3;
use skyward_runtime::SimulationRunner;
use skyward_sim::obstacles::ObstacleField;

fn mission_config() -> SimConfig {
    SimConfig {
        seed: 7,
        ticks_per_second: 20,
        speedup: 10.0,
        wind_layers: vec![
            // Calm surface layer, then a gusty westerly band above 40m.
            WindLayerConfig {
                steady_speed: 1.0,
                gust_speed: 2.0,
                direction_deg: 90.0,
                time_start: 0.0,
                time_end: 3600.0,
                altitude_bottom: 0.0,
                altitude_top: 40.0,
            },
            WindLayerConfig {
                steady_speed: 4.0,
                gust_speed: 9.0,
                direction_deg: 90.0,
                time_start: 0.0,
                time_end: 3600.0,
                altitude_bottom: 40.0,
                altitude_top: 400.0,
            },
        ],
        sensors: vec![
            SensorConfig {
                name: "forward".into(),
                mount_position: Vector3::new(0.0, 0.4, 0.0),
                boresight: Vector3::new(0.0, 1.0, 0.0),
                aperture_deg: 25.0,
                surface_radius: 0.15,
                range: 120.0,
                accuracy: 0.1,
                form: SensorForm::Cone,
                reduction: ReductionPolicy::Nearest,
            },
            SensorConfig {
                name: "down".into(),
                mount_position: Vector3::new(0.0, 0.0, -0.1),
                boresight: Vector3::new(0.0, 0.0, -1.0),
                aperture_deg: 35.0,
                surface_radius: 0.1,
                range: 150.0,
                accuracy: 0.1,
                form: SensorForm::Cone,
                reduction: ReductionPolicy::Average,
            },
        ],
    }
}

/// A ring of pylons around the pattern, plus the ground return.
fn obstacle_course() -> ObstacleField {
    let mut field = ObstacleField::new();
    for i in 0..8 {
        let bearing = i as f64 / 8.0 * TAU;
        field.spawn(
            Vector3::new(250.0 * bearing.sin(), 250.0 * bearing.cos(), 60.0),
            8.0,
        );
    }
    // Ground reflector below the pattern center.
    field.spawn(Vector3::new(0.0, 0.0, -5.0), 5.0);
    field
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = mission_config();
    let mission_secs = 120.0;
    let wall = Duration::from_secs_f64(mission_secs / config.speedup);

    let mut runner = SimulationRunner::from_config(config, Box::new(obstacle_course()))?;

    runner.on_tick(|event| {
        if event.time.tick % event.ticks_per_second as u64 == 0 {
            if let Ok(line) = serde_json::to_string(event) {
                println!("{line}");
            }
        }
    })?;

    let (done_tx, done_rx) = mpsc::channel();
    runner.spawn_autopilot(move |pilot| {
        let fly = || -> Result<(), skyward_runtime::AwaitError> {
            // Climb into the windy layer.
            pilot.request_delta(DeltaRequest {
                airspeed_delta: 12.0,
                vertical_speed_delta: 5.0,
                ..Default::default()
            });
            pilot.await_condition(|event| event.flight.position.z >= 60.0)?;
            pilot.request_delta(DeltaRequest::vertical_speed(-5.0));
            pilot.await_condition(|event| event.flight.vertical_speed.abs() < 0.1)?;

            // Four 90-degree legs of 20 simulated seconds each.
            for leg in 0..4 {
                pilot.request_delta(DeltaRequest::heading(90.0));
                pilot.await_condition(move |event| {
                    (event.flight.heading - (leg + 1) as f64 * 90.0).rem_euclid(360.0) < 0.5
                })?;
                let mark = pilot.await_condition(|event| event.time.tick % 20 == 0)?;
                let leg_end = mark.time.elapsed_secs + 20.0;
                pilot.await_condition(move |event| event.time.elapsed_secs >= leg_end)?;
            }
            Ok(())
        };
        // A cancelled wait means the mission was stopped from outside.
        let _ = fly();
        let _ = done_tx.send(());
    })?;

    runner.start()?;

    // Let the mission run its course, or its wall-clock budget.
    let _ = done_rx.recv_timeout(wall);
    runner.stop();

    if let Some(event) = runner.latest_event() {
        eprintln!(
            "mission complete: t={:.1}s position=({:.1}, {:.1}, {:.1})",
            event.time.elapsed_secs,
            event.flight.position.x,
            event.flight.position.y,
            event.flight.position.z,
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
