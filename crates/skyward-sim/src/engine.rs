//! Simulation engine — the core of the simulator.
//!
//! `SimulationEngine` owns the vehicle state, the wind field, the sensors
//! and the collision backend, and advances them one tick at a time.
//! Completely headless (no thread or clock dependency), enabling
//! deterministic testing; the runtime crate drives it in real time.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyward_core::config::{ConfigErrors, SimConfig};
use skyward_core::events::{DeltaRequest, TickEvent};
use skyward_core::types::SimTime;

use crate::collision::CollisionQuery;
use crate::flight::FlightState;
use crate::sensor::Sensor;
use crate::wind::WindField;

/// The headless simulation engine.
pub struct SimulationEngine {
    flight: FlightState,
    wind: WindField,
    sensors: Vec<Sensor>,
    collision: Box<dyn CollisionQuery>,
    rng: ChaCha8Rng,
    time: SimTime,
    ticks_per_second: u32,
}

impl SimulationEngine {
    /// Build an engine from a configuration and a collision backend.
    ///
    /// The whole configuration is validated first; a rejected load reports
    /// every violation and activates nothing.
    pub fn new(
        config: SimConfig,
        collision: Box<dyn CollisionQuery>,
    ) -> Result<Self, ConfigErrors> {
        let config = config.validated()?;
        Ok(Self {
            flight: FlightState::new(),
            wind: WindField::from_config(&config.wind_layers),
            sensors: config.sensors.iter().map(Sensor::from_config).collect(),
            collision,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time: SimTime::default(),
            ticks_per_second: config.ticks_per_second,
        })
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// The live vehicle state. Only the tick thread may hold this mutably;
    /// other threads consume published TickEvents.
    pub fn flight(&self) -> &FlightState {
        &self.flight
    }

    /// Mutable vehicle state for scenario setup before ticking starts.
    pub fn flight_mut(&mut self) -> &mut FlightState {
        &mut self.flight
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Advance the simulation by one tick and return the published event.
    ///
    /// Order within a tick is fixed: apply at most one pending delta
    /// request, integrate deltas, integrate position, apply wind, sample
    /// all sensors, then build the event from the fully-integrated state.
    pub fn tick(&mut self, pending: Option<DeltaRequest>) -> TickEvent {
        if let Some(request) = pending {
            self.flight.apply_request(request);
        }

        self.flight.update_delta(self.ticks_per_second);
        self.flight.update_position(self.ticks_per_second);
        self.wind
            .apply(&mut self.flight, self.time.elapsed_secs, &mut self.rng);

        let position = self.flight.position();
        for sensor in &mut self.sensors {
            sensor.sample(position, self.collision.as_ref());
        }

        self.time.advance(1.0 / self.ticks_per_second as f64);

        TickEvent {
            time: self.time,
            ticks_per_second: self.ticks_per_second,
            flight: self.flight.view(),
            sensors: self.sensors.iter().map(|s| s.result().clone()).collect(),
        }
    }

    /// Return the vehicle and clock to the zero state.
    pub fn reset(&mut self) {
        self.flight.reset();
        self.wind.reset();
        for sensor in &mut self.sensors {
            sensor.reset();
        }
        self.time = SimTime::default();
    }
}
