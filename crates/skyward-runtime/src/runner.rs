//! Tick-loop thread — drives the engine at wall-clock rate and publishes
//! events.
//!
//! The engine moves into the loop thread at start; commands arrive via an
//! `mpsc` channel, delta requests via the single-slot exchange, and every
//! tick's event goes out synchronously to observers, the latest-event slot,
//! and the autopilot condition slot before the next tick fires.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use thiserror::Error;

use skyward_core::config::{ConfigErrors, SimConfig};
use skyward_core::events::{DeltaRequest, TickEvent};
use skyward_sim::collision::CollisionQuery;
use skyward_sim::SimulationEngine;

use crate::autopilot::{AutopilotCoordinator, AutopilotHandle, CoordinatorState};
use crate::shared::{ConditionSlot, DeltaSlot};

/// Observer callback, invoked synchronously after every tick, in tick order.
pub type Observer = Box<dyn Fn(&TickEvent) + Send>;

/// Runner lifecycle. Stopped is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnerState {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunnerError {
    #[error("the runner can only do this while idle")]
    NotIdle,
    #[error("speedup is fixed once the simulation has started")]
    SpeedupLocked,
    #[error("speedup must be > 0")]
    InvalidSpeedup,
    #[error("the autopilot routine was already started")]
    AutopilotAlreadyStarted,
}

enum LoopCommand {
    Shutdown,
}

/// Everything the loop thread shares with the outside.
struct LoopShared {
    observers: Vec<Observer>,
    delta_slot: Arc<DeltaSlot>,
    condition: Arc<ConditionSlot>,
    latest: Arc<Mutex<Option<TickEvent>>>,
}

/// Owns the tick-loop thread, the autopilot coordinator, and the shared
/// slots connecting them.
pub struct SimulationRunner {
    state: RunnerState,
    /// Present while Idle; moves into the loop thread at start.
    engine: Option<SimulationEngine>,
    speedup: f64,
    observers: Vec<Observer>,
    delta_slot: Arc<DeltaSlot>,
    condition: Arc<ConditionSlot>,
    latest: Arc<Mutex<Option<TickEvent>>>,
    autopilot: AutopilotCoordinator,
    command_tx: Option<mpsc::Sender<LoopCommand>>,
    thread: Option<JoinHandle<()>>,
}

impl SimulationRunner {
    /// Build a runner around an already-constructed engine.
    pub fn new(engine: SimulationEngine, speedup: f64) -> Self {
        let delta_slot = Arc::new(DeltaSlot::default());
        let condition = Arc::new(ConditionSlot::new());
        Self {
            state: RunnerState::Idle,
            engine: Some(engine),
            speedup,
            observers: Vec::new(),
            delta_slot: delta_slot.clone(),
            condition: condition.clone(),
            latest: Arc::new(Mutex::new(None)),
            autopilot: AutopilotCoordinator::new(condition, delta_slot),
            command_tx: None,
            thread: None,
        }
    }

    /// Validate a configuration, build the engine, and wrap it in a runner.
    /// A rejected load surfaces every violation before anything ticks.
    pub fn from_config(
        config: SimConfig,
        collision: Box<dyn CollisionQuery>,
    ) -> Result<Self, ConfigErrors> {
        let speedup = config.speedup;
        let engine = SimulationEngine::new(config, collision)?;
        Ok(Self::new(engine, speedup))
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn autopilot_state(&self) -> CoordinatorState {
        self.autopilot.state()
    }

    /// The engine, for scenario setup. Present only while Idle.
    pub fn engine_mut(&mut self) -> Option<&mut SimulationEngine> {
        self.engine.as_mut()
    }

    /// Change the wall-clock speedup. Rejected once the simulation has
    /// started.
    pub fn set_speedup(&mut self, speedup: f64) -> Result<(), RunnerError> {
        if self.state != RunnerState::Idle {
            return Err(RunnerError::SpeedupLocked);
        }
        if !(speedup > 0.0) {
            return Err(RunnerError::InvalidSpeedup);
        }
        self.speedup = speedup;
        Ok(())
    }

    /// Register an observer for published tick events. Observers move into
    /// the loop thread at start, so registration is only possible while Idle.
    pub fn on_tick(
        &mut self,
        observer: impl Fn(&TickEvent) + Send + 'static,
    ) -> Result<(), RunnerError> {
        if self.state != RunnerState::Idle {
            return Err(RunnerError::NotIdle);
        }
        self.observers.push(Box::new(observer));
        Ok(())
    }

    /// Launch the autopilot routine on its own thread.
    pub fn spawn_autopilot(
        &mut self,
        routine: impl FnOnce(AutopilotHandle) + Send + 'static,
    ) -> Result<(), RunnerError> {
        self.autopilot.start(routine)
    }

    /// A protocol handle, for driving the simulation from the outside
    /// (diagnostics, tests) rather than from the autopilot thread.
    pub fn handle(&self) -> AutopilotHandle {
        AutopilotHandle {
            condition: self.condition.clone(),
            delta_slot: self.delta_slot.clone(),
        }
    }

    /// Overwrite the pending delta request (last write wins).
    pub fn request_delta(&self, request: DeltaRequest) {
        self.delta_slot.put(request);
    }

    /// The most recently published event, if any tick has fired yet.
    pub fn latest_event(&self) -> Option<TickEvent> {
        self.latest.lock().expect("latest event slot poisoned").clone()
    }

    /// Idle -> Running: begin firing ticks at tick rate x speedup.
    pub fn start(&mut self) -> Result<(), RunnerError> {
        if self.state != RunnerState::Idle {
            return Err(RunnerError::NotIdle);
        }
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => return Err(RunnerError::NotIdle),
        };

        let (command_tx, command_rx) = mpsc::channel();
        let shared = LoopShared {
            observers: std::mem::take(&mut self.observers),
            delta_slot: self.delta_slot.clone(),
            condition: self.condition.clone(),
            latest: self.latest.clone(),
        };
        let speedup = self.speedup;

        self.thread = Some(
            std::thread::Builder::new()
                .name("skyward-tick-loop".into())
                .spawn(move || run_tick_loop(engine, command_rx, shared, speedup))
                .expect("failed to spawn tick loop thread"),
        );
        self.command_tx = Some(command_tx);
        self.state = RunnerState::Running;
        Ok(())
    }

    /// Running -> Stopped (terminal). Any blocked autopilot wait is released
    /// via cancellation, not a satisfied condition.
    pub fn stop(&mut self) {
        if self.state == RunnerState::Running {
            if let Some(command_tx) = self.command_tx.take() {
                let _ = command_tx.send(LoopCommand::Shutdown);
            }
            self.condition.cancel();
            if let Some(thread) = self.thread.take() {
                let _ = thread.join();
            }
        }
        self.autopilot.stop();
        self.state = RunnerState::Stopped;
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The tick loop. Runs until a Shutdown command or channel disconnect.
fn run_tick_loop(
    mut engine: SimulationEngine,
    commands: mpsc::Receiver<LoopCommand>,
    shared: LoopShared,
    speedup: f64,
) {
    let tick_duration =
        Duration::from_secs_f64(1.0 / engine.ticks_per_second() as f64).div_f64(speedup);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Commands first, so a shutdown never fires another tick.
        match commands.try_recv() {
            Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => return,
            Err(mpsc::TryRecvError::Empty) => {}
        }

        // 2. Drain at most one pending delta request and advance one tick.
        let pending = shared.delta_slot.take();
        let event = engine.tick(pending);

        // 3. Publish synchronously, in tick order, before the next tick.
        if let Ok(mut latest) = shared.latest.lock() {
            *latest = Some(event.clone());
        }
        for observer in &shared.observers {
            observer(&event);
        }
        shared.condition.publish(&event);

        // 4. Sleep until the next tick boundary.
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind — reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
