//! Real-time runtime for SKYWARD: the tick-loop thread and the autopilot
//! coordination protocol.
//!
//! Two long-lived threads: the tick loop (sole mutator of simulation
//! state) and the autopilot (caller-supplied logic). They meet at two
//! slots: the single-slot delta-request exchange and the await-condition
//! rendezvous. Everything else reads published TickEvent snapshots.

pub mod autopilot;
pub mod runner;
pub mod shared;

pub use autopilot::{AutopilotCoordinator, AutopilotHandle, AwaitError, CoordinatorState};
pub use runner::{RunnerError, RunnerState, SimulationRunner};
