//! Simulation engine for SKYWARD.
//!
//! Owns the vehicle kinematics, the layered wind field, the range sensors
//! and the collision backend, and advances them tick by tick, producing
//! TickEvents for the runtime to publish.

pub mod collision;
pub mod engine;
pub mod flight;
pub mod obstacles;
pub mod sensor;
pub mod wind;

pub use engine::SimulationEngine;
pub use skyward_core as core;

#[cfg(test)]
mod tests;
