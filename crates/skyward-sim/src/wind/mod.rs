//! Layered, time-varying wind.

pub mod field;
pub mod layer;

pub use field::WindField;
pub use layer::{WindEffect, WindLayer};
