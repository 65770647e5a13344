//! Core types and definitions for the SKYWARD simulator.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometric types, configuration records, state views, events, and
//! constants. It has no dependency on any runtime framework.

pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
