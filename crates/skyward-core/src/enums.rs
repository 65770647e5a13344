//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Geometric form of a sensor's sensing volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorForm {
    /// Circular cone opening from the derived apex.
    #[default]
    Cone,
    /// Square-section pyramid opening from the derived apex.
    Pyramid,
    /// Axis-aligned box extruded along the boresight.
    Cuboid,
    /// Cylinder extruded along the boresight.
    Cylinder,
}

/// Rule for collapsing multiple hits on the same obstacle into one distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionPolicy {
    /// Report the smallest hit distance in the group.
    #[default]
    Nearest,
    /// Report the largest hit distance in the group.
    Farthest,
    /// Report the arithmetic mean of the group's hit distances.
    Average,
}
