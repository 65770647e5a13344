//! The obstacle-intersection oracle consumed by sensors.
//!
//! The simulation core depends only on this interface; any collision
//! backend (a physics engine, a spatial index, a test stub) can stand
//! behind it.

use skyward_core::types::{ObstacleId, Vector3};

/// One raw intersection reported by the collision backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitMark {
    /// Distance from the query origin to the hit (meters, >= 0).
    pub distance: f64,
    /// Hit location in world coordinates.
    pub world_point: Vector3,
    /// Hit location relative to the query origin.
    pub relative_point: Vector3,
    /// Which obstacle was hit. Grouping during reduction is by equality
    /// of this handle.
    pub obstacle: ObstacleId,
}

/// Abstract obstacle-intersection queries, one per sensing-volume shape.
///
/// An empty result means "no obstacle in range", never an error. For the
/// cone and pyramid, `opening` is a unit vector on the volume's lateral
/// surface; the half-angle between it and `direction` defines the spread.
/// For the cuboid and cylinder, `dimensions` is (lateral half-extent,
/// axial length, vertical half-extent) — the cylinder uses `dimensions.x`
/// as its radius.
pub trait CollisionQuery: Send {
    fn query_cone(
        &self,
        origin: Vector3,
        direction: Vector3,
        range: f64,
        opening: Vector3,
    ) -> Vec<HitMark>;

    fn query_pyramid(
        &self,
        origin: Vector3,
        direction: Vector3,
        range: f64,
        opening: Vector3,
    ) -> Vec<HitMark>;

    fn query_cuboid(&self, origin: Vector3, direction: Vector3, dimensions: Vector3)
        -> Vec<HitMark>;

    fn query_cylinder(
        &self,
        origin: Vector3,
        direction: Vector3,
        dimensions: Vector3,
    ) -> Vec<HitMark>;
}
