//! Sphere-obstacle field: the built-in collision backend.
//!
//! Obstacles live as entities in a hecs world. Queries are analytic
//! shape-vs-sphere overlap tests; each overlapping obstacle yields one
//! HitMark at its near surface point.

use hecs::World;

use skyward_core::types::{ObstacleId, Vector3};

use crate::collision::{CollisionQuery, HitMark};

/// Sphere obstacle component.
#[derive(Debug, Clone, Copy)]
struct Obstacle {
    radius: f64,
}

/// Obstacle store implementing `CollisionQuery`.
pub struct ObstacleField {
    world: World,
    next_id: u32,
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            next_id: 0,
        }
    }

    /// Add a sphere obstacle and return its handle.
    pub fn spawn(&mut self, center: Vector3, radius: f64) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.world.spawn((id, center, Obstacle { radius }));
        id
    }

    /// Remove an obstacle. Returns false if the handle is unknown.
    pub fn remove(&mut self, id: ObstacleId) -> bool {
        let entity = {
            let mut query = self.world.query::<&ObstacleId>();
            query
                .iter()
                .find(|(_, obstacle_id)| **obstacle_id == id)
                .map(|(entity, _)| entity)
        };
        match entity {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    fn collect_hits(
        &self,
        origin: Vector3,
        mut overlaps: impl FnMut(Vector3, f64) -> bool,
    ) -> Vec<HitMark> {
        let mut hits = Vec::new();
        let mut query = self.world.query::<(&ObstacleId, &Vector3, &Obstacle)>();
        for (_entity, (id, center, obstacle)) in query.iter() {
            if overlaps(*center, obstacle.radius) {
                hits.push(hit_at_near_surface(origin, *center, obstacle.radius, *id));
            }
        }
        hits
    }
}

impl CollisionQuery for ObstacleField {
    fn query_cone(
        &self,
        origin: Vector3,
        direction: Vector3,
        range: f64,
        opening: Vector3,
    ) -> Vec<HitMark> {
        let axis = direction.normalized();
        let open = opening.normalized();
        if !origin.is_finite() || axis.is_nan() || open.is_nan() {
            return Vec::new();
        }
        let half_angle = axis.dot(&open).clamp(-1.0, 1.0).acos();

        self.collect_hits(origin, |center, radius| {
            let to = center - origin;
            let axial = to.dot(&axis);
            if axial + radius < 0.0 || axial - radius > range {
                return false;
            }
            let dist_center = to.length();
            if dist_center <= radius {
                return true; // query origin inside the sphere
            }
            // The sphere widens the acceptance cone by its angular radius.
            let angle = (axial / dist_center).clamp(-1.0, 1.0).acos();
            let allowance = (radius / dist_center).clamp(0.0, 1.0).asin();
            angle <= half_angle + allowance
        })
    }

    fn query_pyramid(
        &self,
        origin: Vector3,
        direction: Vector3,
        range: f64,
        opening: Vector3,
    ) -> Vec<HitMark> {
        let axis = direction.normalized();
        let open = opening.normalized();
        if !origin.is_finite() || axis.is_nan() || open.is_nan() {
            return Vec::new();
        }
        let half_angle = axis.dot(&open).clamp(-1.0, 1.0).acos();
        let tan_half = half_angle.tan();
        let (u, v) = lateral_frame(axis);

        self.collect_hits(origin, |center, radius| {
            let to = center - origin;
            let axial = to.dot(&axis);
            if axial + radius < 0.0 || axial - radius > range {
                return false;
            }
            let limit = axial.max(0.0) * tan_half + radius;
            to.dot(&u).abs() <= limit && to.dot(&v).abs() <= limit
        })
    }

    fn query_cuboid(
        &self,
        origin: Vector3,
        direction: Vector3,
        dimensions: Vector3,
    ) -> Vec<HitMark> {
        let axis = direction.normalized();
        if !origin.is_finite() || axis.is_nan() {
            return Vec::new();
        }
        let (u, v) = lateral_frame(axis);

        self.collect_hits(origin, |center, radius| {
            let to = center - origin;
            let axial = to.dot(&axis);
            axial + radius >= 0.0
                && axial - radius <= dimensions.y
                && to.dot(&u).abs() <= dimensions.x + radius
                && to.dot(&v).abs() <= dimensions.z + radius
        })
    }

    fn query_cylinder(
        &self,
        origin: Vector3,
        direction: Vector3,
        dimensions: Vector3,
    ) -> Vec<HitMark> {
        let axis = direction.normalized();
        if !origin.is_finite() || axis.is_nan() {
            return Vec::new();
        }

        self.collect_hits(origin, |center, radius| {
            let to = center - origin;
            let axial = to.dot(&axis);
            if axial + radius < 0.0 || axial - radius > dimensions.y {
                return false;
            }
            let radial = (to.length_squared() - axial * axial).max(0.0).sqrt();
            radial <= dimensions.x + radius
        })
    }
}

/// Orthonormal lateral axes perpendicular to the query axis: `u` horizontal,
/// `v` completing the right-handed frame. A vertical axis falls back to East.
fn lateral_frame(axis: Vector3) -> (Vector3, Vector3) {
    let horizontal = Vector3::new(axis.y, -axis.x, 0.0).normalized();
    let u = if horizontal.is_nan() {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        horizontal
    };
    let v = axis.cross(&u);
    (u, v)
}

/// HitMark at the sphere's near surface point toward the query origin.
fn hit_at_near_surface(
    origin: Vector3,
    center: Vector3,
    radius: f64,
    id: ObstacleId,
) -> HitMark {
    let to = center - origin;
    let dist_center = to.length();
    let world_point = if dist_center > radius {
        center - to.normalized() * radius
    } else {
        origin
    };
    HitMark {
        distance: (dist_center - radius).max(0.0),
        world_point,
        relative_point: world_point - origin,
        obstacle: id,
    }
}
