//! Range sensors: volume derivation, sampling, and hit aggregation.

pub mod geometry;
pub mod sampling;

use skyward_core::config::SensorConfig;
use skyward_core::enums::{ReductionPolicy, SensorForm};
use skyward_core::state::SensorResult;
use skyward_core::types::Vector3;

use crate::collision::CollisionQuery;

/// One sensor instance: fixed mounting geometry plus the latest result.
#[derive(Debug, Clone)]
pub struct Sensor {
    name: String,
    mount_position: Vector3,
    boresight: Vector3,
    range: f64,
    surface_radius: f64,
    accuracy: f64,
    form: SensorForm,
    reduction: ReductionPolicy,
    /// Apex of the sensing volume in the body frame. NAN when the
    /// configured geometry is degenerate.
    origin: Vector3,
    /// Unit vector on the volume's lateral surface.
    opening: Vector3,
    /// Axial extent from apex to range limit.
    cone_height: f64,
    result: SensorResult,
}

impl Sensor {
    /// Derive the sensing volume from a validated config. A degenerate
    /// geometry yields a sensor that reports no contacts rather than an
    /// error.
    pub fn from_config(config: &SensorConfig) -> Self {
        let boresight = config.boresight.normalized();
        let origin = geometry::derive_origin(
            config.mount_position,
            config.boresight,
            config.aperture_deg,
            config.surface_radius,
        );
        let opening = geometry::derive_opening_vector(config.boresight, config.aperture_deg);
        let cone_height = geometry::derive_cone_height(config.mount_position, origin, config.range);

        Self {
            name: config.name.clone(),
            mount_position: config.mount_position,
            boresight,
            range: config.range,
            surface_radius: config.surface_radius,
            accuracy: config.accuracy,
            form: config.form,
            reduction: config.reduction,
            origin,
            opening,
            cone_height,
            result: SensorResult {
                sensor: config.name.clone(),
                contacts: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mounting position in the vehicle body frame.
    pub fn mount_position(&self) -> Vector3 {
        self.mount_position
    }

    /// Apex of the sensing volume in the body frame (NAN when degenerate).
    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn opening(&self) -> Vector3 {
        self.opening
    }

    pub fn cone_height(&self) -> f64 {
        self.cone_height
    }

    /// The latest aggregate measurement.
    pub fn result(&self) -> &SensorResult {
        &self.result
    }

    /// Run one sensing pass and replace the previous result wholesale.
    ///
    /// A sensor without a well-defined volume reports no contacts; the
    /// tick carries on for every other sensor.
    pub fn sample(&mut self, vehicle_position: Vector3, collision: &dyn CollisionQuery) {
        if self.origin.is_nan() || self.opening.is_nan() || self.boresight.is_nan() {
            self.result = SensorResult {
                sensor: self.name.clone(),
                contacts: Vec::new(),
            };
            return;
        }

        let origin = vehicle_position + self.origin;
        let hits = match self.form {
            SensorForm::Cone => {
                collision.query_cone(origin, self.boresight, self.cone_height, self.opening)
            }
            SensorForm::Pyramid => {
                collision.query_pyramid(origin, self.boresight, self.cone_height, self.opening)
            }
            SensorForm::Cuboid => collision.query_cuboid(
                origin,
                self.boresight,
                self.lateral_dimensions(),
            ),
            SensorForm::Cylinder => collision.query_cylinder(
                origin,
                self.boresight,
                self.lateral_dimensions(),
            ),
        };

        self.result = sampling::reduce_hits(&self.name, &hits, self.reduction, self.accuracy);
    }

    /// Extruded-form dimensions: lateral extent from the sensing surface,
    /// axial extent from the derived height.
    fn lateral_dimensions(&self) -> Vector3 {
        Vector3::new(self.surface_radius, self.cone_height, self.surface_radius)
    }

    /// Forget the latest result (simulation reset).
    pub fn reset(&mut self) {
        self.result = SensorResult {
            sensor: self.name.clone(),
            contacts: Vec::new(),
        };
    }
}
