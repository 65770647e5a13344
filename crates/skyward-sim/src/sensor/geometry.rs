//! Sensing-volume derivation from mounting pose and aperture.

use glam::{DQuat, DVec3};

use skyward_core::types::Vector3;

/// Apex of the sensing volume: behind the mounting point along the negative
/// boresight, far enough that the cone reaches `surface_radius` width at the
/// mounting point.
///
/// Returns `Vector3::NAN` when no volume is well defined (zero boresight, or
/// a zero aperture whose apex would sit at infinity).
pub fn derive_origin(
    mount_position: Vector3,
    boresight: Vector3,
    aperture_deg: f64,
    surface_radius: f64,
) -> Vector3 {
    let direction = boresight.normalized();
    if direction.is_nan() {
        return Vector3::NAN;
    }
    let tan = aperture_deg.to_radians().tan();
    if tan <= f64::EPSILON {
        return Vector3::NAN;
    }
    mount_position - direction * (surface_radius / tan)
}

/// Total axial extent of the query volume: sensing range past the mounting
/// point, plus the apex-to-mount offset.
pub fn derive_cone_height(mount_position: Vector3, origin: Vector3, range: f64) -> f64 {
    if origin.is_nan() {
        return f64::NAN;
    }
    range + (mount_position - origin).length()
}

/// Unit vector on the cone's lateral surface.
///
/// The aperture rotation must be expressed against a fixed reference plane,
/// not the arbitrary boresight itself: rotate the boresight about the
/// vertical axis into the North/Up plane, tilt it by the aperture about the
/// horizontal (East) axis, then undo the first rotation.
pub fn derive_opening_vector(boresight: Vector3, aperture_deg: f64) -> Vector3 {
    let direction = boresight.normalized();
    if direction.is_nan() {
        return Vector3::NAN;
    }
    let d = DVec3::from(direction);
    let aperture = aperture_deg.to_radians();
    let tilt = DQuat::from_rotation_x(aperture);

    if direction.horizontal_length() < f64::EPSILON {
        // Straight up or down: the cone is symmetric about the vertical
        // axis, so any vertical reference plane serves. Skipping the yaw
        // alignment avoids the undefined rotation.
        return Vector3::from(tilt * d);
    }

    let yaw = d.x.atan2(d.y);
    let into_plane = DQuat::from_rotation_z(yaw);
    let out_of_plane = into_plane.inverse();
    Vector3::from(out_of_plane * (tilt * (into_plane * d)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_sits_behind_mount() {
        let mount = Vector3::new(0.0, 0.5, 0.0);
        let boresight = Vector3::new(0.0, 1.0, 0.0);
        let origin = derive_origin(mount, boresight, 45.0, 0.2);

        // tan(45) = 1, so the apex is surface_radius behind the mount.
        assert_relative_eq!(origin.y, 0.3, epsilon = 1e-12);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_origin_offset_scales_with_aperture() {
        let mount = Vector3::ZERO;
        let boresight = Vector3::new(0.0, 1.0, 0.0);

        let narrow = derive_origin(mount, boresight, 10.0, 0.2);
        let wide = derive_origin(mount, boresight, 60.0, 0.2);
        assert!(
            narrow.y < wide.y,
            "a narrower cone needs its apex further back: {} vs {}",
            narrow.y,
            wide.y
        );
    }

    #[test]
    fn test_zero_aperture_has_no_volume() {
        let origin = derive_origin(Vector3::ZERO, Vector3::new(0.0, 1.0, 0.0), 0.0, 0.2);
        assert!(origin.is_nan());
    }

    #[test]
    fn test_zero_boresight_has_no_volume() {
        let origin = derive_origin(Vector3::ZERO, Vector3::ZERO, 30.0, 0.2);
        assert!(origin.is_nan());
        assert!(derive_opening_vector(Vector3::ZERO, 30.0).is_nan());
    }

    #[test]
    fn test_cone_height_includes_apex_offset() {
        let mount = Vector3::new(0.0, 0.5, 0.0);
        let boresight = Vector3::new(0.0, 1.0, 0.0);
        let origin = derive_origin(mount, boresight, 45.0, 0.2);
        let height = derive_cone_height(mount, origin, 40.0);
        assert_relative_eq!(height, 40.2, epsilon = 1e-12);
    }

    #[test]
    fn test_opening_vector_angle_equals_aperture() {
        for boresight in [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.7, -0.3, 0.2),
            Vector3::new(-0.2, 0.4, -0.8),
        ] {
            for aperture in [5.0, 20.0, 45.0, 80.0] {
                let opening = derive_opening_vector(boresight, aperture);
                assert_relative_eq!(opening.length(), 1.0, epsilon = 1e-9);

                let angle = boresight
                    .normalized()
                    .dot(&opening)
                    .clamp(-1.0, 1.0)
                    .acos()
                    .to_degrees();
                assert_relative_eq!(angle, aperture, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_opening_vector_vertical_boresight() {
        // A straight-down boresight must not hit the undefined yaw rotation.
        let opening = derive_opening_vector(Vector3::new(0.0, 0.0, -1.0), 30.0);
        assert!(!opening.is_nan());
        assert_relative_eq!(opening.length(), 1.0, epsilon = 1e-12);

        let angle = Vector3::new(0.0, 0.0, -1.0)
            .dot(&opening)
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees();
        assert_relative_eq!(angle, 30.0, epsilon = 1e-9);
    }
}
