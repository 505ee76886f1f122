//! Rotations about the principal axes.
//!
//! The lowercase functions rotate a *vector* by the given angle, the `frame_*`
//! functions re-express a fixed vector in a frame that has been rotated by the
//! angle. Either family composes right-to-left, e.g.
//! `frame_z(ω) * frame_x(i) * frame_z(Ω)` takes inertial coordinates into the
//! perifocal frame.
use crate::{vec3, Mat3, Num, Vec3};

/// Rotates a vector about the x axis.
#[inline]
pub fn x(angle: Num) -> Mat3 {
    Mat3::from_rotation_x(angle)
}

/// Rotates a vector about the y axis.
#[inline]
pub fn y(angle: Num) -> Mat3 {
    Mat3::from_rotation_y(angle)
}

/// Rotates a vector about the z axis.
#[inline]
pub fn z(angle: Num) -> Mat3 {
    Mat3::from_rotation_z(angle)
}

/// Evaluates a vector in a frame rotated about the x axis.
#[inline]
pub fn frame_x(angle: Num) -> Mat3 {
    x(angle).transpose()
}

/// Evaluates a vector in a frame rotated about the y axis.
#[inline]
pub fn frame_y(angle: Num) -> Mat3 {
    y(angle).transpose()
}

/// Evaluates a vector in a frame rotated about the z axis.
#[inline]
pub fn frame_z(angle: Num) -> Mat3 {
    z(angle).transpose()
}

/// Spherical coordinates with the poles on ±z.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spherical {
    /// Rotation about +z from the +x axis
    pub azimuth: Num,
    /// Angle above the xy plane
    pub elevation: Num,
    pub radius: Num,
}

pub fn cartesian_to_spherical(v: Vec3) -> Spherical {
    let xy = (v.x.powi(2) + v.y.powi(2)).sqrt();

    Spherical {
        azimuth: v.y.atan2(v.x),
        elevation: v.z.atan2(xy),
        radius: v.length(),
    }
}

pub fn spherical_to_cartesian(s: Spherical) -> Vec3 {
    let (sin_az, cos_az) = s.azimuth.sin_cos();
    let (sin_el, cos_el) = s.elevation.sin_cos();

    s.radius * vec3(cos_az * cos_el, sin_az * cos_el, sin_el)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use test_case::test_case;

    use super::*;
    use crate::{DEG, PI, TWO_PI};

    const ANGLES: [Num; 7] = [0.0, 0.3, PI / 2.0, 2.0, PI, 4.5, -1.2];

    fn assert_vec_eq(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, 1e-8),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test_case(x, Vec3::Z, vec3(0.0, -1.0, 0.0) ; "x")]
    #[test_case(y, Vec3::Z, vec3(1.0, 0.0, 0.0) ; "y")]
    #[test_case(z, Vec3::X, vec3(0.0, 1.0, 0.0) ; "z")]
    fn vector_rotation_quarter_turn(rotation: fn(Num) -> Mat3, v: Vec3, expected: Vec3) {
        assert_vec_eq(rotation(0.5 * PI) * v, expected);
    }

    #[test_case(frame_x, Vec3::Z, vec3(0.0, 1.0, 0.0) ; "x")]
    #[test_case(frame_y, Vec3::Z, vec3(-1.0, 0.0, 0.0) ; "y")]
    #[test_case(frame_z, Vec3::X, vec3(0.0, -1.0, 0.0) ; "z")]
    fn frame_rotation_quarter_turn(rotation: fn(Num) -> Mat3, v: Vec3, expected: Vec3) {
        assert_vec_eq(rotation(0.5 * PI) * v, expected);
    }

    #[test]
    fn matrices_are_orthogonal() {
        let all: [fn(Num) -> Mat3; 6] = [x, y, z, frame_x, frame_y, frame_z];

        for rotation in all {
            for angle in ANGLES {
                let m = rotation(angle);
                assert!((m.transpose() * m).abs_diff_eq(Mat3::IDENTITY, 1e-12));
                assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn frame_is_transpose_of_vector_rotation() {
        for angle in ANGLES {
            assert_eq!(frame_x(angle), x(angle).transpose());
            assert_eq!(frame_y(angle), y(angle).transpose());
            assert_eq!(frame_z(angle), z(angle).transpose());
            assert!(frame_z(angle).abs_diff_eq(z(-angle), 1e-15));
        }
    }

    #[test]
    fn perifocal_sequence() {
        let m = frame_z(60.0 * DEG) * frame_x(30.0 * DEG) * frame_z(40.0 * DEG);

        let expected = Mat3::from_cols_array_2d(&[
            [-0.099068, -0.94175, 0.32139],
            [0.89593, -0.22496, -0.38302],
            [0.43301, 0.25, 0.86603],
        ]);

        assert!(m.abs_diff_eq(expected, 1e-4), "{m:?}");
    }

    #[test]
    fn to_spherical() {
        let s = cartesian_to_spherical(vec3(-5.368e6, -1.784e6, 3.691e6));

        assert_relative_eq!(s.azimuth.rem_euclid(TWO_PI), 198.4 * DEG, max_relative = 1e-3);
        assert_relative_eq!(s.elevation, 33.12 * DEG, max_relative = 1e-3);
        assert_relative_eq!(s.radius, 6.754e6, max_relative = 1e-3);
    }

    #[test]
    fn spherical_round_trip() {
        let v = vec3(1.2e6, -7.4e6, 0.3e6);

        assert!(spherical_to_cartesian(cartesian_to_spherical(v)).abs_diff_eq(v, 1e-6));
    }

    #[test]
    fn zero_vector_has_no_direction() {
        let s = cartesian_to_spherical(Vec3::ZERO);

        assert_eq!(s.radius, 0.0);
        // atan2(0, 0) is defined as 0 rather than NaN
        assert_eq!(s.elevation, 0.0);
    }
}
