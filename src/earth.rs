//! Earth constants and the time-dependent frames tied to the Earth's rotation.
//!
//! Fidelity is low: GMST is a linear function of time with no
//! precession or nutation, and the Earth-fixed frame is a single z rotation of
//! the inertial (J2000-aligned) frame.
use chrono::{DateTime, TimeZone, Utc};

use crate::rotation::{frame_y, frame_z};
use crate::time::elapsed_seconds;
use crate::{vec3, Mat3, Num, Vec3, SECONDS_PER_DAY, TWO_PI};

/// Standard gravitational parameter (m^3/s^2)
pub const MU: Num = 3.986e14;

/// Equatorial radius (m)
pub const EQUATORIAL_RADIUS: Num = 6.3781e6;

/// Length of the sidereal day (s)
pub const SIDEREAL_DAY: Num = 23.0 * 3600.0 + 56.0 * 60.0 + 4.0916;

/// Length of the sidereal year (s)
pub const SIDEREAL_YEAR: Num = 365.25636 * SECONDS_PER_DAY;

pub const FLATTENING: Num = 0.003353;

/// Second zonal harmonic of the geopotential
pub const J2: Num = 1.08263e-3;

/// 2000-01-01T12:00:00 UTC
pub fn j2000() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0)
        .single()
        .expect("J2000 is a valid UTC instant")
}

/// Greenwich mean sidereal time, the angle between the vernal equinox and
/// the prime meridian, in `[0, 2π)`.
pub fn gmst(t: DateTime<Utc>) -> Num {
    let days = elapsed_seconds(j2000(), t) / SECONDS_PER_DAY;
    let hours = 18.697374558 + 24.06570982441908 * days;

    TWO_PI * hours.rem_euclid(24.0) / 24.0
}

/// Rotation rate of the Earth in inertial space (rad/s).
pub fn rotation_rate() -> Num {
    TWO_PI / SIDEREAL_DAY
}

/// Geodetic latitude, longitude (radians) and altitude (meters).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geodetic {
    pub latitude: Num,
    pub longitude: Num,
    pub altitude: Num,
}

impl Geodetic {
    pub fn new(latitude: Num, longitude: Num, altitude: Num) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Inertial position of a site on the oblate Earth at the given instant.
pub fn geodetic_to_eci(site: Geodetic, t: DateTime<Utc>) -> Vec3 {
    let right_ascension = site.longitude + gmst(t);
    let (sin_lat, cos_lat) = site.latitude.sin_cos();

    let e2 = 2.0 * FLATTENING - FLATTENING.powi(2);
    let d = (1.0 - e2 * sin_lat.powi(2)).sqrt();

    let horizontal = (EQUATORIAL_RADIUS / d + site.altitude) * cos_lat;
    let vertical = EQUATORIAL_RADIUS * (1.0 - FLATTENING).powi(2) / d + site.altitude;

    vec3(
        horizontal * right_ascension.cos(),
        horizontal * right_ascension.sin(),
        vertical * sin_lat,
    )
}

/// Frame transformation from inertial to Earth-fixed coordinates.
pub fn eci_to_ecf(t: DateTime<Utc>) -> Mat3 {
    frame_z(gmst(t))
}

/// Frame transformation from Earth-fixed to east-north-up coordinates as seen
/// from `site`. Only rotates; subtract the site position first for a
/// relative vector.
pub fn ecf_to_enu(site: Geodetic) -> Mat3 {
    // (up, east, north) -> (east, north, up)
    let reorder = Mat3::from_cols(Vec3::Z, Vec3::X, Vec3::Y);

    reorder * frame_y(-site.latitude) * frame_z(site.longitude)
}

pub fn eci_to_enu(site: Geodetic, t: DateTime<Utc>) -> Mat3 {
    ecf_to_enu(site) * eci_to_ecf(t)
}
