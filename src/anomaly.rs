//! Conversions between the mean, eccentric and true anomaly of an elliptic
//! orbit.
//!
//! Only mean to eccentric needs iteration; the rest are closed form. Angles
//! are in radians and are not wrapped, callers normalize as needed.
use crate::math::{newton_raphson, NewtonRaphson};
use crate::{Num, OrbitError, PI};

/// Eccentric Anomaly (E) is given by the equation:
/// M = E - e * sin(E)
/// where
/// M is the mean anomaly
/// e is the eccentricity
///
/// https://orbital-mechanics.space/time-since-periapsis-and-keplers-equation/elliptical-orbits.html#equation-eq-keplers-equation-ellipse
pub fn mean_to_eccentric(M: Num, e: Num) -> Result<Num, OrbitError> {
    mean_to_eccentric_with(M, e, &NewtonRaphson::default())
}

/// [`mean_to_eccentric`] with explicit solver settings.
pub fn mean_to_eccentric_with(M: Num, e: Num, settings: &NewtonRaphson) -> Result<Num, OrbitError> {
    // The root lies ahead of M on the way out from perigee and behind it on the way back
    let E0 = if M > PI { M - 0.5 * e } else { M + 0.5 * e };

    newton_raphson(
        // f(E) = E - e*sin(E) - M
        |E| E - (e * E.sin()) - M,
        // f'(E) = 1 - e*cos(E)
        |E| 1.0 - (e * E.cos()),
        E0,
        settings,
    )
}

/// https://orbital-mechanics.space/time-since-periapsis-and-keplers-equation/elliptical-orbits.html#equation-eq-eccentric-anomaly-true-anomaly-ellipse
pub fn eccentric_to_true(E: Num, e: Num) -> Num {
    2.0 * ((1.0 + e).sqrt() * (0.5 * E).tan()).atan2((1.0 - e).sqrt())
}

pub fn true_to_eccentric(v: Num, e: Num) -> Num {
    2.0 * ((1.0 - e).sqrt() * (0.5 * v).tan()).atan2((1.0 + e).sqrt())
}

/// Kepler's equation, evaluated directly.
pub fn eccentric_to_mean(E: Num, e: Num) -> Num {
    E - e * E.sin()
}

pub fn true_to_mean(v: Num, e: Num) -> Num {
    eccentric_to_mean(true_to_eccentric(v, e), e)
}

pub fn mean_to_true(M: Num, e: Num) -> Result<Num, OrbitError> {
    mean_to_true_with(M, e, &NewtonRaphson::default())
}

pub fn mean_to_true_with(M: Num, e: Num, settings: &NewtonRaphson) -> Result<Num, OrbitError> {
    let E = mean_to_eccentric_with(M, e, settings)?;

    Ok(eccentric_to_true(E, e))
}
