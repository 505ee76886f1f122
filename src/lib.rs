//! Analytical orbit propagation around the Earth.
//!
//! An [`Orbit`] holds a set of classical elements and an epoch. Everything else
//! (period, shape, position in the perifocal, inertial, Earth-fixed and geodetic
//! frames) is computed on demand. The propagation model is picked by the type
//! parameter: [`TwoBody`] keeps the orbital plane fixed in inertial space while
//! [`MeanJ2`] lets the node and perigee drift under the Earth's oblateness.
#![allow(non_snake_case)]

pub mod anomaly;
pub mod constants;
pub mod dynamics;
pub mod earth;
pub mod error;
pub mod math;
pub mod orbit;
pub mod rotation;
pub mod state_vectors;
pub mod time;
pub mod tle;

pub use self::constants::*;
pub use self::error::OrbitError;
pub use self::math::NewtonRaphson;
pub use self::orbit::{
    MeanJ2, MeanJ2Orbit, Orbit, OrbitBuilder, OrbitKinematics, Trajectory, TwoBody,
};
pub use self::state_vectors::StateVectors;
pub use self::tle::{Tle, TleError};

pub type Num = f64;
pub type Vec3 = glam::DVec3;
pub type Mat3 = glam::DMat3;

#[inline]
pub const fn vec3(x: Num, y: Num, z: Num) -> Vec3 {
    Vec3::new(x, y, z)
}
