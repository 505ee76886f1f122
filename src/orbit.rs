use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};

use crate::anomaly::mean_to_true_with;
use crate::earth::{self, Geodetic, EQUATORIAL_RADIUS, MU};
use crate::math::NewtonRaphson;
use crate::rotation::cartesian_to_spherical;
use crate::time::{add_seconds, elapsed_seconds};
use crate::tle::Tle;
use crate::{vec3, Mat3, Num, OrbitError, StateVectors, Vec3, PI, TWO_PI};

mod builder;
mod kinematics;
mod mean_j2;

pub use self::builder::OrbitBuilder;
pub use self::kinematics::{OrbitKinematics, TwoBody};
pub use self::mean_j2::{MeanJ2, MeanJ2Orbit};

/// A closed orbit around the Earth, described by its classical elements at
/// `epoch`.
///
/// Lengths are in meters, angles in radians. The type parameter selects how
/// the orbital plane moves with time, see [`OrbitKinematics`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orbit<K = TwoBody> {
    pub semi_major_axis: Num,
    pub eccentricity: Num,
    pub inclination: Num,
    pub right_ascension_of_the_ascending_node: Num,
    pub argument_of_perigee: Num,
    pub mean_anomaly_at_epoch: Num,
    pub epoch: DateTime<Utc>,
    /// Settings used whenever Kepler's equation has to be solved
    pub solver: NewtonRaphson,
    #[cfg_attr(feature = "serde", serde(skip))]
    kinematics: PhantomData<K>,
}

/// Sampling of one full revolution, see [`Orbit::propagate`] and
/// [`Orbit::track`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    /// Number of evenly spaced samples, both ends of the period included
    pub samples: usize,
    /// First sample time, the element epoch when `None`
    pub start: Option<DateTime<Utc>>,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self {
            samples: 1000,
            start: None,
        }
    }
}

/// Semi-major axis of an orbit with the given period (Kepler's third law).
pub fn semi_major_axis_for_period(period: Num) -> Num {
    ((period / TWO_PI).powi(2) * MU).cbrt()
}

impl<K: OrbitKinematics> Default for Orbit<K> {
    /// A circular, equatorial orbit with a period of one sidereal day.
    fn default() -> Self {
        OrbitBuilder::new().assemble()
    }
}

impl<K: OrbitKinematics> Orbit<K> {
    /// Determines the elements from a state holding at `epoch`, see
    /// [`StateVectors::to_orbit`].
    ///
    /// Circular and equatorial states are rejected with
    /// [`OrbitError::Degenerate`]. This includes the circular orbits
    /// [`OrbitBuilder`] produces by default: their own state vectors cannot be
    /// turned back into an orbit.
    pub fn from_state_vectors(
        state_vectors: &StateVectors,
        epoch: DateTime<Utc>,
    ) -> Result<Self, OrbitError> {
        state_vectors.to_orbit(epoch)
    }

    /// Same as [`Orbit::from_state_vectors`], so circular or equatorial
    /// states (such as those of a default-built orbit) fail with
    /// [`OrbitError::Degenerate`].
    pub fn from_rv(position: Vec3, velocity: Vec3, epoch: DateTime<Utc>) -> Result<Self, OrbitError> {
        StateVectors::new(position, velocity).to_orbit(epoch)
    }

    /// Builds the orbit passing through two points given by their altitude
    /// above the equatorial radius and their true anomaly.
    ///
    /// Only the shape is determined; the remaining angles are zero.
    pub fn from_altitudes_and_true_anomalies(
        h1: Num,
        v1: Num,
        h2: Num,
        v2: Num,
        epoch: DateTime<Utc>,
    ) -> Result<Self, OrbitError> {
        let r1 = h1 + EQUATORIAL_RADIUS;
        let r2 = h2 + EQUATORIAL_RADIUS;

        // r = h^2 / μ / (1 + e cos v) at both points, h eliminated
        let d = r2 * v2.cos() - r1 * v1.cos();
        if d == 0.0 {
            return Err(OrbitError::Degenerate("points do not determine an eccentricity"));
        }
        let e = (r1 - r2) / d;

        let h = (r1 * MU * (1.0 + e * v1.cos())).sqrt();
        let a = h.powi(2) / (MU * (1.0 - e.powi(2)));

        OrbitBuilder::new()
            .semi_major_axis(a)
            .eccentricity(e)
            .epoch(epoch)
            .build()
    }

    /// Parses a two-line element set, see [`Tle::parse`].
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self, OrbitError> {
        Tle::parse(line1, line2)?.to_orbit()
    }

    /// Same elements under another propagation model.
    pub fn with_kinematics<L: OrbitKinematics>(&self) -> Orbit<L> {
        Orbit {
            semi_major_axis: self.semi_major_axis,
            eccentricity: self.eccentricity,
            inclination: self.inclination,
            right_ascension_of_the_ascending_node: self.right_ascension_of_the_ascending_node,
            argument_of_perigee: self.argument_of_perigee,
            mean_anomaly_at_epoch: self.mean_anomaly_at_epoch,
            epoch: self.epoch,
            solver: self.solver,
            kinematics: PhantomData,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), OrbitError> {
        check_shape(self.semi_major_axis, self.eccentricity)
    }

    /// https://en.wikipedia.org/wiki/Orbital_period
    pub fn period(&self) -> Num {
        TWO_PI * (self.semi_major_axis.powi(3) / MU).sqrt()
    }

    pub fn mean_motion(&self) -> Num {
        TWO_PI / self.period()
    }

    /// Mean anomaly at `t`, in `[0, 2π)`.
    pub fn mean_anomaly(&self, t: DateTime<Utc>) -> Num {
        let dt = elapsed_seconds(self.epoch, t);

        (self.mean_anomaly_at_epoch + dt * self.mean_motion()).rem_euclid(TWO_PI)
    }

    pub fn true_anomaly(&self, t: DateTime<Utc>) -> Result<Num, OrbitError> {
        mean_to_true_with(self.mean_anomaly(t), self.eccentricity, &self.solver)
    }

    pub fn angular_momentum(&self) -> Num {
        (MU * self.semi_major_axis * (1.0 - self.eccentricity.powi(2))).sqrt()
    }

    /// Semi-latus rectum
    fn semi_parameter(&self) -> Num {
        self.semi_major_axis * (1.0 - self.eccentricity.powi(2))
    }

    fn perigee_radius(&self) -> Num {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    fn apogee_radius(&self) -> Num {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Altitude at perigee and apogee above the equatorial radius.
    pub fn shape(&self) -> (Num, Num) {
        (
            self.perigee_radius() - EQUATORIAL_RADIUS,
            self.apogee_radius() - EQUATORIAL_RADIUS,
        )
    }

    /// Speed at perigee and apogee.
    pub fn shape_velocities(&self) -> (Num, Num) {
        let h = self.angular_momentum();

        (h / self.perigee_radius(), h / self.apogee_radius())
    }

    /// Geometric mean of the perigee and apogee radii.
    pub fn true_anomaly_averaged_radius(&self) -> Num {
        (self.perigee_radius() * self.apogee_radius()).sqrt()
    }

    /// Resizes the orbit to the given perigee and apogee altitudes. Leaves the
    /// orbit untouched on error.
    pub fn set_shape(&mut self, perigee_altitude: Num, apogee_altitude: Num) -> Result<(), OrbitError> {
        let rp = perigee_altitude + EQUATORIAL_RADIUS;
        let ra = apogee_altitude + EQUATORIAL_RADIUS;

        let a = 0.5 * (rp + ra);
        let e = (ra - rp) / (ra + rp);
        check_shape(a, e)?;

        self.semi_major_axis = a;
        self.eccentricity = e;

        Ok(())
    }

    /// Position in the perifocal frame (x towards perigee, z along the
    /// orbit normal) for a given true anomaly.
    pub fn perifocal_position_at_true_anomaly(&self, v: Num) -> Vec3 {
        let e = self.eccentricity;
        let r = self.semi_parameter() / (1.0 + e * v.cos());

        vec3(r * v.cos(), r * v.sin(), 0.0)
    }

    pub fn perifocal_velocity_at_true_anomaly(&self, v: Num) -> Vec3 {
        let e = self.eccentricity;
        let k = MU / self.angular_momentum();

        vec3(-k * v.sin(), k * (e + v.cos()), 0.0)
    }

    pub fn perifocal_position(&self, t: DateTime<Utc>) -> Result<Vec3, OrbitError> {
        Ok(self.perifocal_position_at_true_anomaly(self.true_anomaly(t)?))
    }

    pub fn perifocal_velocity(&self, t: DateTime<Utc>) -> Result<Vec3, OrbitError> {
        Ok(self.perifocal_velocity_at_true_anomaly(self.true_anomaly(t)?))
    }

    pub fn right_ascension_of_the_ascending_node_at(&self, t: DateTime<Utc>) -> Num {
        K::raan(self, t)
    }

    pub fn argument_of_perigee_at(&self, t: DateTime<Utc>) -> Num {
        K::argument_of_perigee(self, t)
    }

    /// Frame transformation from perifocal to inertial coordinates at `t`.
    pub fn perifocal_to_inertial(&self, t: DateTime<Utc>) -> Mat3 {
        K::frame_transform(self, t)
    }

    /// Inertial position at `t`.
    pub fn position(&self, t: DateTime<Utc>) -> Result<Vec3, OrbitError> {
        K::position(self, t)
    }

    /// Inertial velocity at `t`.
    pub fn velocity(&self, t: DateTime<Utc>) -> Result<Vec3, OrbitError> {
        Ok(self.perifocal_to_inertial(t) * self.perifocal_velocity(t)?)
    }

    pub fn state_vectors(&self, t: DateTime<Utc>) -> Result<StateVectors, OrbitError> {
        let v = self.true_anomaly(t)?;
        let q = self.perifocal_to_inertial(t);

        Ok(StateVectors {
            position: q * self.perifocal_position_at_true_anomaly(v),
            velocity: q * self.perifocal_velocity_at_true_anomaly(v),
        })
    }

    /// Latitude, longitude and altitude above the equatorial radius at `t`.
    ///
    /// Latitude is geocentric; the Earth is treated as a sphere here.
    pub fn geodetic(&self, t: DateTime<Utc>) -> Result<Geodetic, OrbitError> {
        let ecf = earth::eci_to_ecf(t) * self.position(t)?;
        let s = cartesian_to_spherical(ecf);

        Ok(Geodetic {
            latitude: s.elevation,
            longitude: s.azimuth,
            altitude: s.radius - EQUATORIAL_RADIUS,
        })
    }

    /// Unit normal of the orbital plane in the inertial frame.
    pub fn normal(&self, t: DateTime<Utc>) -> Vec3 {
        self.perifocal_to_inertial(t) * Vec3::Z
    }

    /// Inertial position at a true anomaly, with the plane oriented as at `t`.
    pub fn position_at_true_anomaly(&self, v: Num, t: DateTime<Utc>) -> Vec3 {
        self.perifocal_to_inertial(t) * self.perifocal_position_at_true_anomaly(v)
    }

    pub fn perigee(&self) -> Vec3 {
        self.position_at_true_anomaly(0.0, self.epoch)
    }

    pub fn apogee(&self) -> Vec3 {
        self.position_at_true_anomaly(PI, self.epoch)
    }

    pub fn ascending_node(&self) -> Vec3 {
        self.position_at_true_anomaly(-self.argument_of_perigee_at(self.epoch), self.epoch)
    }

    pub fn descending_node(&self) -> Vec3 {
        self.position_at_true_anomaly(PI - self.argument_of_perigee_at(self.epoch), self.epoch)
    }

    fn sample_times(&self, trajectory: &Trajectory) -> impl Fn(usize) -> DateTime<Utc> {
        let start = trajectory.start.unwrap_or(self.epoch);
        let step = match trajectory.samples {
            0 | 1 => 0.0,
            n => self.period() / (n - 1) as Num,
        };

        move |i| add_seconds(start, i as Num * step)
    }

    #[cfg(not(feature = "rayon"))]
    fn sample<T>(
        &self,
        trajectory: &Trajectory,
        f: impl Fn(DateTime<Utc>) -> Result<T, OrbitError>,
    ) -> Result<Vec<T>, OrbitError> {
        let time = self.sample_times(trajectory);

        (0..trajectory.samples).map(|i| f(time(i))).collect()
    }

    #[cfg(feature = "rayon")]
    fn sample<T: Send>(
        &self,
        trajectory: &Trajectory,
        f: impl Fn(DateTime<Utc>) -> Result<T, OrbitError> + Sync + Send,
    ) -> Result<Vec<T>, OrbitError> {
        use rayon::prelude::*;

        let time = self.sample_times(trajectory);

        (0..trajectory.samples)
            .into_par_iter()
            .map(|i| f(time(i)))
            .collect()
    }

    /// Inertial positions over one period.
    pub fn propagate(&self, trajectory: &Trajectory) -> Result<Vec<Vec3>, OrbitError> {
        tracing::debug!(samples = trajectory.samples, "propagating {}", self);

        self.sample(trajectory, |t| self.position(t))
    }

    /// Ground track (latitude, longitude, altitude) over one period.
    pub fn track(&self, trajectory: &Trajectory) -> Result<Vec<Geodetic>, OrbitError> {
        tracing::debug!(samples = trajectory.samples, "tracking {}", self);

        self.sample(trajectory, |t| self.geodetic(t))
    }

    /// Perigee and apogee altitudes in km and the propagation model, e.g.
    /// `<400.000 x 4000.000 [km] TwoBody>`.
    pub fn summary(&self) -> String {
        let (hp, ha) = self.shape();

        format!("<{:.3} x {:.3} [km] {}>", hp * 1e-3, ha * 1e-3, K::NAME)
    }
}

impl<K: OrbitKinematics> fmt::Display for Orbit<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn check_shape(a: Num, e: Num) -> Result<(), OrbitError> {
    if !(a.is_finite() && a > 0.0) {
        return Err(OrbitError::InvalidSemiMajorAxis(a));
    }
    if !(0.0..1.0).contains(&e) {
        return Err(OrbitError::InvalidEccentricity(e));
    }

    Ok(())
}
