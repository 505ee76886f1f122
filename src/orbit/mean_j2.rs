//! Secular drift of the node and perigee caused by the Earth's oblateness.
//!
//! Only the orbit-averaged effect of J2 is modeled: Ω and ω move linearly in
//! time while a, e and i stay constant. The named constructors pick elements
//! that exploit this drift (sun-synchronous, frozen perigee) or cancel it
//! (critically inclined Molniya and Tundra orbits).
use chrono::{DateTime, Utc};

use super::{semi_major_axis_for_period, Orbit, OrbitBuilder, OrbitKinematics};
use crate::earth::{self, EQUATORIAL_RADIUS, J2, MU, SIDEREAL_DAY, SIDEREAL_YEAR};
use crate::time::elapsed_seconds;
use crate::{Num, OrbitError, DEG, PI, TWO_PI};

/// Orbit-averaged J2 perturbation of the node and perigee.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeanJ2;

pub type MeanJ2Orbit = Orbit<MeanJ2>;

impl OrbitKinematics for MeanJ2 {
    const NAME: &'static str = "MeanJ2";

    fn raan(orbit: &Orbit<Self>, t: DateTime<Utc>) -> Num {
        let dt = elapsed_seconds(orbit.epoch, t);

        (orbit.right_ascension_of_the_ascending_node + orbit.raan_rate() * dt).rem_euclid(TWO_PI)
    }

    fn argument_of_perigee(orbit: &Orbit<Self>, t: DateTime<Utc>) -> Num {
        let dt = elapsed_seconds(orbit.epoch, t);

        (orbit.argument_of_perigee + orbit.argument_of_perigee_rate() * dt).rem_euclid(TWO_PI)
    }
}

/// Node regression rate of the sun-synchronous orbit: one turn per year
fn sun_synchronous_raan_rate() -> Num {
    TWO_PI / SIDEREAL_YEAR
}

/// Common factor of the nodal and apsidal rates
fn j2_rate_scale(a: Num, e: Num) -> Num {
    1.5 * MU.sqrt() * J2 * EQUATORIAL_RADIUS.powi(2) / ((1.0 - e.powi(2)).powi(2) * a.powf(3.5))
}

/// Inclination at which the nodal and apsidal rates of a Molniya or Tundra
/// orbit are respectively small and zero
const CRITICAL_INCLINATION: Num = 63.4 * DEG;

/// Perigee in the southern hemisphere, apogee dwelling over the north
const NORTHERN_DWELL_PERIGEE: Num = 270.0 * DEG;

impl Orbit<MeanJ2> {
    /// Precession of the right ascension of the ascending node (rad/s).
    pub fn raan_rate(&self) -> Num {
        -j2_rate_scale(self.semi_major_axis, self.eccentricity) * self.inclination.cos()
    }

    /// Precession of the argument of perigee (rad/s).
    pub fn argument_of_perigee_rate(&self) -> Num {
        let i = self.inclination;

        -j2_rate_scale(self.semi_major_axis, self.eccentricity) * (2.5 * i.sin().powi(2) - 2.0)
    }

    /// Circular orbit of the given period whose node keeps a fixed angle to
    /// the mean Sun.
    pub fn sun_synchronous(period: Num, epoch: DateTime<Utc>) -> Result<Self, OrbitError> {
        let a = semi_major_axis_for_period(period);

        let cos_i = sun_synchronous_raan_rate() / -j2_rate_scale(a, 0.0);
        if !(-1.0..=1.0).contains(&cos_i) {
            return Err(OrbitError::Degenerate(
                "no inclination gives a sun-synchronous node at this period",
            ));
        }

        tracing::debug!(period, a, cos_i, "sun-synchronous orbit");

        OrbitBuilder::new()
            .semi_major_axis(a)
            .inclination(cos_i.acos())
            .epoch(epoch)
            .build()
    }

    /// Sun-synchronous orbit at the critical inclination, where the perigee
    /// does not drift. The eccentricity is chosen to reach the sun-synchronous
    /// node rate at the given period.
    pub fn constant_argument_of_perigee(
        period: Num,
        epoch: DateTime<Utc>,
    ) -> Result<Self, OrbitError> {
        let a = semi_major_axis_for_period(period);
        // Retrograde root of 2.5 sin²(i) = 2
        let i = PI - 0.8_f64.sqrt().asin();

        let n = -3.0 * i.cos() * MU.sqrt() * J2 * EQUATORIAL_RADIUS.powi(2);
        let d = 2.0 * sun_synchronous_raan_rate() * a.powf(3.5);
        let e2 = 1.0 - (n / d).sqrt();

        if e2.is_nan() || e2 < 0.0 {
            return Err(OrbitError::Degenerate(
                "period too short for a frozen sun-synchronous orbit",
            ));
        }

        tracing::debug!(period, a, e = e2.sqrt(), "constant argument of perigee orbit");

        OrbitBuilder::new()
            .semi_major_axis(a)
            .eccentricity(e2.sqrt())
            .inclination(i)
            .epoch(epoch)
            .build()
    }

    /// Half sidereal day, highly eccentric orbit whose apogee sits over
    /// `longitude` at `epoch`.
    pub fn molniya(longitude: Num, epoch: DateTime<Utc>) -> Result<Self, OrbitError> {
        let builder = OrbitBuilder::new()
            .period(0.5 * SIDEREAL_DAY)
            .eccentricity(0.74105)
            .inclination(CRITICAL_INCLINATION)
            .argument_of_perigee(NORTHERN_DWELL_PERIGEE)
            .epoch(epoch);

        Self::with_apogee_over(builder, longitude)
    }

    /// Geosynchronous counterpart of [`molniya`](Self::molniya).
    pub fn tundra(longitude: Num, epoch: DateTime<Utc>) -> Result<Self, OrbitError> {
        let builder = OrbitBuilder::new()
            .period(SIDEREAL_DAY)
            .eccentricity(0.25)
            .inclination(CRITICAL_INCLINATION)
            .argument_of_perigee(NORTHERN_DWELL_PERIGEE)
            .epoch(epoch);

        Self::with_apogee_over(builder, longitude)
    }

    /// Picks the node so that the apogee direction has the given Earth-fixed
    /// longitude at the epoch.
    fn with_apogee_over(builder: OrbitBuilder, longitude: Num) -> Result<Self, OrbitError> {
        let mut orbit: Self = builder.build()?;

        // Argument of latitude of the apogee
        let u = orbit.argument_of_perigee + PI;
        let (sin_u, cos_u) = u.sin_cos();
        let in_plane = (orbit.inclination.cos() * sin_u).atan2(cos_u);

        let Ω = earth::gmst(orbit.epoch) + longitude - in_plane;
        orbit.right_ascension_of_the_ascending_node = Ω.rem_euclid(TWO_PI);

        tracing::debug!(longitude, raan = orbit.right_ascension_of_the_ascending_node, "apogee placed");

        Ok(orbit)
    }
}
