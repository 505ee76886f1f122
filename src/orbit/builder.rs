use std::marker::PhantomData;

use chrono::{DateTime, Utc};

use super::{semi_major_axis_for_period, Orbit, OrbitKinematics};
use crate::earth::SIDEREAL_DAY;
use crate::{Num, NewtonRaphson, OrbitError};

/// Element-by-element construction of an [`Orbit`].
///
/// Anything left unset takes the value of a geosynchronous parking orbit:
/// circular, equatorial, period of one sidereal day, all angles zero and
/// epoch at the time [`build`](Self::build) is called.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrbitBuilder {
    semi_major_axis: Option<Num>,
    eccentricity: Num,
    inclination: Num,
    right_ascension_of_the_ascending_node: Num,
    argument_of_perigee: Num,
    mean_anomaly_at_epoch: Num,
    epoch: Option<DateTime<Utc>>,
    solver: NewtonRaphson,
}

impl OrbitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semi_major_axis(mut self, a: Num) -> Self {
        self.semi_major_axis = Some(a);
        self
    }

    /// Sets the semi-major axis from the orbital period (s).
    pub fn period(self, period: Num) -> Self {
        self.semi_major_axis(semi_major_axis_for_period(period))
    }

    pub fn eccentricity(mut self, e: Num) -> Self {
        self.eccentricity = e;
        self
    }

    pub fn inclination(mut self, i: Num) -> Self {
        self.inclination = i;
        self
    }

    pub fn right_ascension_of_the_ascending_node(mut self, raan: Num) -> Self {
        self.right_ascension_of_the_ascending_node = raan;
        self
    }

    pub fn argument_of_perigee(mut self, argp: Num) -> Self {
        self.argument_of_perigee = argp;
        self
    }

    pub fn mean_anomaly_at_epoch(mut self, M: Num) -> Self {
        self.mean_anomaly_at_epoch = M;
        self
    }

    pub fn epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    pub fn solver(mut self, solver: NewtonRaphson) -> Self {
        self.solver = solver;
        self
    }

    /// Validates the shape: the semi-major axis must be positive and the
    /// eccentricity in `[0, 1)`.
    pub fn build<K: OrbitKinematics>(self) -> Result<Orbit<K>, OrbitError> {
        let orbit = self.assemble();
        orbit.validate()?;

        Ok(orbit)
    }

    pub(super) fn assemble<K: OrbitKinematics>(self) -> Orbit<K> {
        Orbit {
            semi_major_axis: self
                .semi_major_axis
                .unwrap_or_else(|| semi_major_axis_for_period(SIDEREAL_DAY)),
            eccentricity: self.eccentricity,
            inclination: self.inclination,
            right_ascension_of_the_ascending_node: self.right_ascension_of_the_ascending_node,
            argument_of_perigee: self.argument_of_perigee,
            mean_anomaly_at_epoch: self.mean_anomaly_at_epoch,
            epoch: self.epoch.unwrap_or_else(Utc::now),
            solver: self.solver,
            kinematics: PhantomData,
        }
    }
}
