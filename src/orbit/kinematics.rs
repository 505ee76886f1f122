use std::fmt;

use chrono::{DateTime, Utc};

use super::Orbit;
use crate::rotation::{frame_x, frame_z};
use crate::{Mat3, Num, OrbitError, Vec3};

/// How the orientation of the orbital plane evolves with time.
///
/// The in-plane motion (mean anomaly, Kepler's equation) is shared by every
/// model; an implementation only decides the node and perigee angles at a
/// given instant. Frame transform and inertial position follow from those
/// unless overridden.
pub trait OrbitKinematics:
    Sized + Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Shown in [`Orbit::summary`].
    const NAME: &'static str;

    fn raan(orbit: &Orbit<Self>, t: DateTime<Utc>) -> Num;

    fn argument_of_perigee(orbit: &Orbit<Self>, t: DateTime<Utc>) -> Num;

    /// Perifocal to inertial, `(Z(ω)·X(i)·Z(Ω))ᵀ` in frame rotations.
    fn frame_transform(orbit: &Orbit<Self>, t: DateTime<Utc>) -> Mat3 {
        let ω = Self::argument_of_perigee(orbit, t);
        let i = orbit.inclination;
        let Ω = Self::raan(orbit, t);

        (frame_z(ω) * frame_x(i) * frame_z(Ω)).transpose()
    }

    fn position(orbit: &Orbit<Self>, t: DateTime<Utc>) -> Result<Vec3, OrbitError> {
        Ok(Self::frame_transform(orbit, t) * orbit.perifocal_position(t)?)
    }
}

/// Unperturbed Keplerian motion, the orbital plane is fixed in inertial space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwoBody;

impl OrbitKinematics for TwoBody {
    const NAME: &'static str = "TwoBody";

    fn raan(orbit: &Orbit<Self>, _t: DateTime<Utc>) -> Num {
        orbit.right_ascension_of_the_ascending_node
    }

    fn argument_of_perigee(orbit: &Orbit<Self>, _t: DateTime<Utc>) -> Num {
        orbit.argument_of_perigee
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::rotation::{x, z};
    use crate::{OrbitBuilder, DEG};

    #[test]
    fn frame_transform_matches_vector_rotations() {
        let (i, Ω, ω) = (28.5 * DEG, 200.0 * DEG, 75.0 * DEG);
        let epoch = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let orbit: Orbit<TwoBody> = OrbitBuilder::new()
            .inclination(i)
            .right_ascension_of_the_ascending_node(Ω)
            .argument_of_perigee(ω)
            .epoch(epoch)
            .build()
            .unwrap();

        let q = TwoBody::frame_transform(&orbit, epoch);

        assert!(q.abs_diff_eq(z(Ω) * x(i) * z(ω), 1e-12));
    }
}
