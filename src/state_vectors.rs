use chrono::{DateTime, Utc};

use crate::anomaly::true_to_mean;
use crate::{earth, Num, Orbit, OrbitError, OrbitKinematics, Vec3, TWO_PI};

/// Cartesian position (m) and velocity (m/s) in the inertial frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateVectors {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Below this magnitude the eccentricity vector has no usable direction
const CIRCULAR_EPSILON: Num = 1e-12;

/// How far outside [-1, 1] a cosine may stray from round-off alone
const COSINE_SLACK: Num = 1e-12;

fn checked_acos(cosine: Num, what: &'static str) -> Result<Num, OrbitError> {
    if cosine.is_nan() || cosine.abs() > 1.0 + COSINE_SLACK {
        return Err(OrbitError::Degenerate(what));
    }

    Ok(cosine.clamp(-1.0, 1.0).acos())
}

impl StateVectors {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    pub fn abs_diff(&self, other: &Self) -> Num {
        self.position.distance(other.position) + self.velocity.distance(other.velocity)
    }

    /// Classical element determination. The state is taken to hold at
    /// `epoch`.
    ///
    /// Equatorial and circular orbits are rejected with
    /// [`OrbitError::Degenerate`]: their node line or perigee direction is
    /// undefined. The states of an [`OrbitBuilder`](crate::OrbitBuilder)
    /// orbit left at its default (zero) eccentricity therefore cannot be
    /// converted back.
    pub fn to_orbit<K: OrbitKinematics>(&self, epoch: DateTime<Utc>) -> Result<Orbit<K>, OrbitError> {
        let μ = earth::MU;

        let rv = self.position;
        let r = rv.length();
        let vv = self.velocity;

        if r == 0.0 {
            return Err(OrbitError::Degenerate("position vector has zero length"));
        }

        // Radial velocity decides which half of the orbit we're on
        let vr = rv.dot(vv) / r;

        // Orbital angular momentum
        // This vector should point in the normal direction of the orbit
        let hv = rv.cross(vv);
        let h = hv.length();

        if h == 0.0 {
            return Err(OrbitError::Degenerate("rectilinear motion has no orbital plane"));
        }

        // N vector - it's the vector parallel to the node line
        let nv = Vec3::Z.cross(hv);
        let n = nv.length();

        if n <= h * 1e-12 {
            return Err(OrbitError::Degenerate("equatorial orbit has no ascending node"));
        }

        let ev = vv.cross(hv) / μ - rv / r;
        let e = ev.length();

        if e < CIRCULAR_EPSILON {
            return Err(OrbitError::Degenerate("circular orbit has no perigee"));
        }
        if e >= 1.0 {
            return Err(OrbitError::InvalidEccentricity(e));
        }

        tracing::trace!(?hv, ?nv, ?ev, "determining elements from state vectors");

        // Equation is i = arccos(hz / h)
        let i = checked_acos(hv.z / h, "inclination cosine out of range")?;

        // We find the angle between the node line & the X axis
        let mut Ω = checked_acos(nv.x / n, "node cosine out of range")?;
        if nv.y < 0.0 {
            Ω = TWO_PI - Ω;
        }

        let mut ω = checked_acos(nv.dot(ev) / (n * e), "perigee cosine out of range")?;
        if ev.z < 0.0 {
            ω = TWO_PI - ω;
        }

        let mut v = checked_acos(ev.dot(rv) / (e * r), "true anomaly cosine out of range")?;
        if vr < 0.0 {
            v = TWO_PI - v;
        }

        let a = h.powi(2) / (μ * (1.0 - e.powi(2)));
        let M = true_to_mean(v, e).rem_euclid(TWO_PI);

        tracing::debug!(a, e, i, raan = Ω, argp = ω, v, "elements from state vectors");

        crate::OrbitBuilder::new()
            .semi_major_axis(a)
            .eccentricity(e)
            .inclination(i)
            .right_ascension_of_the_ascending_node(Ω)
            .argument_of_perigee(ω)
            .mean_anomaly_at_epoch(M)
            .epoch(epoch)
            .build()
    }
}
