use crate::{earth, StateVectors};

/// Time derivative of a state under point-mass gravity, for use with an
/// external integrator: `(r, v) -> (v, -μ r / |r|³)`.
pub fn two_body_derivative(state: &StateVectors) -> StateVectors {
    let r = state.position.length();

    StateVectors {
        position: state.velocity,
        velocity: -earth::MU * state.position / r.powi(3),
    }
}
