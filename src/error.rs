use thiserror::Error;

use crate::{Num, TleError};

#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("Kepler's equation did not converge within {iterations} iterations (last step {residual:e})")]
    Convergence { iterations: usize, residual: Num },

    #[error("Eccentricity must lie in [0, 1) for a closed orbit, got {0}")]
    InvalidEccentricity(Num),

    #[error("Semi-major axis must be positive and finite, got {0}")]
    InvalidSemiMajorAxis(Num),

    #[error("Degenerate geometry: {0}")]
    Degenerate(&'static str),

    #[error("TleError: {0}")]
    Tle(#[from] TleError),
}
