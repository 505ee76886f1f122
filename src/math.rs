use crate::{Num, OrbitError};

/// Stopping criteria for [`newton_raphson`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonRaphson {
    /// Largest step still considered converged
    pub tolerance: Num,
    pub max_iterations: usize,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 1000,
        }
    }
}

/// Approximates the root of a function using the Newton-Raphson method.
///
/// # Arguments
/// f - The function to approximate the root of.
/// f_prime - The derivative of the function.
/// x0 - The initial guess.
/// settings - Step tolerance and iteration cap.
///
/// # Returns
/// The approximate root, or [`OrbitError::Convergence`] if the last step was
/// still larger than the tolerance when the iteration cap was reached.
pub fn newton_raphson(
    f: impl Fn(Num) -> Num,
    f_prime: impl Fn(Num) -> Num,
    x0: Num,
    settings: &NewtonRaphson,
) -> Result<Num, OrbitError> {
    let mut x = x0;
    let mut step = Num::INFINITY;
    let mut iterations = 0;

    while step.abs() > settings.tolerance && iterations < settings.max_iterations {
        iterations += 1;
        step = f(x) / f_prime(x);
        x -= step;
    }

    if step.is_nan() || step.abs() > settings.tolerance {
        tracing::warn!(iterations, x0, x, step, "newton-raphson failed to converge");
        return Err(OrbitError::Convergence {
            iterations,
            residual: step.abs(),
        });
    }

    tracing::trace!(iterations, x, "newton-raphson converged");
    Ok(x)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn square_root() {
        let root = newton_raphson(|x| x * x - 2.0, |x| 2.0 * x, 1.0, &Default::default()).unwrap();

        assert_abs_diff_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn reports_iteration_count_on_failure() {
        // No real root, the iterates wander forever
        let settings = NewtonRaphson {
            tolerance: 1e-8,
            max_iterations: 25,
        };
        let result = newton_raphson(|x| x * x + 1.0, |x| 2.0 * x, 0.5, &settings);

        match result {
            Err(OrbitError::Convergence { iterations, .. }) => assert_eq!(iterations, 25),
            other => panic!("expected a convergence failure, got {other:?}"),
        }
    }

    #[test]
    fn zero_iterations_is_a_failure() {
        let settings = NewtonRaphson {
            tolerance: 1e-8,
            max_iterations: 0,
        };

        assert!(newton_raphson(|x| x, |_| 1.0, 0.0, &settings).is_err());
    }
}
