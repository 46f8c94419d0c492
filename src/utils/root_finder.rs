use tracing::debug;

use crate::constants::{
    DERIVATIVE_PERTURBATION, MIN_DERIVATIVE, SOLVER_FALLBACK_ROOT, SOLVER_MAX_ITERATIONS,
    SOLVER_PRECISION,
};
use crate::errors::SimulationError;

/// Scalar Newton–Raphson solver.
///
/// Iterates `x ← x − f(x)/f'(x)` until the step falls below `precision`.
/// The loop is bounded by `max_iterations`; running out of iterations or
/// producing a non-finite iterate is reported as
/// [`SimulationError::NumericDivergence`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphson {
    pub precision: f64,
    pub max_iterations: usize,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        NewtonRaphson::new(SOLVER_PRECISION, SOLVER_MAX_ITERATIONS)
    }
}

impl NewtonRaphson {
    pub fn new(precision: f64, max_iterations: usize) -> Self {
        NewtonRaphson {
            precision,
            max_iterations,
        }
    }

    pub fn try_solve<F, D>(&self, func: F, deriv: D, x0: f64) -> Result<f64, SimulationError>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        let mut x = x0;

        for _ in 0..self.max_iterations {
            let mut slope = deriv(x);
            if slope.abs() < MIN_DERIVATIVE {
                // Flat spot: nudge off it before dividing.
                x += DERIVATIVE_PERTURBATION;
                slope = deriv(x);
            }

            let step = func(x) / slope;
            if !step.is_finite() {
                return Err(SimulationError::NumericDivergence {
                    iterations: self.max_iterations,
                    last_iterate: x,
                });
            }

            x -= step;
            if !x.is_finite() {
                break;
            }
            if step.abs() < self.precision {
                return Ok(x);
            }
        }

        Err(SimulationError::NumericDivergence {
            iterations: self.max_iterations,
            last_iterate: x,
        })
    }

    /// Like [`try_solve`](Self::try_solve) but never fails: divergence yields
    /// [`SOLVER_FALLBACK_ROOT`].
    pub fn solve<F, D>(&self, func: F, deriv: D, x0: f64) -> f64
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        self.try_solve(func, deriv, x0).unwrap_or_else(|err| {
            debug!(%err, x0, "newton-raphson fell back to default root");
            SOLVER_FALLBACK_ROOT
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_converges_from_both_sides_of_root() {
        let solver = NewtonRaphson::new(1e-6, 100);
        let root = 3.0;
        // f(x) = x³ − 27 is monotonic with a single root at 3
        let f = |x: f64| x.powi(3) - 27.0;
        let df = |x: f64| 3.0 * x.powi(2);

        for seed in [root / 2.0, root * 2.0, root * 10.0, 0.5] {
            let x = solver.try_solve(f, df, seed).unwrap();
            assert_abs_diff_eq!(x, root, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_linear_function_converges_in_one_step() {
        let solver = NewtonRaphson::default();
        let x = solver.try_solve(|x| 2.0 * x - 8.0, |_| 2.0, 100.0).unwrap();
        assert_abs_diff_eq!(x, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_derivative_seed_is_perturbed() {
        let solver = NewtonRaphson::new(1e-8, 100);
        // f'(0) = 0, so a naive first step would divide by zero
        let x = solver.try_solve(|x| x * x - 4.0, |x| 2.0 * x, 0.0).unwrap();
        assert_abs_diff_eq!(x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_real_root_hits_iteration_bound() {
        let solver = NewtonRaphson::new(1e-9, 50);
        let result = solver.try_solve(|x| x * x + 1.0, |x| 2.0 * x, 0.5);
        assert!(matches!(
            result,
            Err(SimulationError::NumericDivergence { iterations: 50, .. })
        ));
    }

    #[test]
    fn test_solve_returns_fallback_on_divergence() {
        let solver = NewtonRaphson::new(1e-9, 20);
        let x = solver.solve(|x| x * x + 1.0, |x| 2.0 * x, 0.5);
        assert_eq!(x, SOLVER_FALLBACK_ROOT);

        let x = solver.solve(|_| f64::NAN, |_| 1.0, 0.5);
        assert_eq!(x, SOLVER_FALLBACK_ROOT);
    }
}
