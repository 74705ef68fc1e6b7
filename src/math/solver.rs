//! One-dimensional root finding.
//!
//! [`SafeguardedNewton`] runs Newton–Raphson inside a sign-change bracket:
//!
//! - a Newton step is taken when it lands strictly inside the bracket
//! - otherwise (or when the derivative vanishes / the step is non-finite) the
//!   iteration bisects
//! - after every step the bracket shrinks to keep the sign change

use thiserror::Error;

/// Root-finder failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("no sign change in bracket [{lo}, {hi}]")]
    NoBracket { lo: f64, hi: f64 },

    #[error("failed to converge after {iterations} iterations")]
    MaxIterationsExceeded { iterations: usize },

    #[error("function is not finite at x = {x}")]
    NonFinite { x: f64 },
}

/// Convergence settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Stop when the step (or bracket width) falls below this.
    pub x_tolerance: f64,
    /// Stop when `|f(x)|` falls below this.
    pub f_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            x_tolerance: 1e-10,
            f_tolerance: 1e-12,
            max_iterations: 200,
        }
    }
}

/// Newton–Raphson with a bisection fallback.
#[derive(Debug, Clone, Default)]
pub struct SafeguardedNewton {
    config: SolverConfig,
}

impl SafeguardedNewton {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Find `x` in `[lo, hi]` with `f(x) = 0`, starting from `x0`.
    ///
    /// `f(lo)` and `f(hi)` must have opposite signs (or one of them be zero).
    /// `x0` outside the bracket is replaced by the midpoint.
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: f64, lo: f64, hi: f64) -> Result<f64, SolverError>
    where
        F: Fn(f64) -> f64,
        G: Fn(f64) -> f64,
    {
        let f_lo = eval(&f, lo)?;
        if f_lo == 0.0 {
            return Ok(lo);
        }
        let f_hi = eval(&f, hi)?;
        if f_hi == 0.0 {
            return Ok(hi);
        }
        if f_lo.signum() == f_hi.signum() {
            return Err(SolverError::NoBracket { lo, hi });
        }

        // Orient so that f(neg) < 0 < f(pos).
        let (mut neg, mut pos) = if f_lo < 0.0 { (lo, hi) } else { (hi, lo) };

        let mut x = if x0.is_finite() && x0 > lo.min(hi) && x0 < lo.max(hi) {
            x0
        } else {
            0.5 * (lo + hi)
        };

        for _ in 0..self.config.max_iterations {
            let fx = eval(&f, x)?;
            if fx.abs() < self.config.f_tolerance {
                return Ok(x);
            }
            if fx < 0.0 {
                neg = x;
            } else {
                pos = x;
            }

            let dfx = f_prime(x);
            let newton = x - fx / dfx;
            let (a, b) = (neg.min(pos), neg.max(pos));
            let next = if dfx.is_finite() && dfx != 0.0 && newton.is_finite() && newton > a && newton < b {
                newton
            } else {
                0.5 * (neg + pos)
            };

            if (next - x).abs() < self.config.x_tolerance || (b - a) < self.config.x_tolerance {
                return Ok(next);
            }
            x = next;
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}

fn eval<F: Fn(f64) -> f64>(f: &F, x: f64) -> Result<f64, SolverError> {
    let v = f(x);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SolverError::NonFinite { x })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_sqrt_two() {
        let solver = SafeguardedNewton::default();
        let root = solver
            .find_root(|x| x * x - 2.0, |x| 2.0 * x, 1.0, 0.0, 2.0)
            .unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn falls_back_to_bisection_with_flat_derivative() {
        // Derivative reported as zero everywhere: pure bisection.
        let solver = SafeguardedNewton::default();
        let root = solver.find_root(|x| x * x * x - x - 2.0, |_| 0.0, 1.5, 1.0, 2.0).unwrap();
        assert!((root * root * root - root - 2.0).abs() < 1e-8);
    }

    #[test]
    fn decreasing_function_in_either_bracket_order() {
        let solver = SafeguardedNewton::default();
        let f = |x: f64| 5.0 - x;
        let df = |_: f64| -1.0;
        assert!((solver.find_root(f, df, 0.0, 0.0, 10.0).unwrap() - 5.0).abs() < 1e-10);
        assert!((solver.find_root(f, df, 0.0, 10.0, 0.0).unwrap() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn missing_sign_change_is_reported() {
        let solver = SafeguardedNewton::default();
        let err = solver.find_root(|x| x * x + 1.0, |x| 2.0 * x, 0.0, -1.0, 1.0).unwrap_err();
        assert_eq!(err, SolverError::NoBracket { lo: -1.0, hi: 1.0 });
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let solver = SafeguardedNewton::new(SolverConfig {
            x_tolerance: 0.0,
            f_tolerance: 0.0,
            max_iterations: 3,
        });
        let err = solver.find_root(|x| x - 0.3, |_| 0.0, 0.0, 0.0, 1.0).unwrap_err();
        assert_eq!(err, SolverError::MaxIterationsExceeded { iterations: 3 });
    }
}
