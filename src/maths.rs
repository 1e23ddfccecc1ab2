//! Mathematical utilities

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Second seed used by [SecantOptions::solve] when no second seed is given and `x0 = 0`.
pub const ZERO_SEED_OFFSET: f64 = 1e-3;

/// Options for the secant root finder.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct SecantOptions {
    /// Iteration stops once the relative change of the function value between two
    /// consecutive iterates is at most `tolerance`.
    pub tolerance: f64,
    /// Maximum number of function evaluations, including those of the two seeds.
    /// A budget of one evaluates only `x0`; a budget of zero evaluates nothing.
    pub max_evaluations: usize,
}

impl Default for SecantOptions {
    fn default() -> Self {
        SecantOptions {
            tolerance: 1.49012e-08,
            max_evaluations: 100,
        }
    }
}

/// Why the secant iteration stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The function evaluated to exactly zero.
    ExactRoot,
    /// The relative change in function value fell below the tolerance.
    Tolerance,
    /// Two consecutive function values were identical, so the secant has no zero crossing.
    Stalled,
    /// The evaluation budget ran out.
    EvaluationLimit,
}

/// Outcome of a secant search.
#[derive(Clone, Copy, Debug)]
pub struct Root {
    /// The most recent iterate.
    pub x: f64,
    /// Function value at `x`.
    pub residual: f64,
    /// Number of function evaluations used.
    pub evaluations: usize,
    pub termination: Termination,
}

impl SecantOptions {
    pub fn new(tolerance: f64, max_evaluations: usize) -> Self {
        SecantOptions {
            tolerance,
            max_evaluations,
        }
    }

    /// Searches for a zero of `func` with the secant method, starting from `x0` and `x1`.
    ///
    /// A result is always returned, whether or not the iteration converged; inspect
    /// [Root::termination] or [Root::residual] when convergence matters.
    ///
    /// # Arguments
    ///
    /// `func`: the function whose root is wanted.
    ///
    /// `x0`: starting estimate of the root.
    ///
    /// `x1`: second starting estimate. Defaults to `1.001 * x0`, or to [ZERO_SEED_OFFSET]
    /// when `x0` is zero.
    pub fn solve<F>(&self, mut func: F, x0: f64, x1: Option<f64>) -> Root
    where
        F: FnMut(f64) -> f64,
    {
        if self.max_evaluations == 0 {
            warn!(x = x0, "secant search has no evaluation budget");
            return Root {
                x: x0,
                residual: f64::NAN,
                evaluations: 0,
                termination: Termination::EvaluationLimit,
            };
        }

        let mut x0 = x0;
        let mut fx0 = func(x0);
        if fx0 == 0.0 {
            debug!(x = x0, "secant seed is an exact root");
            return Root {
                x: x0,
                residual: fx0,
                evaluations: 1,
                termination: Termination::ExactRoot,
            };
        }
        if self.max_evaluations < 2 {
            warn!(x = x0, residual = fx0, "secant budget exhausted by the first seed");
            return Root {
                x: x0,
                residual: fx0,
                evaluations: 1,
                termination: Termination::EvaluationLimit,
            };
        }

        let mut x1 = x1.unwrap_or_else(|| default_second_seed(x0));
        let mut fx1 = func(x1);
        let mut evaluations = 2;

        let termination = loop {
            if fx0 == 0.0 {
                break Termination::ExactRoot;
            }
            if fx1 == fx0 {
                break Termination::Stalled;
            }
            if ((fx1 - fx0) / fx0).abs() <= self.tolerance {
                break Termination::Tolerance;
            }
            if evaluations >= self.max_evaluations {
                break Termination::EvaluationLimit;
            }
            let x2 = x1 - fx1 * (x1 - x0) / (fx1 - fx0);
            x0 = x1;
            x1 = x2;
            fx0 = fx1;
            fx1 = func(x1);
            evaluations += 1;
        };

        match termination {
            Termination::Stalled | Termination::EvaluationLimit => warn!(
                x = x1,
                residual = fx1,
                evaluations,
                ?termination,
                "secant search stopped without converging"
            ),
            _ => debug!(
                x = x1,
                residual = fx1,
                evaluations,
                ?termination,
                "secant search finished"
            ),
        }

        Root {
            x: x1,
            residual: fx1,
            evaluations,
            termination,
        }
    }
}

fn default_second_seed(x0: f64) -> f64 {
    if x0 == 0.0 {
        warn!("secant seed is zero, offsetting second seed by {}", ZERO_SEED_OFFSET);
        ZERO_SEED_OFFSET
    } else {
        1.001 * x0
    }
}

/// Find a root of `func` near `x0` using the secant method.
///
/// Returns the last iterate. See [SecantOptions::solve] for the full report.
pub fn find_root<F>(func: F, x0: f64, x1: Option<f64>, tol: f64, max_evals: usize) -> f64
where
    F: FnMut(f64) -> f64,
{
    SecantOptions::new(tol, max_evals).solve(func, x0, x1).x
}
