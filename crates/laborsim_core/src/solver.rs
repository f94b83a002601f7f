//! Interior hours solver
//!
//! Solves the intensive-margin first-order condition
//!
//! ```text
//! f(h) = w·(w·h + R)^η − β·h^γ = 0
//! ```
//!
//! with plain Newton steps. Outside the feasible cone `w·h + R > 0, h > 0`
//! the power terms are undefined, so every update is followed by two
//! projections (feasibility first, then positivity). The solver never hands
//! back an iterate that violates either constraint.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, NumericalError, SolveError};

fn default_iterations() -> usize {
    30
}

fn default_epsilon() -> f64 {
    1e-6
}

/// Residual below which a fixed-iteration solve counts as converged
pub const FIXED_ITERATION_TOLERANCE: f64 = 1e-8;

/// When to stop iterating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoppingPolicy {
    /// Always perform exactly `iterations` updates
    FixedIterations {
        #[serde(default = "default_iterations")]
        iterations: usize,
    },
    /// Stop once the relative FOC residual falls below `tolerance`,
    /// giving up after `max_iterations` updates
    Tolerance { tolerance: f64, max_iterations: usize },
}

impl Default for StoppingPolicy {
    fn default() -> Self {
        StoppingPolicy::FixedIterations {
            iterations: default_iterations(),
        }
    }
}

impl StoppingPolicy {
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        match *self {
            StoppingPolicy::FixedIterations { iterations } => iterations,
            StoppingPolicy::Tolerance { max_iterations, .. } => max_iterations,
        }
    }

    /// Largest final residual accepted as converged
    #[must_use]
    pub fn convergence_tolerance(&self) -> f64 {
        match *self {
            StoppingPolicy::FixedIterations { .. } => FIXED_ITERATION_TOLERANCE,
            StoppingPolicy::Tolerance { tolerance, .. } => tolerance,
        }
    }
}

/// Solver configuration shared by every agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    #[serde(default)]
    pub policy: StoppingPolicy,
    /// Offset used to place a projected iterate strictly inside the feasible region
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            policy: StoppingPolicy::default(),
            epsilon: default_epsilon(),
        }
    }
}

impl SolverOptions {
    #[must_use]
    pub fn tolerance(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            policy: StoppingPolicy::Tolerance {
                tolerance,
                max_iterations,
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::InvalidSolverOptions(
                "epsilon must be positive and finite",
            ));
        }
        match self.policy {
            StoppingPolicy::FixedIterations { iterations } if iterations == 0 => Err(
                ConfigError::InvalidSolverOptions("iteration count must be at least 1"),
            ),
            StoppingPolicy::Tolerance {
                tolerance,
                max_iterations,
            } => {
                if !(tolerance.is_finite() && tolerance > 0.0) {
                    Err(ConfigError::InvalidSolverOptions(
                        "tolerance must be positive and finite",
                    ))
                } else if max_iterations == 0 {
                    Err(ConfigError::InvalidSolverOptions(
                        "max_iterations must be at least 1",
                    ))
                } else {
                    Ok(())
                }
            }
            StoppingPolicy::FixedIterations { .. } => Ok(()),
        }
    }
}

/// Number of times each boundary projection fired during one solve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionCounts {
    /// `w·h + R ≤ 0` reset to `−R/w + ε`
    pub feasibility: u32,
    /// `h ≤ 0` reset to `ε`
    pub positivity: u32,
}

impl ProjectionCounts {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.feasibility + self.positivity
    }
}

/// What a single solve produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub hours: f64,
    pub iterations: usize,
    /// Relative FOC gap at `hours`, see [`HoursProblem::relative_residual`]
    pub residual: f64,
    /// `residual` is within the policy's convergence tolerance. A solve can
    /// run out of iterations with a finite, feasible but unconverged iterate,
    /// e.g. when the root sits closer to the boundary than `epsilon`.
    pub converged: bool,
    pub projections: ProjectionCounts,
}

/// One agent's first-order condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoursProblem {
    /// Effective (after-tax) wage
    pub wage: f64,
    /// Adjusted non-labor income `R`, may be negative
    pub adjusted_income: f64,
    pub eta: f64,
    pub gamma: f64,
    pub beta: f64,
}

impl HoursProblem {
    #[must_use]
    pub fn new(wage: f64, adjusted_income: f64, eta: f64, gamma: f64, beta: f64) -> Self {
        Self {
            wage,
            adjusted_income,
            eta,
            gamma,
            beta,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.wage.is_finite() && self.wage > 0.0) {
            return Err(ConfigError::NonPositiveWage(self.wage));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(ConfigError::NonPositiveBeta(self.beta));
        }
        if !self.adjusted_income.is_finite() {
            return Err(ConfigError::NonFiniteParameter("adjusted income"));
        }
        if !(self.eta.is_finite() && self.eta < 0.0) {
            return Err(ConfigError::NonNegativeEta(self.eta));
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ConfigError::NonPositiveGamma(self.gamma));
        }
        Ok(())
    }

    #[must_use]
    pub fn consumption(&self, hours: f64) -> f64 {
        self.wage * hours + self.adjusted_income
    }

    /// Marginal utility gain of an extra hour, `w·c^η`
    #[must_use]
    pub fn marginal_benefit(&self, hours: f64) -> f64 {
        self.wage * self.consumption(hours).powf(self.eta)
    }

    /// Marginal disutility of an extra hour, `β·h^γ`
    #[must_use]
    pub fn marginal_cost(&self, hours: f64) -> f64 {
        self.beta * hours.powf(self.gamma)
    }

    #[must_use]
    pub fn foc(&self, hours: f64) -> f64 {
        self.marginal_benefit(hours) - self.marginal_cost(hours)
    }

    /// `η·w²·c^(η−1) − γ·β·h^(γ−1)`
    #[must_use]
    pub fn foc_derivative(&self, hours: f64) -> f64 {
        let c = self.consumption(hours);
        self.eta * self.wage * self.wage * c.powf(self.eta - 1.0)
            - self.gamma * self.beta * hours.powf(self.gamma - 1.0)
    }

    /// `|1 − β·h^γ / (w·c^η)|`, scale-free so one tolerance fits all agents
    #[must_use]
    pub fn relative_residual(&self, hours: f64) -> f64 {
        (1.0 - self.marginal_cost(hours) / self.marginal_benefit(hours)).abs()
    }

    /// Pull `hours` back inside `w·h + R > 0` and `h > 0`, in that order
    fn project(&self, hours: f64, epsilon: f64, counts: &mut ProjectionCounts) -> f64 {
        let mut h = hours;
        if self.consumption(h) <= 0.0 {
            h = -self.adjusted_income / self.wage + epsilon;
            // epsilon is absorbed when |R/w| is large; step up until feasible
            while self.consumption(h) <= 0.0 {
                h += h.abs().max(epsilon) * f64::EPSILON;
            }
            counts.feasibility += 1;
        }
        if h <= 0.0 {
            h = epsilon;
            counts.positivity += 1;
        }
        h
    }
}

/// Feasible starting point `max(−R, 0)/w + 1`
#[must_use]
pub fn initial_guess(wage: f64, adjusted_income: f64) -> f64 {
    (-adjusted_income).max(0.0) / wage + 1.0
}

/// Projected Newton solver for interior hours
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NewtonHoursSolver {
    options: SolverOptions,
}

impl NewtonHoursSolver {
    #[must_use]
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// Solve for interior hours starting from `initial_guess`.
    ///
    /// Parameter errors are reported before the first iteration. A derivative
    /// that vanishes or an iterate that stops being finite is reported as a
    /// [`NumericalError`] instead of letting NaN through.
    pub fn solve(
        &self,
        initial_guess: f64,
        problem: &HoursProblem,
    ) -> Result<SolveReport, SolveError> {
        problem.validate()?;
        if !(initial_guess.is_finite() && initial_guess > 0.0) {
            return Err(ConfigError::NonPositiveInitialGuess(initial_guess).into());
        }

        let epsilon = self.options.epsilon;
        let mut projections = ProjectionCounts::default();
        let mut hours = problem.project(initial_guess, epsilon, &mut projections);
        let mut iterations = 0;

        for iteration in 1..=self.options.policy.max_iterations() {
            let slope = problem.foc_derivative(hours);
            if slope == 0.0 || !slope.is_finite() {
                return Err(NumericalError::DerivativeVanished { iteration, hours }.into());
            }

            let next = hours - problem.foc(hours) / slope;
            if !next.is_finite() {
                return Err(NumericalError::NonFinite {
                    iteration,
                    hours: next,
                }
                .into());
            }
            hours = problem.project(next, epsilon, &mut projections);
            iterations = iteration;

            if let StoppingPolicy::Tolerance { tolerance, .. } = self.options.policy
                && problem.relative_residual(hours) <= tolerance
            {
                break;
            }
        }

        let residual = problem.relative_residual(hours);
        Ok(SolveReport {
            hours,
            iterations,
            residual,
            converged: residual <= self.options.policy.convergence_tolerance(),
            projections,
        })
    }
}

/// Solve with the default fixed-iteration policy
pub fn solve(
    initial_guess: f64,
    wage: f64,
    adjusted_income: f64,
    eta: f64,
    gamma: f64,
    beta: f64,
) -> Result<f64, SolveError> {
    let problem = HoursProblem::new(wage, adjusted_income, eta, gamma, beta);
    NewtonHoursSolver::default()
        .solve(initial_guess, &problem)
        .map(|report| report.hours)
}
