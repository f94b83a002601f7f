use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{AgentId, RegimeId};

/// Invalid preference, tax, population or solver parameters.
///
/// Raised by validation before any agent is generated, so a run that fails
/// with one of these never produces a partial dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Consumption curvature must be strictly negative
    NonNegativeEta(f64),
    /// Hours curvature must be strictly positive
    NonPositiveGamma(f64),
    /// Disutility weight must be strictly positive
    NonPositiveBeta(f64),
    /// Fixed participation cost must be non-negative
    NegativeFixedCost(f64),
    /// Marginal retention rate must be strictly positive
    NonPositiveRho { regime: String, rho: f64 },
    /// Wage passed to the solver must be strictly positive
    NonPositiveWage(f64),
    InvalidNoiseScale {
        channel: &'static str,
        value: f64,
    },
    NonPositiveInitialGuess(f64),
    InvalidSolverOptions(&'static str),
    NonFiniteParameter(&'static str),
    EmptyPopulation,
    PopulationTooLarge(usize),
    NoRegimes,
    TooManyRegimes(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonNegativeEta(eta) => {
                write!(f, "eta must be strictly negative (got {eta})")
            }
            ConfigError::NonPositiveGamma(gamma) => {
                write!(f, "gamma must be strictly positive (got {gamma})")
            }
            ConfigError::NonPositiveBeta(beta) => {
                write!(f, "disutility weight must be strictly positive (got {beta})")
            }
            ConfigError::NegativeFixedCost(beta0) => {
                write!(f, "fixed participation cost must be non-negative (got {beta0})")
            }
            ConfigError::NonPositiveRho { regime, rho } => {
                write!(
                    f,
                    "regime {regime:?}: retention rate rho must be strictly positive (got {rho})"
                )
            }
            ConfigError::NonPositiveWage(wage) => {
                write!(f, "wage must be strictly positive (got {wage})")
            }
            ConfigError::InvalidNoiseScale { channel, value } => {
                write!(
                    f,
                    "{channel} noise scale must be non-negative and finite (got {value})"
                )
            }
            ConfigError::NonPositiveInitialGuess(h0) => {
                write!(f, "initial hours guess must be strictly positive (got {h0})")
            }
            ConfigError::InvalidSolverOptions(reason) => {
                write!(f, "invalid solver options: {reason}")
            }
            ConfigError::NonFiniteParameter(name) => write!(f, "{name} must be finite"),
            ConfigError::EmptyPopulation => write!(f, "population size must be at least 1"),
            ConfigError::PopulationTooLarge(n) => {
                write!(f, "population size {n} exceeds the agent id range")
            }
            ConfigError::NoRegimes => write!(f, "at least one regime is required"),
            ConfigError::TooManyRegimes(n) => {
                write!(f, "{n} regimes exceed the regime id range")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure of the Newton iteration for a single agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumericalError {
    /// The FOC derivative underflowed to zero or overflowed
    DerivativeVanished { iteration: usize, hours: f64 },
    /// The iterate left the real line even after projection
    NonFinite { iteration: usize, hours: f64 },
}

impl fmt::Display for NumericalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericalError::DerivativeVanished { iteration, hours } => write!(
                f,
                "FOC derivative is zero or non-finite at iteration {iteration} (hours={hours})"
            ),
            NumericalError::NonFinite { iteration, hours } => write!(
                f,
                "non-finite hours iterate at iteration {iteration} (hours={hours})"
            ),
        }
    }
}

impl std::error::Error for NumericalError {}

/// Errors surfaced by the solver entry point
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    Config(ConfigError),
    Numerical(NumericalError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Config(e) => write!(f, "{e}"),
            SolveError::Numerical(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Config(e) => Some(e),
            SolveError::Numerical(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SolveError {
    fn from(err: ConfigError) -> Self {
        SolveError::Config(err)
    }
}

impl From<NumericalError> for SolveError {
    fn from(err: NumericalError) -> Self {
        SolveError::Numerical(err)
    }
}

/// Errors that abort a whole simulation run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    /// An agent's solve failed under `FailurePolicy::Abort`
    Numerical {
        regime: RegimeId,
        agent: AgentId,
        source: NumericalError,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "configuration error: {e}"),
            SimulationError::Numerical {
                regime,
                agent,
                source,
            } => write!(
                f,
                "numerical failure for agent {} in regime {}: {source}",
                agent.0, regime.0
            ),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Numerical { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
