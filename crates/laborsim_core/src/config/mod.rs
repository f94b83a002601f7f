//! Simulation configuration
//!
//! `SimulationConfig` carries everything a run needs: population size, seed,
//! preferences, the regimes to simulate and solver settings. It is plain data
//! (serde-friendly) and is validated once, up front, before any agent exists.
//!
//! # Builder DSL
//!
//! ```ignore
//! use laborsim_core::config::SimulationBuilder;
//!
//! let config = SimulationBuilder::new()
//!     .population_size(1_000)
//!     .seed(42)
//!     .eta(-1.5)
//!     .gamma(0.8)
//!     .beta(1.0)
//!     .fixed_cost(0.1)
//!     .regime("baseline", 0.5, 0.5)
//!     .taxed_regime("reform", 0.5, 0.5, 0.8, 0.0)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{PreferenceConfig, Regime};
use crate::population::PopulationParams;
use crate::solver::SolverOptions;

pub mod builder;

pub use builder::SimulationBuilder;

fn default_population_size() -> usize {
    1000
}

fn default_regimes() -> Vec<Regime> {
    vec![Regime::default()]
}

fn default_true() -> bool {
    true
}

/// Which pipeline stages run after the interior solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStages {
    /// Resolve the extensive margin; when off every agent works interior hours
    #[serde(default = "default_true")]
    pub participation: bool,
}

impl Default for PipelineStages {
    fn default() -> Self {
        Self {
            participation: true,
        }
    }
}

/// How populations relate across regimes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingMode {
    /// Each regime draws its own population
    #[default]
    Independent,
    /// One set of agents is observed under every regime
    Panel,
}

/// What to do when an agent's Newton solve fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Fail the whole run with the first failing agent
    #[default]
    Abort,
    /// Keep the agent with no outcome and carry on
    Flag,
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Agents per regime
    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Master seed; regime-level seeds are derived from it
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub preferences: PreferenceConfig,

    #[serde(default)]
    pub population: PopulationParams,

    #[serde(default = "default_regimes")]
    pub regimes: Vec<Regime>,

    #[serde(default)]
    pub solver: SolverOptions,

    #[serde(default)]
    pub stages: PipelineStages,

    #[serde(default)]
    pub sampling: SamplingMode,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            seed: 0,
            preferences: PreferenceConfig::default(),
            population: PopulationParams::default(),
            regimes: default_regimes(),
            solver: SolverOptions::default(),
            stages: PipelineStages::default(),
            sampling: SamplingMode::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every parameter before simulation starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if u32::try_from(self.population_size).is_err() {
            return Err(ConfigError::PopulationTooLarge(self.population_size));
        }
        if self.regimes.is_empty() {
            return Err(ConfigError::NoRegimes);
        }
        if self.regimes.len() > usize::from(u16::MAX) + 1 {
            return Err(ConfigError::TooManyRegimes(self.regimes.len()));
        }
        self.preferences.validate()?;
        self.population.validate()?;
        self.solver.validate()?;
        for regime in &self.regimes {
            regime.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_heterogeneous(&self) -> bool {
        self.preferences.is_heterogeneous()
    }

    /// Same configuration with a different master seed
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Same configuration with a different number of agents per regime
    #[must_use]
    pub fn with_population_size(&self, population_size: usize) -> Self {
        Self {
            population_size,
            ..self.clone()
        }
    }
}
