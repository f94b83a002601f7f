//! Labor supply simulation library
//!
//! Simulates a population of agents choosing hours and consumption under a
//! separable power utility and a linear (possibly taxed) budget constraint,
//! including the extensive-margin participation decision. The output is a
//! synthetic dataset with known structural parameters, used to study
//! estimator bias under heterogeneity and selection.
//!
//! Pipeline, per regime:
//! - `population` draws agents (covariate, log-wage, non-labor income,
//!   optional agent-specific disutility weight)
//! - `solver` finds interior hours from the first-order condition
//! - `participation` compares working against not working
//! - `simulation` orchestrates regimes and stacks the labelled cross-sections
//!
//! ```ignore
//! use laborsim_core::{SimulationBuilder, simulation::simulate};
//!
//! let config = SimulationBuilder::new()
//!     .population_size(1_000)
//!     .seed(42)
//!     .regime("baseline", 0.5, 0.5)
//!     .taxed_regime("reform", 0.5, 0.5, 0.8, 0.0)
//!     .build()?;
//! let dataset = simulate(&config)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod metrics;
pub mod participation;
pub mod population;
pub mod simulation;
pub mod solver;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{SimulationBuilder, SimulationConfig};
pub use error::{ConfigError, NumericalError, SimulationError};
pub use simulation::simulate;
