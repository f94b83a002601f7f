//! YAML configuration loading
//!
//! A configuration file is a serialized [`SimulationConfig`]; every field is
//! optional and falls back to the library defaults. Example:
//!
//! ```yaml
//! population_size: 1000
//! seed: 42
//! preferences:
//!   eta: -1.5
//!   gamma: 0.8
//!   fixed_cost: 0.1
//!   disutility:
//!     type: Heterogeneous
//!     covariate_loading: 0.5
//!     noise_scale: 0.5
//! regimes:
//!   - label: baseline
//!   - label: reform
//!     tax: { rho: 0.8, r: 0.05 }
//! sampling: Panel
//! ```

use std::fs;
use std::path::Path;

use laborsim_core::SimulationConfig;
use laborsim_core::model::{Regime, TaxConfig};

use crate::error::DataError;

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub population_size: Option<usize>,
}

impl Overrides {
    #[must_use]
    pub fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(n) = self.population_size {
            config.population_size = n;
        }
        config
    }
}

pub fn from_yaml(yaml: &str) -> Result<SimulationConfig, DataError> {
    serde_saphyr::from_str(yaml)
        .map_err(|e| DataError::Parse(format!("Failed to parse config: {}", e)))
}

pub fn to_yaml(config: &SimulationConfig) -> Result<String, DataError> {
    serde_saphyr::to_string(config)
        .map_err(|e| DataError::Serialize(format!("Failed to serialize config: {}", e)))
}

/// Read `path` (or start from defaults) and apply the overrides.
///
/// The result is not validated; callers run [`SimulationConfig::validate`]
/// so that parse and parameter errors are reported separately.
pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<SimulationConfig, DataError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| {
                DataError::Io(format!("Failed to read config {}: {}", path.display(), e))
            })?;
            from_yaml(&content)?
        }
        None => SimulationConfig::default(),
    };

    tracing::debug!(
        "loaded config from {}",
        path.map_or_else(|| "defaults".to_string(), |p| p.display().to_string())
    );
    Ok(overrides.apply(config))
}

/// Default configuration with a second, taxed regime to show the layout
pub fn template() -> Result<String, DataError> {
    let mut config = SimulationConfig::default();
    config
        .regimes
        .push(Regime::new("reform", 0.5, 0.5).with_tax(TaxConfig::new(0.8, 0.05)));
    to_yaml(&config)
}
