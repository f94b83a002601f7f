use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_rho() -> f64 {
    1.0
}

/// Linear tax schedule applied to the budget constraint.
///
/// The after-tax wage is `rho * wage` and `r` is a lump-sum tax levied on
/// participants (negative values are transfers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Marginal retention rate, typically in (0, 1]
    #[serde(default = "default_rho")]
    pub rho: f64,
    /// Lump-sum tax (or transfer when negative)
    #[serde(default)]
    pub r: f64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            rho: default_rho(),
            r: 0.0,
        }
    }
}

impl TaxConfig {
    /// No taxes at all
    pub const NONE: TaxConfig = TaxConfig { rho: 1.0, r: 0.0 };

    #[must_use]
    pub fn new(rho: f64, r: f64) -> Self {
        Self { rho, r }
    }

    #[must_use]
    pub fn after_tax_wage(&self, wage: f64) -> f64 {
        self.rho * wage
    }

    /// Non-labor income available to a participant: `R = mu - beta0 - r`
    #[must_use]
    pub fn adjusted_income(&self, mu: f64, fixed_cost: f64) -> f64 {
        mu - fixed_cost - self.r
    }

    pub fn validate(&self, regime: &str) -> Result<(), ConfigError> {
        if !self.rho.is_finite() {
            return Err(ConfigError::NonFiniteParameter("rho"));
        }
        if !self.r.is_finite() {
            return Err(ConfigError::NonFiniteParameter("r"));
        }
        if self.rho <= 0.0 {
            return Err(ConfigError::NonPositiveRho {
                regime: regime.to_string(),
                rho: self.rho,
            });
        }
        Ok(())
    }
}
