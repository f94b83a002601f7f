use serde::{Deserialize, Serialize};

use super::tax::TaxConfig;
use crate::error::ConfigError;

fn default_label() -> String {
    "baseline".to_string()
}

fn default_return() -> f64 {
    0.5
}

/// One (wage-return, income-return, tax) configuration to simulate.
///
/// Every record produced under a regime carries its identifiers so that
/// several regimes can be stacked into one labelled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    #[serde(default = "default_label")]
    pub label: String,
    /// Loading of log-wage on the covariate X
    #[serde(default = "default_return")]
    pub wage_return: f64,
    /// Loading of log non-labor income on the covariate X
    #[serde(default = "default_return")]
    pub income_return: f64,
    #[serde(default)]
    pub tax: TaxConfig,
}

impl Default for Regime {
    fn default() -> Self {
        Self {
            label: default_label(),
            wage_return: default_return(),
            income_return: default_return(),
            tax: TaxConfig::default(),
        }
    }
}

impl Regime {
    #[must_use]
    pub fn new(label: impl Into<String>, wage_return: f64, income_return: f64) -> Self {
        Self {
            label: label.into(),
            wage_return,
            income_return,
            tax: TaxConfig::default(),
        }
    }

    #[must_use]
    pub fn with_tax(mut self, tax: TaxConfig) -> Self {
        self.tax = tax;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.wage_return.is_finite() {
            return Err(ConfigError::NonFiniteParameter("wage_return"));
        }
        if !self.income_return.is_finite() {
            return Err(ConfigError::NonFiniteParameter("income_return"));
        }
        self.tax.validate(&self.label)
    }
}
