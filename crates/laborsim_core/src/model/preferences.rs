use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::error::ConfigError;

/// How the disutility weight on hours is assigned to agents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Disutility {
    /// Every agent shares the same weight β
    Homogeneous { beta: f64 },
    /// Each agent draws `β_i = exp(covariate_loading * X + noise_scale * ε)`
    Heterogeneous {
        #[serde(default = "default_covariate_loading")]
        covariate_loading: f64,
        #[serde(default = "default_heterogeneity_noise")]
        noise_scale: f64,
    },
}

impl Default for Disutility {
    fn default() -> Self {
        Disutility::Homogeneous { beta: 1.0 }
    }
}

fn default_covariate_loading() -> f64 {
    0.5
}

fn default_heterogeneity_noise() -> f64 {
    0.5
}

/// Parameters of the agent-specific disutility weight draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeterogeneityParams {
    pub covariate_loading: f64,
    pub noise_scale: f64,
}

impl Default for HeterogeneityParams {
    fn default() -> Self {
        Self {
            covariate_loading: default_covariate_loading(),
            noise_scale: default_heterogeneity_noise(),
        }
    }
}

impl Disutility {
    #[must_use]
    pub fn heterogeneous() -> Self {
        let params = HeterogeneityParams::default();
        Disutility::Heterogeneous {
            covariate_loading: params.covariate_loading,
            noise_scale: params.noise_scale,
        }
    }

    /// Draw parameters when heterogeneity is requested
    #[must_use]
    pub fn heterogeneity(&self) -> Option<HeterogeneityParams> {
        match *self {
            Disutility::Homogeneous { .. } => None,
            Disutility::Heterogeneous {
                covariate_loading,
                noise_scale,
            } => Some(HeterogeneityParams {
                covariate_loading,
                noise_scale,
            }),
        }
    }
}

fn default_eta() -> f64 {
    -1.5
}

fn default_gamma() -> f64 {
    0.8
}

fn default_fixed_cost() -> f64 {
    0.1
}

/// Separable power utility `u(c, h) = c^(1+η)/(1+η) − β·h^(1+γ)/(1+γ)`
/// with a fixed cost β0 paid only by participants.
///
/// Shared read-only by every agent of every regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceConfig {
    /// Curvature of consumption utility (η < 0)
    #[serde(default = "default_eta")]
    pub eta: f64,
    /// Curvature of hours disutility (γ > 0)
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default)]
    pub disutility: Disutility,
    /// Fixed cost of working β0 (≥ 0)
    #[serde(default = "default_fixed_cost")]
    pub fixed_cost: f64,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            eta: default_eta(),
            gamma: default_gamma(),
            disutility: Disutility::default(),
            fixed_cost: default_fixed_cost(),
        }
    }
}

impl PreferenceConfig {
    #[must_use]
    pub fn is_heterogeneous(&self) -> bool {
        self.disutility.heterogeneity().is_some()
    }

    /// The disutility weight that applies to `agent`.
    ///
    /// Heterogeneous agents carry their own β_i; everyone else gets the
    /// scalar broadcast. A heterogeneous configuration applied to an agent
    /// generated without β_i falls back to 1.0.
    #[must_use]
    pub fn beta_for(&self, agent: &Agent) -> f64 {
        match (self.disutility, agent.beta) {
            (Disutility::Homogeneous { beta }, _) => beta,
            (Disutility::Heterogeneous { .. }, Some(beta_i)) => beta_i,
            (Disutility::Heterogeneous { .. }, None) => 1.0,
        }
    }

    /// `c^(1+η)/(1+η)`, or `ln c` at η = −1
    #[must_use]
    pub fn consumption_utility(&self, consumption: f64) -> f64 {
        let exponent = 1.0 + self.eta;
        if exponent == 0.0 {
            consumption.ln()
        } else {
            consumption.powf(exponent) / exponent
        }
    }

    /// `β·h^(1+γ)/(1+γ)`
    #[must_use]
    pub fn hours_disutility(&self, hours: f64, beta: f64) -> f64 {
        let exponent = 1.0 + self.gamma;
        beta * hours.powf(exponent) / exponent
    }

    #[must_use]
    pub fn utility(&self, consumption: f64, hours: f64, beta: f64) -> f64 {
        self.consumption_utility(consumption) - self.hours_disutility(hours, beta)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.eta.is_finite() {
            return Err(ConfigError::NonFiniteParameter("eta"));
        }
        if !self.gamma.is_finite() {
            return Err(ConfigError::NonFiniteParameter("gamma"));
        }
        if !self.fixed_cost.is_finite() {
            return Err(ConfigError::NonFiniteParameter("fixed_cost"));
        }
        if self.eta >= 0.0 {
            return Err(ConfigError::NonNegativeEta(self.eta));
        }
        if self.gamma <= 0.0 {
            return Err(ConfigError::NonPositiveGamma(self.gamma));
        }
        if self.fixed_cost < 0.0 {
            return Err(ConfigError::NegativeFixedCost(self.fixed_cost));
        }

        match self.disutility {
            Disutility::Homogeneous { beta } => {
                if !beta.is_finite() {
                    return Err(ConfigError::NonFiniteParameter("beta"));
                }
                if beta <= 0.0 {
                    return Err(ConfigError::NonPositiveBeta(beta));
                }
            }
            Disutility::Heterogeneous {
                covariate_loading,
                noise_scale,
            } => {
                if !covariate_loading.is_finite() {
                    return Err(ConfigError::NonFiniteParameter("covariate_loading"));
                }
                if !noise_scale.is_finite() || noise_scale < 0.0 {
                    return Err(ConfigError::InvalidNoiseScale {
                        channel: "disutility",
                        value: noise_scale,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AgentId;

    fn agent(beta: Option<f64>) -> Agent {
        Agent {
            id: AgentId(0),
            x: 0.0,
            log_wage: 0.0,
            mu: 1.0,
            beta,
        }
    }

    #[test]
    fn test_validate_rejects_invalid_curvatures() {
        let prefs = PreferenceConfig {
            eta: 0.0,
            ..Default::default()
        };
        assert_eq!(prefs.validate(), Err(ConfigError::NonNegativeEta(0.0)));

        let prefs = PreferenceConfig {
            gamma: -1.0,
            ..Default::default()
        };
        assert_eq!(prefs.validate(), Err(ConfigError::NonPositiveGamma(-1.0)));

        let prefs = PreferenceConfig {
            disutility: Disutility::Homogeneous { beta: 0.0 },
            ..Default::default()
        };
        assert_eq!(prefs.validate(), Err(ConfigError::NonPositiveBeta(0.0)));

        let prefs = PreferenceConfig {
            fixed_cost: -0.1,
            ..Default::default()
        };
        assert!(prefs.validate().is_err());

        assert!(PreferenceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_beta_is_broadcast_or_per_agent() {
        let homogeneous = PreferenceConfig {
            disutility: Disutility::Homogeneous { beta: 2.5 },
            ..Default::default()
        };
        assert_eq!(homogeneous.beta_for(&agent(Some(7.0))), 2.5);

        let heterogeneous = PreferenceConfig {
            disutility: Disutility::heterogeneous(),
            ..Default::default()
        };
        assert_eq!(heterogeneous.beta_for(&agent(Some(7.0))), 7.0);
        assert!(heterogeneous.is_heterogeneous());
    }

    #[test]
    fn test_log_utility_at_unit_elasticity() {
        let prefs = PreferenceConfig {
            eta: -1.0,
            ..Default::default()
        };
        let c = 3.0_f64;
        assert!((prefs.consumption_utility(c) - c.ln()).abs() < 1e-12);

        let prefs = PreferenceConfig::default();
        // c^(-0.5) / (-0.5)
        assert!((prefs.consumption_utility(4.0) + 1.0).abs() < 1e-12);
    }
}
