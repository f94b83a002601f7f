//! Simulation Builder
//!
//! Fluent construction of a [`SimulationConfig`]. Regimes are appended in call
//! order, which is also the order of the resulting cross-sections. If no
//! regime is added the default baseline is used.

use super::{FailurePolicy, SamplingMode, SimulationConfig};
use crate::error::ConfigError;
use crate::model::{Disutility, HeterogeneityParams, Regime, TaxConfig};
use crate::solver::{SolverOptions, StoppingPolicy};

/// Builder for [`SimulationConfig`]
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    regimes: Vec<Regime>,
}

impl SimulationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn population_size(mut self, n: usize) -> Self {
        self.config.population_size = n;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[must_use]
    pub fn eta(mut self, eta: f64) -> Self {
        self.config.preferences.eta = eta;
        self
    }

    #[must_use]
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.config.preferences.gamma = gamma;
        self
    }

    /// Homogeneous disutility weight
    #[must_use]
    pub fn beta(mut self, beta: f64) -> Self {
        self.config.preferences.disutility = Disutility::Homogeneous { beta };
        self
    }

    /// Agent-specific disutility weights with the default loadings
    #[must_use]
    pub fn heterogeneous(self) -> Self {
        self.heterogeneous_with(HeterogeneityParams::default())
    }

    #[must_use]
    pub fn heterogeneous_with(mut self, params: HeterogeneityParams) -> Self {
        self.config.preferences.disutility = Disutility::Heterogeneous {
            covariate_loading: params.covariate_loading,
            noise_scale: params.noise_scale,
        };
        self
    }

    #[must_use]
    pub fn fixed_cost(mut self, fixed_cost: f64) -> Self {
        self.config.preferences.fixed_cost = fixed_cost;
        self
    }

    #[must_use]
    pub fn noise(mut self, wage_noise_scale: f64, income_noise_scale: f64) -> Self {
        self.config.population.wage_noise_scale = wage_noise_scale;
        self.config.population.income_noise_scale = income_noise_scale;
        self
    }

    /// Untaxed regime
    #[must_use]
    pub fn regime(self, label: impl Into<String>, wage_return: f64, income_return: f64) -> Self {
        self.add_regime(Regime::new(label, wage_return, income_return))
    }

    #[must_use]
    pub fn taxed_regime(
        self,
        label: impl Into<String>,
        wage_return: f64,
        income_return: f64,
        rho: f64,
        r: f64,
    ) -> Self {
        self.add_regime(
            Regime::new(label, wage_return, income_return).with_tax(TaxConfig::new(rho, r)),
        )
    }

    #[must_use]
    pub fn add_regime(mut self, regime: Regime) -> Self {
        self.regimes.push(regime);
        self
    }

    #[must_use]
    pub fn fixed_iterations(mut self, iterations: usize) -> Self {
        self.config.solver.policy = StoppingPolicy::FixedIterations { iterations };
        self
    }

    #[must_use]
    pub fn tolerance(mut self, tolerance: f64, max_iterations: usize) -> Self {
        self.config.solver = SolverOptions {
            epsilon: self.config.solver.epsilon,
            ..SolverOptions::tolerance(tolerance, max_iterations)
        };
        self
    }

    #[must_use]
    pub fn without_participation(mut self) -> Self {
        self.config.stages.participation = false;
        self
    }

    #[must_use]
    pub fn panel(mut self) -> Self {
        self.config.sampling = SamplingMode::Panel;
        self
    }

    #[must_use]
    pub fn flag_failures(mut self) -> Self {
        self.config.failure_policy = FailurePolicy::Flag;
        self
    }

    /// Finish and validate the configuration
    pub fn build(mut self) -> Result<SimulationConfig, ConfigError> {
        if !self.regimes.is_empty() {
            self.config.regimes = self.regimes;
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_everything() {
        let config = SimulationBuilder::new()
            .population_size(250)
            .seed(17)
            .eta(-2.0)
            .gamma(1.2)
            .beta(0.7)
            .fixed_cost(0.3)
            .regime("before", 0.4, 0.6)
            .taxed_regime("after", 0.4, 0.6, 0.75, 0.2)
            .tolerance(1e-10, 100)
            .panel()
            .flag_failures()
            .build()
            .unwrap();

        assert_eq!(config.population_size, 250);
        assert_eq!(config.seed, 17);
        assert_eq!(config.preferences.eta, -2.0);
        assert_eq!(config.preferences.gamma, 1.2);
        assert_eq!(
            config.preferences.disutility,
            Disutility::Homogeneous { beta: 0.7 }
        );
        assert_eq!(config.regimes.len(), 2);
        assert_eq!(config.regimes[1].tax, TaxConfig::new(0.75, 0.2));
        assert_eq!(config.sampling, SamplingMode::Panel);
        assert_eq!(config.failure_policy, FailurePolicy::Flag);
        assert_eq!(config.solver.policy.max_iterations(), 100);
    }

    #[test]
    fn test_builder_defaults_to_baseline_regime() {
        let config = SimulationBuilder::new().build().unwrap();
        assert_eq!(config.regimes, vec![Regime::default()]);
    }

    #[test]
    fn test_builder_validates() {
        assert_eq!(
            SimulationBuilder::new().eta(0.5).build(),
            Err(ConfigError::NonNegativeEta(0.5))
        );
        assert!(SimulationBuilder::new().fixed_iterations(0).build().is_err());
        assert!(SimulationBuilder::new().population_size(0).build().is_err());
    }

    #[test]
    fn test_heterogeneous_builder() {
        let config = SimulationBuilder::new().heterogeneous().build().unwrap();
        assert!(config.is_heterogeneous());
    }
}
