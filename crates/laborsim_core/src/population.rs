//! Population generation
//!
//! Agents are built in two steps. First every agent draws a bundle of
//! independent standard-normal shocks (covariate, wage noise, income noise,
//! disutility noise). Then a regime's coefficients turn those shocks into
//! log-wage, non-labor income and, when requested, an agent-specific
//! disutility weight. Splitting the steps lets a panel reuse one set of
//! shocks across regimes.
//!
//! The disutility shock is always drawn, even for homogeneous populations,
//! so that switching heterogeneity on does not shift the other channels.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Agent, AgentId, HeterogeneityParams};

fn default_noise_scale() -> f64 {
    0.5
}

/// Noise scales shared by every regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationParams {
    /// Standard deviation of the log-wage noise
    #[serde(default = "default_noise_scale")]
    pub wage_noise_scale: f64,
    /// Standard deviation of the log non-labor income noise
    #[serde(default = "default_noise_scale")]
    pub income_noise_scale: f64,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            wage_noise_scale: default_noise_scale(),
            income_noise_scale: default_noise_scale(),
        }
    }
}

impl PopulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (channel, value) in [
            ("wage", self.wage_noise_scale),
            ("income", self.income_noise_scale),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNoiseScale { channel, value });
            }
        }
        Ok(())
    }
}

/// Loadings of one regime on the covariate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub wage_return: f64,
    pub income_return: f64,
}

/// Standard-normal draws for one agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentShocks {
    pub x: f64,
    pub wage: f64,
    pub income: f64,
    pub disutility: f64,
}

impl AgentShocks {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: StandardNormal.sample(rng),
            wage: StandardNormal.sample(rng),
            income: StandardNormal.sample(rng),
            disutility: StandardNormal.sample(rng),
        }
    }
}

pub fn draw_shocks<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<AgentShocks> {
    (0..n).map(|_| AgentShocks::draw(rng)).collect()
}

/// Turns shocks into agents for a given set of regime coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationGenerator {
    params: PopulationParams,
    heterogeneity: Option<HeterogeneityParams>,
}

impl PopulationGenerator {
    #[must_use]
    pub fn new(params: PopulationParams, heterogeneity: Option<HeterogeneityParams>) -> Self {
        Self {
            params,
            heterogeneity,
        }
    }

    #[must_use]
    pub fn agent(&self, id: AgentId, shocks: &AgentShocks, coefficients: Coefficients) -> Agent {
        let x = shocks.x;
        let log_wage = coefficients.wage_return * x + self.params.wage_noise_scale * shocks.wage;
        let mu = (coefficients.income_return * x + self.params.income_noise_scale * shocks.income)
            .exp();
        let beta = self
            .heterogeneity
            .map(|h| (h.covariate_loading * x + h.noise_scale * shocks.disutility).exp());

        Agent {
            id,
            x,
            log_wage,
            mu,
            beta,
        }
    }

    #[must_use]
    pub fn derive(&self, shocks: &[AgentShocks], coefficients: Coefficients) -> Vec<Agent> {
        shocks
            .iter()
            .enumerate()
            .map(|(i, s)| self.agent(AgentId(i as u32), s, coefficients))
            .collect()
    }

    /// Draw `n` fresh agents from a generator seeded with `seed`
    #[must_use]
    pub fn generate(&self, n: usize, seed: u64, coefficients: Coefficients) -> Vec<Agent> {
        let mut rng = StdRng::seed_from_u64(seed);
        let shocks = draw_shocks(&mut rng, n);
        self.derive(&shocks, coefficients)
    }
}

/// Income loading used when only the wage loading is specified
pub const DEFAULT_INCOME_RETURN: f64 = 0.5;

/// Homogeneous population with the given wage loading and noise scales
#[must_use]
pub fn generate(
    n: usize,
    seed: u64,
    wage_return: f64,
    wage_noise_scale: f64,
    income_noise_scale: f64,
) -> Vec<Agent> {
    let params = PopulationParams {
        wage_noise_scale,
        income_noise_scale,
    };
    let coefficients = Coefficients {
        wage_return,
        income_return: DEFAULT_INCOME_RETURN,
    };
    PopulationGenerator::new(params, None).generate(n, seed, coefficients)
}
