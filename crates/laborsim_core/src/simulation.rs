//! Cross-section simulation
//!
//! For every regime: generate (or derive) the population, solve each agent's
//! interior hours, resolve participation, and tag the records with the regime.
//! Per-agent work is a pure function of the agent and the shared immutable
//! configuration, so agents are sharded across threads when the `parallel`
//! feature is on. Results are collected in agent order, which keeps the output
//! identical regardless of scheduling.
//!
//! All seeds are derived from the master seed before any parallel work starts:
//! the first draw seeds the panel population, the following ones seed each
//! regime in order.

use rand::{RngCore, SeedableRng, rngs::StdRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::config::{FailurePolicy, PipelineStages, SamplingMode, SimulationConfig};
use crate::error::{Result, SimulationError, SolveError};
use crate::metrics::RegimeDiagnostics;
use crate::model::{
    Agent, AgentRecord, CrossSection, Dataset, Outcome, PreferenceConfig, Regime, RegimeId,
    Resolution,
};
use crate::participation;
use crate::population::{Coefficients, PopulationGenerator, draw_shocks};
use crate::solver::{HoursProblem, NewtonHoursSolver, SolveReport, initial_guess};

/// Seeds derived from a master seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    /// Seeds the shared population in panel mode
    pub panel: u64,
    /// One seed per regime, in regime order
    pub regimes: Vec<u64>,
}

#[must_use]
pub fn seed_plan(seed: u64, num_regimes: usize) -> SeedPlan {
    let mut rng = StdRng::seed_from_u64(seed);
    let panel = rng.next_u64();
    let regimes = (0..num_regimes).map(|_| rng.next_u64()).collect();
    SeedPlan { panel, regimes }
}

/// Run every regime in `config` and stack the cross-sections
pub fn simulate(config: &SimulationConfig) -> Result<Dataset> {
    config.validate()?;

    let n = config.population_size;
    tracing::info!(
        "simulating {} regime(s) with {} agents each (seed={}, sampling={:?})",
        config.regimes.len(),
        n,
        config.seed,
        config.sampling
    );

    let generator = PopulationGenerator::new(
        config.population,
        config.preferences.disutility.heterogeneity(),
    );
    let seeds = seed_plan(config.seed, config.regimes.len());
    let solver = NewtonHoursSolver::new(config.solver);

    let panel_shocks = match config.sampling {
        SamplingMode::Panel => Some(draw_shocks(&mut StdRng::seed_from_u64(seeds.panel), n)),
        SamplingMode::Independent => None,
    };

    let mut cross_sections = Vec::with_capacity(config.regimes.len());
    for (index, (regime, &regime_seed)) in config.regimes.iter().zip(&seeds.regimes).enumerate() {
        let regime_id = RegimeId(index as u16);
        let coefficients = Coefficients {
            wage_return: regime.wage_return,
            income_return: regime.income_return,
        };

        let agents = match &panel_shocks {
            Some(shocks) => generator.derive(shocks, coefficients),
            None => generator.generate(n, regime_seed, coefficients),
        };

        cross_sections.push(simulate_regime(config, &solver, regime_id, regime, agents)?);
    }

    tracing::info!(
        "simulation finished: {} rows, {} unresolved",
        cross_sections.iter().map(|cs| cs.records.len()).sum::<usize>(),
        cross_sections
            .iter()
            .map(|cs| cs.diagnostics.unresolved)
            .sum::<usize>()
    );

    Ok(Dataset {
        heterogeneous: config.is_heterogeneous(),
        cross_sections,
    })
}

/// Simulate `regimes` with default population, solver and pipeline settings
pub fn simulate_regimes(
    regimes: &[Regime],
    n_per_regime: usize,
    preferences: &PreferenceConfig,
    seed: u64,
) -> Result<Dataset> {
    let config = SimulationConfig {
        population_size: n_per_regime,
        seed,
        preferences: *preferences,
        regimes: regimes.to_vec(),
        ..Default::default()
    };
    simulate(&config)
}

/// Solve and resolve one already-generated population under `regime`
pub fn simulate_regime(
    config: &SimulationConfig,
    solver: &NewtonHoursSolver,
    regime_id: RegimeId,
    regime: &Regime,
    agents: Vec<Agent>,
) -> Result<CrossSection> {
    let results = map_agents(&agents, |agent| {
        solve_agent(agent, regime, &config.preferences, config.stages, solver)
    });

    let mut diagnostics = RegimeDiagnostics::new();
    let mut records = Vec::with_capacity(agents.len());

    for (agent, result) in agents.into_iter().zip(results) {
        let resolution = match result {
            Ok((outcome, report)) => {
                diagnostics.record_solve(&report, outcome.p1);
                Resolution::Resolved { outcome, report }
            }
            Err(SolveError::Config(e)) => return Err(SimulationError::Config(e)),
            Err(SolveError::Numerical(error)) => match config.failure_policy {
                FailurePolicy::Abort => {
                    return Err(SimulationError::Numerical {
                        regime: regime_id,
                        agent: agent.id,
                        source: error,
                    });
                }
                FailurePolicy::Flag => {
                    tracing::warn!(
                        "regime {:?}: agent {} unresolved: {error}",
                        regime.label,
                        agent.id.0
                    );
                    diagnostics.record_unresolved();
                    Resolution::Unresolved { error }
                }
            },
        };
        records.push(AgentRecord { agent, resolution });
    }

    log_diagnostics(regime, &diagnostics);

    Ok(CrossSection {
        regime_id,
        regime: regime.clone(),
        records,
        diagnostics,
    })
}

/// Interior solve followed by the enabled pipeline stages for one agent
pub fn solve_agent(
    agent: &Agent,
    regime: &Regime,
    preferences: &PreferenceConfig,
    stages: PipelineStages,
    solver: &NewtonHoursSolver,
) -> std::result::Result<(Outcome, SolveReport), SolveError> {
    let wage = regime.tax.after_tax_wage(agent.wage());
    let adjusted_income = regime
        .tax
        .adjusted_income(agent.mu, preferences.fixed_cost);
    let beta = preferences.beta_for(agent);

    let problem = HoursProblem::new(
        wage,
        adjusted_income,
        preferences.eta,
        preferences.gamma,
        beta,
    );
    let report = solver.solve(initial_guess(wage, adjusted_income), &problem)?;

    let outcome = if stages.participation {
        participation::resolve(report.hours, wage, agent.mu, &regime.tax, preferences, beta)
    } else {
        participation::interior_only(report.hours, wage, agent.mu, &regime.tax, preferences, beta)
    };

    Ok((outcome, report))
}

fn log_diagnostics(regime: &Regime, diagnostics: &RegimeDiagnostics) {
    tracing::debug!(
        "regime {:?}: {} agents, {} participants, {} projected, mean iterations {:.1}, max residual {:.3e}",
        regime.label,
        diagnostics.agents,
        diagnostics.participants,
        diagnostics.projected_agents,
        diagnostics.mean_iterations(),
        diagnostics.max_residual
    );

    if diagnostics.has_convergence_warning() {
        tracing::warn!(
            "regime {:?}: {} agent(s) unconverged (max residual {:.3e}); consider more iterations",
            regime.label,
            diagnostics.unconverged_agents,
            diagnostics.max_residual
        );
    }
    if diagnostics.has_projection_warning() {
        tracing::warn!(
            "regime {:?}: {:.1}% of agents needed a boundary projection",
            regime.label,
            100.0 * diagnostics.projection_share()
        );
    }
}

#[cfg(feature = "parallel")]
fn map_agents<T, F>(agents: &[Agent], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&Agent) -> T + Sync + Send,
{
    agents.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_agents<T, F>(agents: &[Agent], f: F) -> Vec<T>
where
    F: Fn(&Agent) -> T,
{
    agents.iter().map(f).collect()
}
