//! Subcommand implementations, kept out of `main` so they can be tested

use std::fmt::Write as _;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use laborsim_core::config::SamplingMode;
use laborsim_core::model::Dataset;
use laborsim_core::simulation::seed_plan;
use laborsim_core::{SimulationConfig, simulate};

use crate::output::{OutputFormat, write_dataset};

/// Simulate every regime and write the stacked dataset
pub fn run(
    config: &SimulationConfig,
    output: Option<&Path>,
    format: OutputFormat,
) -> color_eyre::Result<Dataset> {
    let dataset = simulate(config).wrap_err("simulation failed")?;

    for cs in &dataset.cross_sections {
        let summary = cs.summary();
        tracing::info!(
            "regime {:?}: {}/{} participate ({:.1}%), mean hours {:.3}, mean consumption {:.3}",
            cs.regime.label,
            summary.participants,
            summary.agents,
            100.0 * summary.participation_rate,
            summary.mean_hours,
            summary.mean_consumption
        );
    }
    if dataset.num_unresolved() > 0 {
        tracing::warn!(
            "{} agent(s) unresolved; their outcome columns are empty",
            dataset.num_unresolved()
        );
    }

    write_dataset(&dataset, output, format).wrap_err("failed to write dataset")?;
    Ok(dataset)
}

/// Validate `config` and describe what a run would do
pub fn check(config: &SimulationConfig) -> color_eyre::Result<String> {
    config.validate().wrap_err("invalid configuration")?;

    let seeds = seed_plan(config.seed, config.regimes.len());
    let mut plan = String::new();
    let _ = writeln!(
        plan,
        "{} regime(s) x {} agents, seed {}, {:?} sampling, {:?} on failure",
        config.regimes.len(),
        config.population_size,
        config.seed,
        config.sampling,
        config.failure_policy
    );
    let _ = writeln!(
        plan,
        "preferences: eta={} gamma={} fixed_cost={} heterogeneous={}",
        config.preferences.eta,
        config.preferences.gamma,
        config.preferences.fixed_cost,
        config.is_heterogeneous()
    );
    if config.sampling == SamplingMode::Panel {
        let _ = writeln!(plan, "panel seed: {}", seeds.panel);
    }

    for (index, (regime, seed)) in config.regimes.iter().zip(&seeds.regimes).enumerate() {
        let _ = write!(
            plan,
            "[{index}] {}: wage_return={} income_return={} rho={} r={}",
            regime.label, regime.wage_return, regime.income_return, regime.tax.rho, regime.tax.r
        );
        match config.sampling {
            SamplingMode::Independent => {
                let _ = writeln!(plan, " seed={seed}");
            }
            SamplingMode::Panel => plan.push('\n'),
        }
    }

    Ok(plan)
}
