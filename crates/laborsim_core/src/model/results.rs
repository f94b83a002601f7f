use serde::{Deserialize, Serialize};

use super::ids::RegimeId;
use super::outcome::AgentRecord;
use super::regime::Regime;
use crate::metrics::RegimeDiagnostics;

/// One simulated population under one regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub regime_id: RegimeId,
    pub regime: Regime,
    pub records: Vec<AgentRecord>,
    pub diagnostics: RegimeDiagnostics,
}

/// Headline statistics of a cross-section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSectionSummary {
    pub agents: usize,
    pub participants: usize,
    pub participation_rate: f64,
    /// Mean observed hours among participants
    pub mean_hours: f64,
    /// Mean observed consumption over all resolved agents
    pub mean_consumption: f64,
}

impl CrossSection {
    pub fn participants(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.iter().filter(|r| r.is_participant())
    }

    #[must_use]
    pub fn summary(&self) -> CrossSectionSummary {
        let agents = self.records.len();
        let participants = self.participants().count();

        let mean_hours = if participants == 0 {
            0.0
        } else {
            self.participants()
                .filter_map(|r| r.outcome())
                .map(|o| o.h)
                .sum::<f64>()
                / participants as f64
        };

        let (consumption_sum, resolved) = self
            .records
            .iter()
            .filter_map(|r| r.outcome())
            .fold((0.0, 0usize), |(sum, n), o| (sum + o.c, n + 1));

        CrossSectionSummary {
            agents,
            participants,
            participation_rate: if agents == 0 {
                0.0
            } else {
                participants as f64 / agents as f64
            },
            mean_hours,
            mean_consumption: if resolved == 0 {
                0.0
            } else {
                consumption_sum / resolved as f64
            },
        }
    }
}

/// Flattened (agent, regime) row handed to the estimation layer.
///
/// Outcome columns are `None` for agents whose solve was flagged unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub agent_id: u32,
    pub regime_id: u16,
    pub regime_label: String,
    pub wage_return: f64,
    pub rho: f64,
    pub r: f64,
    pub x: f64,
    pub log_wage: f64,
    pub mu: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_i: Option<f64>,
    pub h_interior: Option<f64>,
    pub h: Option<f64>,
    pub c: Option<f64>,
    pub u1: Option<f64>,
    pub u0: Option<f64>,
    pub p1: Option<bool>,
    pub iterations: Option<usize>,
    pub residual: Option<f64>,
    pub converged: Option<bool>,
}

/// All cross-sections of a run, in regime order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Whether agents carry their own disutility weight
    pub heterogeneous: bool,
    pub cross_sections: Vec<CrossSection>,
}

impl Dataset {
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.cross_sections.iter().map(|cs| cs.records.len()).sum()
    }

    #[must_use]
    pub fn num_unresolved(&self) -> usize {
        self.cross_sections
            .iter()
            .map(|cs| cs.diagnostics.unresolved)
            .sum()
    }

    /// Rows stacked regime by regime, agents in generation order
    pub fn rows(&self) -> impl Iterator<Item = DatasetRow> + '_ {
        self.cross_sections.iter().flat_map(|cs| {
            cs.records.iter().map(move |record| {
                let agent = &record.agent;
                let outcome = record.outcome();
                let report = record.report();
                DatasetRow {
                    agent_id: agent.id.0,
                    regime_id: cs.regime_id.0,
                    regime_label: cs.regime.label.clone(),
                    wage_return: cs.regime.wage_return,
                    rho: cs.regime.tax.rho,
                    r: cs.regime.tax.r,
                    x: agent.x,
                    log_wage: agent.log_wage,
                    mu: agent.mu,
                    beta_i: agent.beta,
                    h_interior: outcome.map(|o| o.h_interior),
                    h: outcome.map(|o| o.h),
                    c: outcome.map(|o| o.c),
                    u1: outcome.map(|o| o.u1),
                    u0: outcome.map(|o| o.u0),
                    p1: outcome.map(|o| o.p1),
                    iterations: report.map(|r| r.iterations),
                    residual: report.map(|r| r.residual),
                    converged: report.map(|r| r.converged),
                }
            })
        })
    }
}
