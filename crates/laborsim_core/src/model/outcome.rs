use serde::{Deserialize, Serialize};

use super::agent::Agent;
use crate::error::NumericalError;
use crate::solver::SolveReport;

/// Observed choice of one agent under one regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Interior candidate returned by the Newton solver (always > 0)
    pub h_interior: f64,
    /// Observed hours: `h_interior` if participating, otherwise 0
    pub h: f64,
    /// Observed consumption: `c1` if participating, otherwise μ
    pub c: f64,
    /// Utility of the interior candidate
    pub u1: f64,
    /// Utility of not working
    pub u0: f64,
    /// Participation flag, `u1 > u0`
    pub p1: bool,
}

/// Result of running the pipeline for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Resolution {
    Resolved { outcome: Outcome, report: SolveReport },
    /// Solve failed and the run was configured to flag rather than abort
    Unresolved { error: NumericalError },
}

/// An agent together with what happened to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent: Agent,
    pub resolution: Resolution,
}

impl AgentRecord {
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.resolution {
            Resolution::Resolved { outcome, .. } => Some(outcome),
            Resolution::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&SolveReport> {
        match &self.resolution {
            Resolution::Resolved { report, .. } => Some(report),
            Resolution::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn is_participant(&self) -> bool {
        self.outcome().is_some_and(|o| o.p1)
    }
}
