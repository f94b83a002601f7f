//! Solver diagnostics collected per regime
//!
//! Projections are not failures, but a regime where many agents needed one
//! suggests the starting-point heuristic is poorly matched to the parameter
//! range. Unconverged solves are counted from [`SolveReport::converged`].

use serde::{Deserialize, Serialize};

use crate::solver::SolveReport;

/// Share of agents with at least one projection above which a regime is flagged
pub const PROJECTION_SHARE_WARN_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegimeDiagnostics {
    pub agents: usize,
    pub unresolved: usize,
    pub participants: usize,
    /// Total feasibility projections across all agents
    pub feasibility_projections: u64,
    /// Total positivity projections across all agents
    pub positivity_projections: u64,
    /// Agents whose solve projected at least once
    pub projected_agents: usize,
    /// Agents whose solve ended outside the convergence tolerance
    pub unconverged_agents: usize,
    pub max_residual: f64,
    pub total_iterations: u64,
    residual_sum: f64,
}

impl RegimeDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_solve(&mut self, report: &SolveReport, participant: bool) {
        self.agents += 1;
        if participant {
            self.participants += 1;
        }
        self.feasibility_projections += u64::from(report.projections.feasibility);
        self.positivity_projections += u64::from(report.projections.positivity);
        if report.projections.total() > 0 {
            self.projected_agents += 1;
        }
        if !report.converged {
            self.unconverged_agents += 1;
        }
        self.max_residual = self.max_residual.max(report.residual);
        self.residual_sum += report.residual;
        self.total_iterations += report.iterations as u64;
    }

    pub fn record_unresolved(&mut self) {
        self.agents += 1;
        self.unresolved += 1;
    }

    #[must_use]
    pub fn resolved(&self) -> usize {
        self.agents - self.unresolved
    }

    #[must_use]
    pub fn mean_residual(&self) -> f64 {
        match self.resolved() {
            0 => 0.0,
            n => self.residual_sum / n as f64,
        }
    }

    #[must_use]
    pub fn mean_iterations(&self) -> f64 {
        match self.resolved() {
            0 => 0.0,
            n => self.total_iterations as f64 / n as f64,
        }
    }

    /// Fraction of agents that hit at least one projection
    #[must_use]
    pub fn projection_share(&self) -> f64 {
        if self.agents == 0 {
            0.0
        } else {
            self.projected_agents as f64 / self.agents as f64
        }
    }

    #[must_use]
    pub fn has_convergence_warning(&self) -> bool {
        self.unconverged_agents > 0
    }

    #[must_use]
    pub fn has_projection_warning(&self) -> bool {
        self.projection_share() > PROJECTION_SHARE_WARN_THRESHOLD
    }
}
