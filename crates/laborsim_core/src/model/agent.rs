use serde::{Deserialize, Serialize};

use super::ids::AgentId;

/// One simulated individual. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Exogenous covariate X
    pub x: f64,
    pub log_wage: f64,
    /// Non-labor income μ, strictly positive by construction
    pub mu: f64,
    /// Agent-specific disutility weight β_i, present only under heterogeneity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl Agent {
    /// Pre-tax wage level
    #[must_use]
    pub fn wage(&self) -> f64 {
        self.log_wage.exp()
    }
}
