//! Identifiers for simulated entities
//!
//! Agents and regimes get distinct newtypes so a row can never be tagged with
//! the wrong kind of index.

use serde::{Deserialize, Serialize};

/// Position of an agent within its cross-section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Position of a regime within the simulation's regime list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegimeId(pub u16);
