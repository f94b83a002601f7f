mod agent;
mod ids;
mod outcome;
mod preferences;
mod regime;
mod results;
mod tax;

pub use agent::Agent;
pub use ids::{AgentId, RegimeId};
pub use outcome::{AgentRecord, Outcome, Resolution};
pub use preferences::{Disutility, HeterogeneityParams, PreferenceConfig};
pub use regime::Regime;
pub use results::{CrossSection, CrossSectionSummary, Dataset, DatasetRow};
pub use tax::TaxConfig;
