//! The tuition scenario model: number parsing, label classification, the
//! credit-mix policy and the per-program revenue engine.

mod config;
mod domain;
mod engine;
mod error;
pub mod export;
pub mod numeric;
mod policy;
mod record;
pub mod report;

#[cfg(test)]
mod tests;

pub use config::{BaseValueSource, CreditMixMode, CreditMixSettings, ScenarioConfig};
pub use domain::{Level, Modality, PerLevel, PerModality};
pub use engine::{delta_ratio, AuditRow, ScenarioResult, TuitionScenarioEngine};
pub use error::ScenarioError;
pub use policy::{Billing, CohortSplit, CreditMix};
pub use record::{ProgramRecord, RunDiagnostics, Weights};
pub use report::{
    LabelSummary, LevelSummary, ScenarioOutcome, ScenarioTotals, DEFAULT_AUDIT_ROWS,
    DEFAULT_TOP_N,
};
