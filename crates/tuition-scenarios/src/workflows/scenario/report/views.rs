use super::super::config::CreditMixMode;
use super::super::domain::Level;
use super::super::engine::ScenarioResult;
use super::super::record::RunDiagnostics;
use super::summary::{LevelSummary, ScenarioTotals};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramImpactView {
    pub program: String,
    pub level: Level,
    pub level_label: String,
    pub current_revenue: f64,
    pub new_revenue: f64,
    pub revenue_delta: f64,
    pub revenue_delta_ratio: f64,
}

impl ProgramImpactView {
    pub fn from_result(result: &ScenarioResult) -> Self {
        Self {
            program: result.program.clone(),
            level: result.level,
            level_label: result.level_label.clone(),
            current_revenue: result.current_revenue,
            new_revenue: result.new_revenue,
            revenue_delta: result.revenue_delta,
            revenue_delta_ratio: result.revenue_delta_ratio,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub mode: CreditMixMode,
    pub totals: ScenarioTotals,
    pub level_summary: Vec<LevelSummary>,
    pub top_gainers: Vec<ProgramImpactView>,
    pub top_losers: Vec<ProgramImpactView>,
    pub diagnostics: RunDiagnostics,
}
