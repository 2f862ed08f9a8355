mod summary;
pub mod views;

pub use summary::{LabelSummary, LevelSummary, ScenarioTotals};

use super::config::CreditMixMode;
use super::engine::ScenarioResult;
use super::record::RunDiagnostics;
use views::{ProgramImpactView, ScenarioSummary};

/// Number of programs shown in each ranking by default.
pub const DEFAULT_TOP_N: usize = 20;

/// Number of leading rows re-derived by the formula spot check by default.
pub const DEFAULT_AUDIT_ROWS: usize = 5;

/// Everything one engine run produced.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    results: Vec<ScenarioResult>,
    diagnostics: RunDiagnostics,
    mode: CreditMixMode,
}

impl ScenarioOutcome {
    pub(crate) fn new(
        results: Vec<ScenarioResult>,
        diagnostics: RunDiagnostics,
        mode: CreditMixMode,
    ) -> Self {
        Self {
            results,
            diagnostics,
            mode,
        }
    }

    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    pub fn diagnostics(&self) -> &RunDiagnostics {
        &self.diagnostics
    }

    pub fn mode(&self) -> CreditMixMode {
        self.mode
    }

    pub fn totals(&self) -> ScenarioTotals {
        summary::totals(&self.results)
    }

    /// Revenue grouped by level category, in Doctorate, Master,
    /// Specialization order.
    pub fn level_summary(&self) -> Vec<LevelSummary> {
        summary::by_level(&self.results)
    }

    /// Revenue grouped by the level text exactly as it appears in the table.
    pub fn label_summary(&self) -> Vec<LabelSummary> {
        summary::by_label(&self.results)
    }

    /// All programs by revenue delta, largest gain first. Ties keep input order.
    pub fn ranked_by_delta(&self) -> Vec<&ScenarioResult> {
        let mut ranked: Vec<&ScenarioResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| b.revenue_delta.total_cmp(&a.revenue_delta));
        ranked
    }

    pub fn top_gainers(&self, limit: usize) -> Vec<ProgramImpactView> {
        self.ranked_by_delta()
            .into_iter()
            .take(limit)
            .map(ProgramImpactView::from_result)
            .collect()
    }

    /// Largest losses first.
    pub fn top_losers(&self, limit: usize) -> Vec<ProgramImpactView> {
        let mut ranked: Vec<&ScenarioResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| a.revenue_delta.total_cmp(&b.revenue_delta));
        ranked
            .into_iter()
            .take(limit)
            .map(ProgramImpactView::from_result)
            .collect()
    }

    pub fn summary(&self, limit: usize) -> ScenarioSummary {
        ScenarioSummary {
            mode: self.mode,
            totals: self.totals(),
            level_summary: self.level_summary(),
            top_gainers: self.top_gainers(limit),
            top_losers: self.top_losers(limit),
            diagnostics: self.diagnostics.clone(),
        }
    }
}
