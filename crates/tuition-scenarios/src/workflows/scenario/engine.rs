use super::config::{BaseValueSource, ScenarioConfig};
use super::domain::{Level, Modality};
use super::error::ScenarioError;
use super::numeric::number_or_zero;
use super::policy::{CohortSplit, CreditMix};
use super::record::{ProgramRecord, RecordReader, RunDiagnostics};
use super::report::ScenarioOutcome;
use crate::workflows::intake::{ColumnMapping, ProgramTable};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Relative tolerance used when re-deriving revenue from raw cells.
const AUDIT_TOLERANCE: f64 = 1e-9;

/// Computed scenario for one program. Never mutated after the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub row: usize,
    pub program: String,
    pub level_label: String,
    pub level: Level,
    pub modality_label: String,
    pub modality: Modality,
    pub enrollment: f64,
    pub current_tuition: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_registration: Option<f64>,
    pub model_credit_value: f64,
    pub program_credit_value: f64,
    pub credit_mix: CreditMix,
    pub effective_credits: f64,
    pub cohorts: CohortSplit,
    pub tuition_min: f64,
    pub tuition_normal: f64,
    pub new_tuition: f64,
    pub current_revenue: f64,
    pub new_revenue: f64,
    pub revenue_delta: f64,
    pub revenue_delta_ratio: f64,
}

/// Spot check of the revenue formulas against the raw table cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRow {
    pub program: String,
    pub enrollment_cell: String,
    pub current_tuition_cell: String,
    pub new_tuition: f64,
    pub calc_current_revenue: f64,
    pub calc_new_revenue: f64,
    pub consistent: bool,
}

/// Delta over the baseline, defined as zero when the baseline is zero.
pub fn delta_ratio(current: f64, delta: f64) -> f64 {
    if current == 0.0 {
        0.0
    } else {
        delta / current
    }
}

/// Stateless calculator applying one configuration to program tables.
#[derive(Debug, Clone)]
pub struct TuitionScenarioEngine {
    config: ScenarioConfig,
}

impl TuitionScenarioEngine {
    pub fn new(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Validates the mapping and computes every row. The table is only
    /// borrowed; results reference rows by index.
    pub fn run(
        &self,
        table: &ProgramTable,
        mapping: &ColumnMapping,
    ) -> Result<ScenarioOutcome, ScenarioError> {
        let require_base_value = self.config.base_value_source == BaseValueSource::RowColumn;
        let resolved = mapping.validate(table.headers(), require_base_value)?;
        let reader = RecordReader::new(table, resolved, &self.config);

        let mut diagnostics = RunDiagnostics::default();
        let results: Vec<ScenarioResult> = (0..table.len())
            .map(|row| {
                let record = reader.read(row, &mut diagnostics);
                self.evaluate(&record)
            })
            .collect();

        if !diagnostics.unrecognized_levels.is_empty() {
            warn!(
                labels = ?diagnostics.unrecognized_levels,
                "unrecognized level labels priced as Master"
            );
        }
        if !diagnostics.unrecognized_modalities.is_empty() {
            warn!(
                labels = ?diagnostics.unrecognized_modalities,
                fallback = self.config.default_modality.label(),
                "unrecognized modality labels"
            );
        }
        if diagnostics.unparsed_total() > 0 {
            warn!(cells = ?diagnostics.unparsed_cells, "unparseable numeric cells treated as zero");
        }

        let outcome = ScenarioOutcome::new(results, diagnostics, self.config.credit_mix_mode);
        let totals = outcome.totals();
        info!(
            programs = totals.programs,
            mode = self.config.credit_mix_mode.label(),
            current_revenue = totals.current_revenue,
            new_revenue = totals.new_revenue,
            delta = totals.delta,
            "tuition scenario computed"
        );

        Ok(outcome)
    }

    pub fn evaluate(&self, record: &ProgramRecord) -> ScenarioResult {
        let base_value = match self.config.base_value_source {
            BaseValueSource::LevelTable => self.config.base_value(record.level),
            BaseValueSource::RowColumn => record.base_credit_value.unwrap_or(0.0),
        };
        let model_credit_value = base_value * self.config.modality_multiplier(record.modality);
        let program_credit_value = model_credit_value * record.weights.composite();

        let credit_mix = CreditMix::for_level(&self.config, record.level, record.average_credits);
        let billing = credit_mix.bill(
            self.config.credit_mix_mode,
            record.enrollment,
            program_credit_value,
        );

        let current_revenue = record.enrollment * record.current_tuition;
        let new_revenue = billing.revenue;
        let revenue_delta = new_revenue - current_revenue;

        debug!(
            row = record.row,
            program = %record.program,
            program_credit_value,
            new_revenue,
            "program evaluated"
        );

        ScenarioResult {
            row: record.row,
            program: record.program.clone(),
            level_label: record.level_label.clone(),
            level: record.level,
            modality_label: record.modality_label.clone(),
            modality: record.modality,
            enrollment: record.enrollment,
            current_tuition: record.current_tuition,
            current_registration: record.current_registration,
            model_credit_value,
            program_credit_value,
            credit_mix,
            effective_credits: credit_mix.effective_credits(),
            cohorts: billing.cohorts,
            tuition_min: billing.tuition_min,
            tuition_normal: billing.tuition_normal,
            new_tuition: billing.tuition,
            current_revenue,
            new_revenue,
            revenue_delta,
            revenue_delta_ratio: delta_ratio(current_revenue, revenue_delta),
        }
    }

    /// Re-derives enrolment × tuition for the first `limit` rows straight
    /// from the raw cells and flags rows that disagree with the outcome.
    pub fn audit(
        &self,
        table: &ProgramTable,
        mapping: &ColumnMapping,
        outcome: &ScenarioOutcome,
        limit: usize,
    ) -> Result<Vec<AuditRow>, ScenarioError> {
        let require_base_value = self.config.base_value_source == BaseValueSource::RowColumn;
        let resolved = mapping.validate(table.headers(), require_base_value)?;

        Ok(outcome
            .results()
            .iter()
            .take(limit)
            .map(|result| {
                let enrollment_cell = table.cell(result.row, resolved.enrollment).to_string();
                let current_tuition_cell =
                    table.cell(result.row, resolved.current_tuition).to_string();
                // Same non-negative clamp the record reader applies.
                let enrollment = number_or_zero(&enrollment_cell).max(0.0);
                let calc_current_revenue = enrollment * number_or_zero(&current_tuition_cell);
                let calc_new_revenue = enrollment * result.new_tuition;

                AuditRow {
                    program: result.program.clone(),
                    consistent: approx_eq(calc_current_revenue, result.current_revenue)
                        && approx_eq(calc_new_revenue, result.new_revenue),
                    enrollment_cell,
                    current_tuition_cell,
                    new_tuition: result.new_tuition,
                    calc_current_revenue,
                    calc_new_revenue,
                }
            })
            .collect())
    }
}

fn approx_eq(left: f64, right: f64) -> bool {
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= AUDIT_TOLERANCE * scale
}
