use super::config::ScenarioConfig;
use super::domain::{Level, Modality};
use super::numeric::parse_number;
use crate::workflows::intake::{MappedField, ProgramTable, ResolvedMapping};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub const WEIGHT_EST: f64 = 0.35;
pub const WEIGHT_PLANTA: f64 = 0.35;
pub const WEIGHT_COMP: f64 = 0.20;
pub const WEIGHT_TIPO: f64 = 0.10;

/// Program weighting factors, each nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Weights {
    pub est: f64,
    pub planta: f64,
    pub comp: f64,
    pub tipo: f64,
}

impl Weights {
    /// Fixed-coefficient blend applied to the model credit value.
    pub fn composite(&self) -> f64 {
        WEIGHT_EST * self.est
            + WEIGHT_PLANTA * self.planta
            + WEIGHT_COMP * self.comp
            + WEIGHT_TIPO * self.tipo
    }
}

/// One input row with numbers parsed and labels classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramRecord {
    pub row: usize,
    pub program: String,
    pub level_label: String,
    pub level: Level,
    pub modality_label: String,
    pub modality: Modality,
    pub weights: Weights,
    pub average_credits: f64,
    pub current_tuition: f64,
    pub enrollment: f64,
    pub base_credit_value: Option<f64>,
    pub current_registration: Option<f64>,
}

/// Recovered input problems observed during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunDiagnostics {
    /// Non-blank numeric cells that could not be read, by field key.
    pub unparsed_cells: BTreeMap<&'static str, usize>,
    pub unrecognized_levels: BTreeSet<String>,
    pub unrecognized_modalities: BTreeSet<String>,
    pub clamped_enrollments: usize,
}

impl RunDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.unparsed_cells.is_empty()
            && self.unrecognized_levels.is_empty()
            && self.unrecognized_modalities.is_empty()
            && self.clamped_enrollments == 0
    }

    pub fn unparsed_total(&self) -> usize {
        self.unparsed_cells.values().sum()
    }
}

pub(crate) struct RecordReader<'a> {
    table: &'a ProgramTable,
    mapping: ResolvedMapping,
    default_modality: Modality,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(
        table: &'a ProgramTable,
        mapping: ResolvedMapping,
        config: &ScenarioConfig,
    ) -> Self {
        Self {
            table,
            mapping,
            default_modality: config.default_modality,
        }
    }

    pub(crate) fn read(&self, row: usize, diagnostics: &mut RunDiagnostics) -> ProgramRecord {
        let mapping = &self.mapping;
        let level_label = self.table.cell(row, mapping.level).trim().to_string();
        let modality_label = self.table.cell(row, mapping.modality).trim().to_string();

        let level = match Level::recognize(&level_label) {
            Some(level) => level,
            None => {
                diagnostics.unrecognized_levels.insert(level_label.clone());
                Level::Master
            }
        };
        let modality = match Modality::recognize(&modality_label) {
            Some(modality) => modality,
            None => {
                diagnostics
                    .unrecognized_modalities
                    .insert(modality_label.clone());
                self.default_modality
            }
        };

        let mut number = |field: MappedField, column: usize| -> f64 {
            self.number(row, field, column, diagnostics).unwrap_or(0.0)
        };

        let weights = Weights {
            est: number(MappedField::WEst, mapping.w_est),
            planta: number(MappedField::WPlanta, mapping.w_planta),
            comp: number(MappedField::WComp, mapping.w_comp),
            tipo: number(MappedField::WTipo, mapping.w_tipo),
        };
        let average_credits = number(MappedField::AverageCredits, mapping.average_credits);
        let current_tuition = number(MappedField::CurrentTuition, mapping.current_tuition);
        let mut enrollment = number(MappedField::Enrollment, mapping.enrollment);
        let base_credit_value = mapping
            .base_credit_value
            .map(|column| number(MappedField::BaseCreditValue, column));

        if enrollment < 0.0 {
            warn!(row, enrollment, "negative enrollment treated as zero");
            diagnostics.clamped_enrollments += 1;
            enrollment = 0.0;
        }

        // Display-only: a blank or unreadable registration stays absent.
        let current_registration = mapping
            .current_registration
            .and_then(|column| self.number(row, MappedField::CurrentRegistration, column, diagnostics));

        ProgramRecord {
            row,
            program: self.table.cell(row, mapping.program).trim().to_string(),
            level_label,
            level,
            modality_label,
            modality,
            weights,
            average_credits,
            current_tuition,
            enrollment,
            base_credit_value,
            current_registration,
        }
    }

    fn number(
        &self,
        row: usize,
        field: MappedField,
        column: usize,
        diagnostics: &mut RunDiagnostics,
    ) -> Option<f64> {
        let raw = self.table.cell(row, column);
        let parsed = parse_number(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            *diagnostics.unparsed_cells.entry(field.key()).or_default() += 1;
        }
        parsed
    }
}
