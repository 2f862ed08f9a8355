use super::normalizer::{clean_header, fold_text};
use crate::workflows::scenario::ScenarioError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic input fields a table column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappedField {
    Program,
    Level,
    Modality,
    WEst,
    WPlanta,
    WComp,
    WTipo,
    AverageCredits,
    CurrentTuition,
    Enrollment,
    BaseCreditValue,
    CurrentRegistration,
}

impl MappedField {
    /// Enrolment leads so it is resolved before, and excluded from, the rest.
    pub const fn ordered() -> [Self; 12] {
        [
            Self::Enrollment,
            Self::Program,
            Self::Level,
            Self::Modality,
            Self::WEst,
            Self::WPlanta,
            Self::WComp,
            Self::WTipo,
            Self::AverageCredits,
            Self::CurrentTuition,
            Self::BaseCreditValue,
            Self::CurrentRegistration,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Level => "level",
            Self::Modality => "modality",
            Self::WEst => "w_est",
            Self::WPlanta => "w_planta",
            Self::WComp => "w_comp",
            Self::WTipo => "w_tipo",
            Self::AverageCredits => "average_credits",
            Self::CurrentTuition => "current_tuition",
            Self::Enrollment => "enrollment",
            Self::BaseCreditValue => "base_credit_value",
            Self::CurrentRegistration => "current_registration",
        }
    }

    pub const fn is_required(self) -> bool {
        !matches!(self, Self::BaseCreditValue | Self::CurrentRegistration)
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Program | Self::Level | Self::Modality)
    }

    const fn hints(self) -> &'static [&'static str] {
        match self {
            Self::Program => &["programa", "program"],
            Self::Level => &["nivel", "formacion", "level"],
            Self::Modality => &["modalidad", "modality"],
            Self::WEst => &["est"],
            Self::WPlanta => &["planta"],
            Self::WComp => &["comp"],
            Self::WTipo => &["tipo"],
            Self::AverageCredits => &["prom", "credito"],
            Self::CurrentTuition => &["matr", "actual", "costo/actual"],
            Self::Enrollment => &[
                "n° est",
                "n est",
                "n-est",
                "n_est",
                "estudiante",
                "numero",
                "enrollment",
                "enrolment",
            ],
            Self::BaseCreditValue => &["valor credito", "valor_credito", "valorcredito"],
            Self::CurrentRegistration => &["registr", "inscrit"],
        }
    }
}

impl fmt::Display for MappedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MappedField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| format!("unknown mapping field '{value}'"))
    }
}

/// User-chosen column names for each semantic field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub program: Option<String>,
    pub level: Option<String>,
    pub modality: Option<String>,
    pub w_est: Option<String>,
    pub w_planta: Option<String>,
    pub w_comp: Option<String>,
    pub w_tipo: Option<String>,
    pub average_credits: Option<String>,
    pub current_tuition: Option<String>,
    pub enrollment: Option<String>,
    pub base_credit_value: Option<String>,
    pub current_registration: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, field: MappedField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: MappedField, column: impl Into<String>) {
        *self.slot_mut(field) = Some(column.into());
    }

    fn slot(&self, field: MappedField) -> &Option<String> {
        match field {
            MappedField::Program => &self.program,
            MappedField::Level => &self.level,
            MappedField::Modality => &self.modality,
            MappedField::WEst => &self.w_est,
            MappedField::WPlanta => &self.w_planta,
            MappedField::WComp => &self.w_comp,
            MappedField::WTipo => &self.w_tipo,
            MappedField::AverageCredits => &self.average_credits,
            MappedField::CurrentTuition => &self.current_tuition,
            MappedField::Enrollment => &self.enrollment,
            MappedField::BaseCreditValue => &self.base_credit_value,
            MappedField::CurrentRegistration => &self.current_registration,
        }
    }

    fn slot_mut(&mut self, field: MappedField) -> &mut Option<String> {
        match field {
            MappedField::Program => &mut self.program,
            MappedField::Level => &mut self.level,
            MappedField::Modality => &mut self.modality,
            MappedField::WEst => &mut self.w_est,
            MappedField::WPlanta => &mut self.w_planta,
            MappedField::WComp => &mut self.w_comp,
            MappedField::WTipo => &mut self.w_tipo,
            MappedField::AverageCredits => &mut self.average_credits,
            MappedField::CurrentTuition => &mut self.current_tuition,
            MappedField::Enrollment => &mut self.enrollment,
            MappedField::BaseCreditValue => &mut self.base_credit_value,
            MappedField::CurrentRegistration => &mut self.current_registration,
        }
    }

    /// Proposes a column per field from keyword hints. The enrolment column
    /// is chosen first and never offered for any other field.
    pub fn suggest(headers: &[String]) -> Self {
        let folded: Vec<String> = headers.iter().map(|header| fold_text(header)).collect();
        let mut mapping = Self::default();
        let mut enrollment_index = None;

        for field in MappedField::ordered() {
            let hit = folded.iter().enumerate().find(|(index, header)| {
                Some(*index) != enrollment_index
                    && field.hints().iter().any(|hint| header.contains(hint))
            });

            if let Some((index, _)) = hit {
                if field == MappedField::Enrollment {
                    enrollment_index = Some(index);
                }
                mapping.set(field, clean_header(&headers[index]));
            }
        }

        mapping
    }

    /// Replaces fields with every value present in `overrides`.
    pub fn merge(mut self, overrides: ColumnMapping) -> Self {
        for field in MappedField::ordered() {
            if let Some(column) = overrides.get(field) {
                self.set(field, column);
            }
        }
        self
    }

    /// Resolves every mapped column against `headers`.
    ///
    /// All required fields (plus the base credit value column when
    /// `require_base_value` is set) must name distinct, existing columns.
    pub fn validate(
        &self,
        headers: &[String],
        require_base_value: bool,
    ) -> Result<ResolvedMapping, ScenarioError> {
        let mut indices: [Option<usize>; 12] = [None; 12];
        let mut missing = Vec::new();

        for (slot, field) in MappedField::ordered().into_iter().enumerate() {
            let required =
                field.is_required() || (require_base_value && field == MappedField::BaseCreditValue);

            match self.get(field).filter(|column| !column.trim().is_empty()) {
                Some(column) => match find_header(headers, column) {
                    Some(index) => indices[slot] = Some(index),
                    None => missing.push(format!("{field} (no column named '{column}')")),
                },
                None if required => missing.push(field.key().to_string()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(ScenarioError::MappingIncomplete { missing });
        }

        let exclusive: Vec<(MappedField, usize)> = MappedField::ordered()
            .into_iter()
            .zip(indices)
            .filter(|(field, _)| {
                field.is_required() || (require_base_value && *field == MappedField::BaseCreditValue)
            })
            .filter_map(|(field, index)| index.map(|index| (field, index)))
            .collect();

        for (position, (field, index)) in exclusive.iter().enumerate() {
            if let Some((other_field, _)) = exclusive[position + 1..]
                .iter()
                .find(|(_, other_index)| other_index == index)
            {
                return Err(ScenarioError::MappingConflict {
                    column: clean_header(&headers[*index]),
                    field: field.key(),
                    other_field: other_field.key(),
                });
            }
        }

        let required = |field: MappedField| -> usize {
            MappedField::ordered()
                .into_iter()
                .position(|candidate| candidate == field)
                .and_then(|slot| indices[slot])
                .unwrap_or_default()
        };
        let optional = |field: MappedField| -> Option<usize> {
            MappedField::ordered()
                .into_iter()
                .position(|candidate| candidate == field)
                .and_then(|slot| indices[slot])
        };

        Ok(ResolvedMapping {
            program: required(MappedField::Program),
            level: required(MappedField::Level),
            modality: required(MappedField::Modality),
            w_est: required(MappedField::WEst),
            w_planta: required(MappedField::WPlanta),
            w_comp: required(MappedField::WComp),
            w_tipo: required(MappedField::WTipo),
            average_credits: required(MappedField::AverageCredits),
            current_tuition: required(MappedField::CurrentTuition),
            enrollment: required(MappedField::Enrollment),
            base_credit_value: optional(MappedField::BaseCreditValue),
            current_registration: optional(MappedField::CurrentRegistration),
        })
    }
}

fn find_header(headers: &[String], column: &str) -> Option<usize> {
    let wanted = clean_header(column);
    headers
        .iter()
        .position(|header| clean_header(header) == wanted)
        .or_else(|| {
            let folded = fold_text(&wanted);
            headers
                .iter()
                .position(|header| fold_text(header) == folded)
        })
}

/// Column indices for a validated mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub program: usize,
    pub level: usize,
    pub modality: usize,
    pub w_est: usize,
    pub w_planta: usize,
    pub w_comp: usize,
    pub w_tipo: usize,
    pub average_credits: usize,
    pub current_tuition: usize,
    pub enrollment: usize,
    pub base_credit_value: Option<usize>,
    pub current_registration: Option<usize>,
}
