use super::domain::{Level, Modality, PerLevel, PerModality};
use super::error::ScenarioError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const MAX_BASE_VALUE: f64 = 10_000_000.0;
const MAX_MULTIPLIER: f64 = 5.0;
const MAX_CREDITS: f64 = 40.0;

/// How enrolment is billed across minimum-credit and normal-credit loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CreditMixMode {
    /// Enrolment split into two cohorts, each billed at its own credit count.
    #[default]
    SplitCohort,
    /// Every student billed at the share-weighted average credit count.
    Blended,
}

impl CreditMixMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SplitCohort => "split cohort",
            Self::Blended => "blended average",
        }
    }
}

/// Where the per-credit base value of a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaseValueSource {
    #[default]
    LevelTable,
    RowColumn,
}

/// Minimum-credit policy for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditMixSettings {
    /// Credit count billed to the minimum-load cohort.
    pub min_credits: f64,
    /// Share of enrolment on the minimum load, in [0, 1].
    pub min_share: f64,
    /// Normal credit count; 0 means use the program's own average.
    pub normal_override: f64,
}

/// Immutable parameter set for one scenario run.
///
/// Deserialising overlays the given values onto [`ScenarioConfig::default`]
/// at any depth, so `{"base_values": {"master": 700000}}` only changes the
/// Master base value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioConfig {
    pub base_values: PerLevel<f64>,
    pub modality_multipliers: PerModality<f64>,
    pub credit_mix: PerLevel<CreditMixSettings>,
    pub credit_mix_mode: CreditMixMode,
    pub base_value_source: BaseValueSource,
    pub default_modality: Modality,
}

/// Fully populated wire form, read after the overlay.
#[derive(Deserialize)]
struct ScenarioFields {
    base_values: PerLevel<f64>,
    modality_multipliers: PerModality<f64>,
    credit_mix: PerLevel<CreditMixSettings>,
    credit_mix_mode: CreditMixMode,
    base_value_source: BaseValueSource,
    default_modality: Modality,
}

impl From<ScenarioFields> for ScenarioConfig {
    fn from(fields: ScenarioFields) -> Self {
        Self {
            base_values: fields.base_values,
            modality_multipliers: fields.modality_multipliers,
            credit_mix: fields.credit_mix,
            credit_mix_mode: fields.credit_mix_mode,
            base_value_source: fields.base_value_source,
            default_modality: fields.default_modality,
        }
    }
}

impl<'de> Deserialize<'de> for ScenarioConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = Value::deserialize(deserializer)?;
        let mut merged = serde_json::to_value(ScenarioConfig::default()).map_err(D::Error::custom)?;
        overlay(&mut merged, overrides);

        ScenarioFields::deserialize(merged)
            .map(ScenarioConfig::from)
            .map_err(D::Error::custom)
    }
}

fn overlay(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            base_values: PerLevel {
                doctorate: 900_000.0,
                master: 630_000.0,
                specialization: 450_000.0,
            },
            modality_multipliers: PerModality {
                in_person: 1.0,
                hybrid: 0.85,
                virtual_: 0.70,
                medical_surgical: 1.0,
            },
            credit_mix: PerLevel {
                doctorate: CreditMixSettings {
                    min_credits: 8.0,
                    min_share: 0.0,
                    normal_override: 0.0,
                },
                master: CreditMixSettings {
                    min_credits: 7.0,
                    min_share: 0.30,
                    normal_override: 0.0,
                },
                specialization: CreditMixSettings {
                    min_credits: 8.0,
                    min_share: 0.40,
                    normal_override: 0.0,
                },
            },
            credit_mix_mode: CreditMixMode::default(),
            base_value_source: BaseValueSource::default(),
            default_modality: Modality::InPerson,
        }
    }
}

impl ScenarioConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn base_value(&self, level: Level) -> f64 {
        self.base_values.get(level)
    }

    pub fn modality_multiplier(&self, modality: Modality) -> f64 {
        self.modality_multipliers.get(modality)
    }

    pub fn mix_settings(&self, level: Level) -> CreditMixSettings {
        self.credit_mix.get(level)
    }

    /// Rejects parameters outside the ranges the model is calibrated for.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for level in Level::ordered() {
            check_range(
                &format!("base value for {}", level.label()),
                self.base_value(level),
                MAX_BASE_VALUE,
            )?;

            let mix = self.mix_settings(level);
            check_range(
                &format!("minimum credits for {}", level.label()),
                mix.min_credits,
                MAX_CREDITS,
            )?;
            check_range(
                &format!("minimum-credit share for {}", level.label()),
                mix.min_share,
                1.0,
            )?;
            check_range(
                &format!("normal credits for {}", level.label()),
                mix.normal_override,
                MAX_CREDITS,
            )?;
        }

        for modality in Modality::ordered() {
            check_range(
                &format!("multiplier for {}", modality.label()),
                self.modality_multiplier(modality),
                MAX_MULTIPLIER,
            )?;
        }

        Ok(())
    }
}

fn check_range(name: &str, value: f64, max: f64) -> Result<(), ScenarioError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ScenarioError::InvalidConfig(format!(
            "{name} must be between 0 and {max}, got {value}"
        )))
    }
}
