use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tuition_scenarios::error::AppError;
use tuition_scenarios::workflows::intake::{ColumnMapping, MappedField};
use tuition_scenarios::workflows::scenario::{CreditMixMode, ScenarioConfig, ScenarioError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    /// Parameters applied when a request does not carry its own.
    pub(crate) scenario: Arc<ScenarioConfig>,
}

pub(crate) fn parse_mode(raw: &str) -> Result<CreditMixMode, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "split_cohort" | "split" => Ok(CreditMixMode::SplitCohort),
        "blended" => Ok(CreditMixMode::Blended),
        other => Err(format!(
            "unknown credit mix mode '{other}' (expected split_cohort or blended)"
        )),
    }
}

/// Parses `field=Header` pairs given on the command line.
pub(crate) fn parse_column_override(raw: &str) -> Result<(MappedField, String), String> {
    let (field, column) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=COLUMN, got '{raw}'"))?;
    let field: MappedField = field.parse()?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("no column given for '{field}'"));
    }
    Ok((field, column.to_string()))
}

pub(crate) fn read_mapping_file(path: &Path) -> Result<ColumnMapping, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::Scenario(ScenarioError::InvalidConfig(format!(
            "mapping file {} is not valid: {err}",
            path.display()
        )))
    })
}
