use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that stop a scenario run before any output is produced.
///
/// Unparseable numeric cells are not represented here; they are recovered
/// as zero and counted in the run diagnostics.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("input table not found at {}", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("failed to read input table: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse delimited input: {0}")]
    InputParse(#[from] csv::Error),
    #[error("could not parse delimited input: {detail}")]
    InputLayout { detail: String },
    #[error("column mapping incomplete, unresolved: {}", .missing.join(", "))]
    MappingIncomplete { missing: Vec<String> },
    #[error("column '{column}' cannot be used for both {field} and {other_field}")]
    MappingConflict {
        column: String,
        field: &'static str,
        other_field: &'static str,
    },
    #[error("invalid scenario configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to write scenario results: {0}")]
    Export(String),
}

impl ScenarioError {
    /// True when the caller supplied bad input rather than the host failing.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ScenarioError::Io(_) | ScenarioError::Export(_))
    }
}
