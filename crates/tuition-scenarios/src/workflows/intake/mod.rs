//! Loading program tables and resolving which column feeds which field.

mod delimiter;
mod mapping;
pub(crate) mod normalizer;

pub use mapping::{ColumnMapping, MappedField, ResolvedMapping};

use crate::workflows::scenario::ScenarioError;
use normalizer::clean_header;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// Text table as supplied by the user. Cells keep their raw text; numeric
/// interpretation happens in the scenario engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: u8,
}

impl ProgramTable {
    /// Builds a table, trimming headers and padding short rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self::with_delimiter(headers, rows, delimiter::PREFERRED_DELIMITER)
    }

    fn with_delimiter(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        let headers: Vec<String> = headers.iter().map(|header| clean_header(header)).collect();
        let columns = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(columns, String::new());
                row
            })
            .collect();

        Self {
            headers,
            rows,
            delimiter,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ScenarioError::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => ScenarioError::Io(err),
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ScenarioError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ScenarioError> {
        let layout = delimiter::read_layout(data)?;
        let mut records = layout.records.into_iter();
        let headers = records.next().unwrap_or_default();
        let table = Self::with_delimiter(headers, records.collect(), layout.delimiter);

        debug!(
            columns = table.headers.len(),
            rows = table.rows.len(),
            "program table loaded"
        );
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Delimiter the table was read with.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Proposes a mapping for this table's headers.
    pub fn suggest_mapping(&self) -> ColumnMapping {
        ColumnMapping::suggest(&self.headers)
    }
}
