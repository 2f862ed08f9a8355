use crate::workflows::scenario::ScenarioError;
use tracing::warn;

pub(crate) const PREFERRED_DELIMITER: u8 = b';';
const FALLBACK_DELIMITERS: [u8; 3] = [b',', b'\t', b'|'];
const UTF8_SIGNATURE: &[u8] = b"\xEF\xBB\xBF";

/// Raw records read with the delimiter that produced them.
#[derive(Debug)]
pub(crate) struct Layout {
    pub(crate) delimiter: u8,
    pub(crate) records: Vec<Vec<String>>,
}

/// Reads `data` with `;`, falling back to the first other delimiter that
/// yields a consistent multi-column table when the semicolon pass fails or
/// collapses everything into one column.
pub(crate) fn read_layout(data: &[u8]) -> Result<Layout, ScenarioError> {
    let data = data.strip_prefix(UTF8_SIGNATURE).unwrap_or(data);

    match parse_with(data, PREFERRED_DELIMITER) {
        Ok(records) if width(&records) > 1 => Ok(Layout {
            delimiter: PREFERRED_DELIMITER,
            records,
        }),
        Ok(records) => match detect(data) {
            Some(layout) => {
                warn!(
                    delimiter = %(layout.delimiter as char).escape_default(),
                    "semicolon parse produced a single column, using detected delimiter"
                );
                Ok(layout)
            }
            None => Ok(Layout {
                delimiter: PREFERRED_DELIMITER,
                records,
            }),
        },
        Err(err) => match detect(data) {
            Some(layout) => {
                warn!(
                    error = %err,
                    delimiter = %(layout.delimiter as char).escape_default(),
                    "semicolon parse failed, using detected delimiter"
                );
                Ok(layout)
            }
            None => Err(err),
        },
    }
}

fn detect(data: &[u8]) -> Option<Layout> {
    let mut best: Option<Layout> = None;

    for delimiter in FALLBACK_DELIMITERS {
        let Ok(records) = parse_with(data, delimiter) else {
            continue;
        };
        let columns = width(&records);
        let consistent = records.iter().all(|record| record.len() == columns);
        if columns < 2 || !consistent {
            continue;
        }
        if best.as_ref().map_or(true, |current| columns > width(&current.records)) {
            best = Some(Layout { delimiter, records });
        }
    }

    best
}

fn parse_with(data: &[u8], delimiter: u8) -> Result<Vec<Vec<String>>, ScenarioError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut records = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        records.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect::<Vec<_>>(),
        );
    }

    let columns = width(&records);
    if columns == 0 {
        return Err(ScenarioError::InputLayout {
            detail: "input table is empty".to_string(),
        });
    }

    if let Some((line, record)) = records
        .iter()
        .enumerate()
        .find(|(_, record)| record.len() > columns)
    {
        return Err(ScenarioError::InputLayout {
            detail: format!(
                "line {} has {} fields but the header has {}",
                line + 1,
                record.len(),
                columns
            ),
        });
    }

    Ok(records)
}

fn width(records: &[Vec<String>]) -> usize {
    records.first().map(Vec::len).unwrap_or(0)
}
