use super::error::ScenarioError;
use super::report::ScenarioOutcome;
use crate::workflows::intake::ProgramTable;
use std::io::Write;

pub const EXPORT_FILE_NAME: &str = "escenario_resultados_puntoycoma.csv";
const UTF8_SIGNATURE: &[u8] = b"\xEF\xBB\xBF";

const COMPUTED_COLUMNS: [&str; 14] = [
    "nivel_categoria",
    "modalidad_categoria",
    "valor_credito_modelo",
    "valor_credito_programa",
    "creditos_prom_escenario",
    "n_min",
    "n_normal",
    "MATR.MINIMOS_CALC",
    "MATR.NORMALES_CALC",
    "MATR.NUEVA_CALC",
    "Recaudo_actual",
    "Recaudo_nuevo",
    "Delta_recaudo",
    "Delta_recaudo_%",
];

/// Writes the source columns followed by the computed columns, semicolon
/// delimited and prefixed with the UTF-8 signature.
pub fn write_results<W: Write>(
    table: &ProgramTable,
    outcome: &ScenarioOutcome,
    mut writer: W,
) -> Result<(), ScenarioError> {
    writer.write_all(UTF8_SIGNATURE)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    let mut header: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    header.extend(COMPUTED_COLUMNS);
    csv_writer.write_record(&header).map_err(export_error)?;

    for result in outcome.results() {
        let mut record: Vec<String> = table
            .rows()
            .get(result.row)
            .cloned()
            .unwrap_or_default();
        record.resize(table.headers().len(), String::new());
        record.extend([
            result.level.label().to_string(),
            result.modality.label().to_string(),
            result.model_credit_value.to_string(),
            result.program_credit_value.to_string(),
            result.effective_credits.to_string(),
            result.cohorts.n_min.to_string(),
            result.cohorts.n_normal.to_string(),
            result.tuition_min.to_string(),
            result.tuition_normal.to_string(),
            result.new_tuition.to_string(),
            result.current_revenue.to_string(),
            result.new_revenue.to_string(),
            result.revenue_delta.to_string(),
            result.revenue_delta_ratio.to_string(),
        ]);
        csv_writer.write_record(&record).map_err(export_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn to_bytes(table: &ProgramTable, outcome: &ScenarioOutcome) -> Result<Vec<u8>, ScenarioError> {
    let mut buffer = Vec::new();
    write_results(table, outcome, &mut buffer)?;
    Ok(buffer)
}

fn export_error(err: csv::Error) -> ScenarioError {
    ScenarioError::Export(err.to_string())
}
