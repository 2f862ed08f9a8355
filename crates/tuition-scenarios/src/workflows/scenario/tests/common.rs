use crate::workflows::intake::{ColumnMapping, ProgramTable};
use crate::workflows::scenario::{ScenarioConfig, TuitionScenarioEngine};

pub(super) const HEADERS: [&str; 11] = [
    "Programa",
    "Nivel",
    "Modalidad",
    "Est",
    "Planta",
    "Comp",
    "Tipo",
    "PromdeCreditos",
    "MATR.ACTUAL",
    "N-EST",
    "Valor credito base",
];

pub(super) struct Row<'a> {
    pub(super) program: &'a str,
    pub(super) level: &'a str,
    pub(super) modality: &'a str,
    pub(super) weights: [&'a str; 4],
    pub(super) average_credits: &'a str,
    pub(super) current_tuition: &'a str,
    pub(super) enrollment: &'a str,
    pub(super) base_credit_value: &'a str,
}

pub(super) fn doctorate_row() -> Row<'static> {
    Row {
        program: "Doctorado en Ciencias",
        level: "DOCTORADO",
        modality: "PRESENCIAL",
        weights: ["1", "1", "1", "1"],
        average_credits: "8",
        current_tuition: "900.000",
        enrollment: "10",
        base_credit_value: "900.000",
    }
}

pub(super) fn table(rows: &[Row<'_>]) -> ProgramTable {
    let headers: Vec<String> = HEADERS.iter().map(|header| header.to_string()).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.program, row.level, row.modality];
            cells.extend(row.weights);
            cells.extend([
                row.average_credits,
                row.current_tuition,
                row.enrollment,
                row.base_credit_value,
            ]);
            cells.into_iter().map(str::to_string).collect()
        })
        .collect();
    ProgramTable::new(headers, rows)
}

pub(super) fn mapping() -> ColumnMapping {
    let headers: Vec<String> = HEADERS.iter().map(|header| header.to_string()).collect();
    let mut mapping = ColumnMapping::suggest(&headers);
    mapping.base_credit_value = Some("Valor credito base".to_string());
    mapping
}

/// Configuration matching the reference doctorate scenario: nobody on the
/// minimum load and no normal-credit override.
pub(super) fn reference_config() -> ScenarioConfig {
    let mut config = ScenarioConfig::default();
    config.credit_mix.doctorate.min_share = 0.0;
    config.credit_mix.doctorate.min_credits = 8.0;
    config.credit_mix.doctorate.normal_override = 0.0;
    config.modality_multipliers.in_person = 1.0;
    config
}

pub(super) fn engine(config: ScenarioConfig) -> TuitionScenarioEngine {
    TuitionScenarioEngine::new(config).expect("valid config")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
