use std::fs;
use tuition_scenarios::workflows::intake::{ColumnMapping, MappedField, ProgramTable};
use tuition_scenarios::workflows::scenario::{
    export, CreditMixMode, Level, Modality, ScenarioConfig, ScenarioError, TuitionScenarioEngine,
};

const PROGRAMS: &[u8] = include_bytes!("fixtures/programs.csv");

fn fixture() -> ProgramTable {
    ProgramTable::from_bytes(PROGRAMS).expect("fixture parses")
}

fn default_engine() -> TuitionScenarioEngine {
    TuitionScenarioEngine::new(ScenarioConfig::default()).expect("defaults are valid")
}

#[test]
fn fixture_headers_resolve_to_suggested_mapping() {
    let table = fixture();
    assert_eq!(table.delimiter(), b';');
    assert_eq!(table.len(), 6);

    let mapping = table.suggest_mapping();
    assert_eq!(mapping.enrollment.as_deref(), Some("N° Est"));
    assert_eq!(mapping.w_est.as_deref(), Some("Est"));
    assert_eq!(mapping.current_tuition.as_deref(), Some("Costo/Actual"));
    assert_eq!(mapping.level.as_deref(), Some("Nivel de formación"));
    assert!(mapping.base_credit_value.is_none());

    mapping
        .validate(table.headers(), false)
        .expect("suggested mapping is complete");
}

#[test]
fn fixture_run_classifies_and_prices_every_program() {
    let table = fixture();
    let outcome = default_engine()
        .run(&table, &table.suggest_mapping())
        .expect("scenario runs");

    let results = outcome.results();
    assert_eq!(results.len(), 6);

    assert_eq!(results[0].level, Level::Doctorate);
    assert!(results[0].revenue_delta.abs() < 1e-3);

    assert_eq!(results[1].modality, Modality::Virtual);
    assert_eq!(results[2].modality, Modality::Hybrid);
    assert_eq!(results[3].modality, Modality::MedicalSurgical);
    assert_eq!(results[3].level, Level::Master);

    assert_eq!(results[4].level, Level::Master);
    assert!(outcome
        .diagnostics()
        .unrecognized_levels
        .contains("Diplomado"));

    // Blank tuition: no baseline revenue and a zero delta ratio.
    assert_eq!(results[5].current_revenue, 0.0);
    assert_eq!(results[5].revenue_delta_ratio, 0.0);
    assert!(outcome.diagnostics().unparsed_cells.is_empty());

    let totals = outcome.totals();
    let current: f64 = results.iter().map(|result| result.current_revenue).sum();
    assert!((totals.current_revenue - current).abs() < 1e-3);
    assert_eq!(totals.programs, 6);
    assert_eq!(outcome.mode(), CreditMixMode::SplitCohort);
}

#[test]
fn comma_delimited_input_is_detected() {
    let csv = "\u{feff}Programa,Nivel,Modalidad,Est,Planta,Comp,Tipo,PromdeCreditos,MATR.ACTUAL,N-EST\n\
               Doctorado X,DOCTORADO,PRESENCIAL,1,1,1,1,8,900000,10\n";
    let table = ProgramTable::from_bytes(csv.as_bytes()).expect("comma table parses");
    assert_eq!(table.delimiter(), b',');
    assert_eq!(table.headers()[0], "Programa");

    let mut config = ScenarioConfig::default();
    config.credit_mix.doctorate.min_share = 0.0;
    let outcome = TuitionScenarioEngine::new(config)
        .expect("valid config")
        .run(&table, &table.suggest_mapping())
        .expect("scenario runs");

    let totals = outcome.totals();
    assert!((totals.new_revenue - 72_000_000.0).abs() < 1e-3);
    assert!((totals.delta_ratio - 7.0).abs() < 1e-9);
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = ProgramTable::from_path("/nonexistent/programas.csv").expect_err("no such file");
    match err {
        ScenarioError::InputNotFound { path } => {
            assert!(path.ends_with("programas.csv"));
        }
        other => panic!("expected InputNotFound, got {other:?}"),
    }
}

#[test]
fn unmapped_required_columns_are_listed() {
    let table = fixture();
    let mut mapping = ColumnMapping::default();
    mapping.set(MappedField::Program, "Programa");

    let err = default_engine()
        .run(&table, &mapping)
        .expect_err("mapping incomplete");
    match err {
        ScenarioError::MappingIncomplete { missing } => {
            assert!(missing.contains(&"enrollment".to_string()));
            assert!(missing.contains(&"w_tipo".to_string()));
            assert!(!missing.contains(&"program".to_string()));
        }
        other => panic!("expected MappingIncomplete, got {other:?}"),
    }
}

#[test]
fn exported_file_reloads_with_computed_columns() {
    let table = fixture();
    let outcome = default_engine()
        .run(&table, &table.suggest_mapping())
        .expect("scenario runs");

    let path = std::env::temp_dir().join(format!(
        "{}-{}",
        std::process::id(),
        export::EXPORT_FILE_NAME
    ));
    let file = fs::File::create(&path).expect("export file created");
    export::write_results(&table, &outcome, file).expect("export written");

    let raw = fs::read(&path).expect("export readable");
    assert!(raw.starts_with(b"\xEF\xBB\xBF"));

    let reloaded = ProgramTable::from_path(&path).expect("export reloads");
    assert_eq!(reloaded.delimiter(), b';');
    assert_eq!(reloaded.len(), table.len());
    assert_eq!(reloaded.headers()[..table.headers().len()], *table.headers());
    assert_eq!(
        reloaded.headers().last().map(String::as_str),
        Some("Delta_recaudo_%")
    );
    assert_eq!(reloaded.cell(2, 0), "Especialización en Gerencia");

    fs::remove_file(path).ok();
}
