use super::common::*;
use crate::workflows::intake::MappedField;
use crate::workflows::scenario::{
    BaseValueSource, CreditMixMode, Level, Modality, ScenarioConfig, ScenarioError,
};

#[test]
fn reference_doctorate_scenario() {
    for mode in [CreditMixMode::SplitCohort, CreditMixMode::Blended] {
        let mut config = reference_config();
        config.credit_mix_mode = mode;
        let outcome = engine(config)
            .run(&table(&[doctorate_row()]), &mapping())
            .expect("scenario runs");

        let result = &outcome.results()[0];
        assert_eq!(result.level, Level::Doctorate);
        assert_eq!(result.modality, Modality::InPerson);
        assert_close(result.program_credit_value, 900_000.0);
        assert_close(result.effective_credits, 8.0);
        assert_close(result.new_tuition, 7_200_000.0);
        assert_close(result.current_revenue, 9_000_000.0);
        assert_close(result.new_revenue, 72_000_000.0);
        assert_close(result.revenue_delta, 63_000_000.0);
        assert_close(result.revenue_delta_ratio, 7.0);
    }
}

#[test]
fn row_base_value_replaces_level_table() {
    let mut config = reference_config();
    config.base_value_source = BaseValueSource::RowColumn;
    config.base_values.doctorate = 1.0;

    let mut row = doctorate_row();
    row.base_credit_value = "1.000.000";
    let outcome = engine(config)
        .run(&table(&[row]), &mapping())
        .expect("scenario runs");

    assert_close(outcome.results()[0].model_credit_value, 1_000_000.0);
}

#[test]
fn row_base_value_requires_mapped_column() {
    let mut config = reference_config();
    config.base_value_source = BaseValueSource::RowColumn;
    let mut mapping = mapping();
    mapping.base_credit_value = None;

    let err = engine(config)
        .run(&table(&[doctorate_row()]), &mapping)
        .expect_err("base column missing");
    assert!(matches!(err, ScenarioError::MappingIncomplete { .. }));
}

#[test]
fn modality_multiplier_scales_model_value() {
    let mut row = doctorate_row();
    row.modality = "VIRTUAL";
    let outcome = engine(ScenarioConfig::default())
        .run(&table(&[row]), &mapping())
        .expect("scenario runs");

    assert_close(outcome.results()[0].model_credit_value, 900_000.0 * 0.70);
}

#[test]
fn unparseable_cells_become_zero_and_are_counted() {
    let mut row = doctorate_row();
    row.weights = ["n/a", "1", "", "1"];
    row.current_tuition = "por definir";
    let outcome = engine(reference_config())
        .run(&table(&[row]), &mapping())
        .expect("bad cells never abort the run");

    let result = &outcome.results()[0];
    assert_close(result.program_credit_value, 900_000.0 * (0.35 + 0.10));
    assert_eq!(result.current_revenue, 0.0);
    assert_eq!(result.revenue_delta_ratio, 0.0);

    let diagnostics = outcome.diagnostics();
    assert_eq!(diagnostics.unparsed_cells.get("w_est"), Some(&1));
    assert_eq!(diagnostics.unparsed_cells.get("current_tuition"), Some(&1));
    assert_eq!(diagnostics.unparsed_cells.get("w_comp"), None);
}

#[test]
fn unknown_level_uses_master_policy() {
    let mut row = doctorate_row();
    row.level = "POSTGRADO GENERICO";
    let config = ScenarioConfig::default();
    let master = config.credit_mix.master;
    let outcome = engine(config)
        .run(&table(&[row]), &mapping())
        .expect("scenario runs");

    let result = &outcome.results()[0];
    assert_eq!(result.level, Level::Master);
    assert_close(result.model_credit_value, 630_000.0);
    assert_close(result.cohorts.n_min, 10.0 * master.min_share);
    assert!(outcome
        .diagnostics()
        .unrecognized_levels
        .contains("POSTGRADO GENERICO"));
}

#[test]
fn unknown_modality_uses_configured_default() {
    let mut row = doctorate_row();
    row.modality = "DUAL";
    let mut config = reference_config();
    config.default_modality = Modality::Hybrid;
    let outcome = engine(config)
        .run(&table(&[row]), &mapping())
        .expect("scenario runs");

    assert_eq!(outcome.results()[0].modality, Modality::Hybrid);
    assert_close(outcome.results()[0].model_credit_value, 900_000.0 * 0.85);
}

#[test]
fn source_table_is_left_untouched() {
    let source = table(&[doctorate_row()]);
    let snapshot = source.clone();

    engine(ScenarioConfig::default())
        .run(&source, &mapping())
        .expect("scenario runs");

    assert_eq!(source, snapshot);
}

#[test]
fn enrollment_reused_as_weight_is_fatal() {
    let mut mapping = mapping();
    mapping.set(MappedField::WEst, "N-EST");

    let err = engine(ScenarioConfig::default())
        .run(&table(&[doctorate_row()]), &mapping)
        .expect_err("conflicting mapping");

    match err {
        ScenarioError::MappingConflict { column, .. } => assert_eq!(column, "N-EST"),
        other => panic!("expected mapping conflict, got {other:?}"),
    }
}

#[test]
fn negative_enrollment_is_clamped() {
    let mut row = doctorate_row();
    row.enrollment = "-4";
    let outcome = engine(reference_config())
        .run(&table(&[row]), &mapping())
        .expect("scenario runs");

    assert_eq!(outcome.results()[0].enrollment, 0.0);
    assert_eq!(outcome.diagnostics().clamped_enrollments, 1);
}

#[test]
fn clamped_enrollment_passes_the_audit() {
    let mut row = doctorate_row();
    row.enrollment = "-4";
    let source = table(&[row]);
    let engine = engine(reference_config());
    let outcome = engine.run(&source, &mapping()).expect("scenario runs");

    let audit = engine
        .audit(&source, &mapping(), &outcome, 1)
        .expect("audit runs");

    assert_eq!(audit[0].enrollment_cell, "-4");
    assert_eq!(audit[0].calc_current_revenue, 0.0);
    assert_eq!(audit[0].calc_new_revenue, 0.0);
    assert!(audit[0].consistent);
}

#[test]
fn cohorts_partition_enrollment_for_any_share() {
    for share in [0.0, 0.1, 0.3, 0.55, 0.9, 1.0] {
        let mut config = ScenarioConfig::default();
        config.credit_mix.doctorate.min_share = share;
        let mut row = doctorate_row();
        row.enrollment = "37";
        let outcome = engine(config)
            .run(&table(&[row]), &mapping())
            .expect("scenario runs");

        let result = &outcome.results()[0];
        assert_close(result.cohorts.total(), 37.0);
        assert_close(result.cohorts.n_min, 37.0 * share);
    }
}

#[test]
fn split_and_blended_revenue_agree() {
    let mut rows = Vec::new();
    for (level, credits) in [("MAESTRIA", "12"), ("ESPECIALIZACION", "9,5"), ("DOCTORADO", "10")] {
        let mut row = doctorate_row();
        row.level = level;
        row.average_credits = credits;
        row.weights = ["0,8", "0.6", "1", "0,25"];
        row.enrollment = "23";
        rows.push(row);
    }
    let source = table(&rows);

    let split = engine(ScenarioConfig::default())
        .run(&source, &mapping())
        .expect("split runs");
    let mut blended_config = ScenarioConfig::default();
    blended_config.credit_mix_mode = CreditMixMode::Blended;
    let blended = engine(blended_config)
        .run(&source, &mapping())
        .expect("blended runs");

    for (a, b) in split.results().iter().zip(blended.results()) {
        assert_close(a.new_revenue, b.new_revenue);
        assert_close(a.new_tuition, b.new_tuition);
    }
}

#[test]
fn program_value_is_monotonic_in_each_weight() {
    let engine = engine(reference_config());
    let program_value = |weights: [&'static str; 4]| -> f64 {
        let mut row = doctorate_row();
        row.weights = weights;
        engine
            .run(&table(&[row]), &mapping())
            .expect("scenario runs")
            .results()[0]
            .program_credit_value
    };
    let base = program_value(["0.5", "0.5", "0.5", "0.5"]);

    let coefficients = [0.35, 0.35, 0.20, 0.10];
    for (index, coefficient) in coefficients.into_iter().enumerate() {
        let mut weights = ["0.5", "0.5", "0.5", "0.5"];
        weights[index] = "0.9";
        let bumped = program_value(weights);

        assert!(bumped >= base);
        assert_close(bumped - base, 900_000.0 * coefficient * 0.4);
    }
}

#[test]
fn audit_matches_outcome() {
    let source = table(&[doctorate_row(), doctorate_row()]);
    let engine = engine(ScenarioConfig::default());
    let outcome = engine.run(&source, &mapping()).expect("scenario runs");

    let audit = engine
        .audit(&source, &mapping(), &outcome, 5)
        .expect("audit runs");

    assert_eq!(audit.len(), 2);
    assert!(audit.iter().all(|row| row.consistent));
    assert_eq!(audit[0].enrollment_cell, "10");
    assert_close(audit[0].calc_current_revenue, 9_000_000.0);
}
