use super::common::assert_close;
use crate::workflows::scenario::{
    CreditMix, CreditMixMode, CreditMixSettings, Level, ScenarioConfig,
};

fn settings(min_credits: f64, min_share: f64, normal_override: f64) -> CreditMixSettings {
    CreditMixSettings {
        min_credits,
        min_share,
        normal_override,
    }
}

#[test]
fn normal_credits_follow_program_average_without_override() {
    let mix = CreditMix::resolve(settings(7.0, 0.3, 0.0), 12.0);
    assert_eq!(mix.normal_credits, 12.0);
    assert_close(mix.effective_credits(), 0.3 * 7.0 + 0.7 * 12.0);
}

#[test]
fn positive_override_replaces_program_average() {
    let mix = CreditMix::resolve(settings(8.0, 0.4, 14.0), 9.0);
    assert_eq!(mix.normal_credits, 14.0);
}

#[test]
fn level_settings_come_from_configuration() {
    let config = ScenarioConfig::default();
    let mix = CreditMix::for_level(&config, Level::Specialization, 10.0);
    assert_eq!(mix.min_credits, 8.0);
    assert_eq!(mix.min_share, 0.40);
}

#[test]
fn split_mode_reports_cohort_tuitions() {
    let mix = CreditMix::resolve(settings(8.0, 0.25, 0.0), 12.0);
    let billing = mix.bill(CreditMixMode::SplitCohort, 40.0, 100.0);

    assert_close(billing.cohorts.n_min, 10.0);
    assert_close(billing.cohorts.n_normal, 30.0);
    assert_close(billing.tuition_min, 800.0);
    assert_close(billing.tuition_normal, 1_200.0);
    assert_close(billing.tuition, 1_100.0);
    assert_close(billing.revenue, 10.0 * 800.0 + 30.0 * 1_200.0);
}

#[test]
fn blended_mode_bills_average_tuition() {
    let mix = CreditMix::resolve(settings(8.0, 0.25, 0.0), 12.0);
    let blended = mix.bill(CreditMixMode::Blended, 40.0, 100.0);
    let split = mix.bill(CreditMixMode::SplitCohort, 40.0, 100.0);

    assert_close(blended.revenue, 40.0 * 1_100.0);
    assert_close(blended.revenue, split.revenue);
}

#[test]
fn zero_enrollment_bills_nothing() {
    let mix = CreditMix::resolve(settings(8.0, 0.5, 0.0), 10.0);
    let billing = mix.bill(CreditMixMode::SplitCohort, 0.0, 500_000.0);

    assert_eq!(billing.revenue, 0.0);
    assert_eq!(billing.cohorts.total(), 0.0);
    assert!(billing.tuition > 0.0);
}
