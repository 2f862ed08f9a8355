use super::config::{CreditMixMode, CreditMixSettings, ScenarioConfig};
use super::domain::Level;
use serde::Serialize;

/// Credit loads and cohort share resolved for one program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditMix {
    pub min_credits: f64,
    pub min_share: f64,
    pub normal_credits: f64,
}

impl CreditMix {
    pub fn resolve(settings: CreditMixSettings, average_credits: f64) -> Self {
        let normal_credits = if settings.normal_override > 0.0 {
            settings.normal_override
        } else {
            average_credits
        };

        Self {
            min_credits: settings.min_credits,
            min_share: settings.min_share,
            normal_credits,
        }
    }

    pub fn for_level(config: &ScenarioConfig, level: Level, average_credits: f64) -> Self {
        Self::resolve(config.mix_settings(level), average_credits)
    }

    /// Share-weighted credit count billed per student.
    pub fn effective_credits(&self) -> f64 {
        self.min_share * self.min_credits + (1.0 - self.min_share) * self.normal_credits
    }

    pub fn split(&self, enrollment: f64) -> CohortSplit {
        let n_min = enrollment * self.min_share;
        CohortSplit {
            n_min,
            n_normal: enrollment - n_min,
        }
    }

    /// Prices the enrolment at `credit_value` per credit.
    ///
    /// Both modes produce the same revenue while the per-credit value is the
    /// same for the two cohorts; the split mode keeps the cohort amounts
    /// visible instead of folding them into one average.
    pub fn bill(&self, mode: CreditMixMode, enrollment: f64, credit_value: f64) -> Billing {
        let cohorts = self.split(enrollment);
        let tuition_min = credit_value * self.min_credits;
        let tuition_normal = credit_value * self.normal_credits;
        let tuition = credit_value * self.effective_credits();

        let revenue = match mode {
            CreditMixMode::SplitCohort => {
                cohorts.n_min * tuition_min + cohorts.n_normal * tuition_normal
            }
            CreditMixMode::Blended => enrollment * tuition,
        };

        Billing {
            cohorts,
            tuition_min,
            tuition_normal,
            tuition,
            revenue,
        }
    }
}

/// Enrolment divided between the minimum-credit and normal-credit loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CohortSplit {
    pub n_min: f64,
    pub n_normal: f64,
}

impl CohortSplit {
    pub fn total(&self) -> f64 {
        self.n_min + self.n_normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Billing {
    pub cohorts: CohortSplit,
    pub tuition_min: f64,
    pub tuition_normal: f64,
    /// Average tuition per student under the blended credit count.
    pub tuition: f64,
    pub revenue: f64,
}
