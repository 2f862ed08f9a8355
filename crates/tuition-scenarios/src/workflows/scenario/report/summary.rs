use super::super::domain::Level;
use super::super::engine::{delta_ratio, ScenarioResult};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioTotals {
    pub programs: usize,
    pub enrollment: f64,
    pub current_revenue: f64,
    pub new_revenue: f64,
    pub delta: f64,
    pub delta_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub level: Level,
    pub level_label: &'static str,
    pub programs: usize,
    pub rec_actual: f64,
    pub rec_nuevo: f64,
    pub delta: f64,
    pub delta_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub label: String,
    pub programs: usize,
    pub rec_actual: f64,
    pub rec_nuevo: f64,
    pub delta: f64,
    pub delta_ratio: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    programs: usize,
    enrollment: f64,
    current: f64,
    new: f64,
}

impl Accumulator {
    fn add(&mut self, result: &ScenarioResult) {
        self.programs += 1;
        self.enrollment += result.enrollment;
        self.current += result.current_revenue;
        self.new += result.new_revenue;
    }

    fn delta(&self) -> f64 {
        self.new - self.current
    }
}

pub(super) fn totals(results: &[ScenarioResult]) -> ScenarioTotals {
    let mut acc = Accumulator::default();
    results.iter().for_each(|result| acc.add(result));

    ScenarioTotals {
        programs: acc.programs,
        enrollment: acc.enrollment,
        current_revenue: acc.current,
        new_revenue: acc.new,
        delta: acc.delta(),
        delta_ratio: delta_ratio(acc.current, acc.delta()),
    }
}

pub(super) fn by_level(results: &[ScenarioResult]) -> Vec<LevelSummary> {
    let mut groups: HashMap<Level, Accumulator> = HashMap::new();
    for result in results {
        groups.entry(result.level).or_default().add(result);
    }

    Level::ordered()
        .into_iter()
        .filter_map(|level| {
            groups.get(&level).map(|acc| LevelSummary {
                level,
                level_label: level.label(),
                programs: acc.programs,
                rec_actual: acc.current,
                rec_nuevo: acc.new,
                delta: acc.delta(),
                delta_ratio: delta_ratio(acc.current, acc.delta()),
            })
        })
        .collect()
}

pub(super) fn by_label(results: &[ScenarioResult]) -> Vec<LabelSummary> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for result in results {
        groups
            .entry(result.level_label.as_str())
            .or_default()
            .add(result);
    }

    groups
        .into_iter()
        .map(|(label, acc)| LabelSummary {
            label: label.to_string(),
            programs: acc.programs,
            rec_actual: acc.current,
            rec_nuevo: acc.new,
            delta: acc.delta(),
            delta_ratio: delta_ratio(acc.current, acc.delta()),
        })
        .collect()
}
