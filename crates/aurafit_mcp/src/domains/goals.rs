//! Daily goals, progress fractions and goal-completion tracking.
//!
//! The calorie goal is a keyword heuristic on the goal text, not a nutrition
//! model: anything mentioning "gain" gets the higher target.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::records::DailyLog;
use super::totals::Totals;

pub const CALORIE_GOAL_DEFAULT: f64 = 2000.0;
pub const CALORIE_GOAL_GAIN: f64 = 2500.0;
/// Grams of protein per kilogram of base weight.
pub const PROTEIN_PER_KG: f64 = 1.6;
/// Glasses.
pub const WATER_GOAL: f64 = 8.0;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, JsonSchema)]
pub struct GoalTargets {
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub water_goal: f64,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Calories,
    Protein,
    Water,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Calories, Metric::Protein, Metric::Water];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Calories => "Calories",
            Metric::Protein => "Protein",
            Metric::Water => "Water",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Calories => "kcal",
            Metric::Protein => "g",
            Metric::Water => "glasses",
        }
    }
}

pub fn compute_goals(log: &DailyLog) -> GoalTargets {
    let calorie_goal = if log.goal.to_lowercase().contains("gain") {
        CALORIE_GOAL_GAIN
    } else {
        CALORIE_GOAL_DEFAULT
    };
    GoalTargets {
        calorie_goal,
        protein_goal: (log.base_weight * PROTEIN_PER_KG).round(),
        water_goal: WATER_GOAL,
    }
}

/// `current / goal` clamped to `[0, 1]`; zero when the goal is not positive.
pub fn compute_progress(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 || goal.is_nan() {
        return 0.0;
    }
    let fraction = current / goal;
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

/// Progress toward one metric's goal, as the dashboard shows it.
#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct GoalProgress {
    pub metric: Metric,
    pub label: String,
    pub unit: String,
    pub current: f64,
    pub goal: f64,
    /// Always within `[0, 1]`.
    pub fraction: f64,
    pub completed: bool,
}

pub fn evaluate(log: &DailyLog, totals: &Totals) -> Vec<GoalProgress> {
    let targets = compute_goals(log);
    Metric::ALL
        .into_iter()
        .map(|metric| {
            let (current, goal) = match metric {
                Metric::Calories => (totals.total_calories, targets.calorie_goal),
                Metric::Protein => (totals.total_protein, targets.protein_goal),
                Metric::Water => (f64::from(log.water_intake), targets.water_goal),
            };
            let fraction = compute_progress(current, goal);
            GoalProgress {
                metric,
                label: metric.label().to_string(),
                unit: metric.unit().to_string(),
                current,
                goal,
                fraction,
                completed: fraction >= 1.0,
            }
        })
        .collect()
}

/// Edge-triggered goal completion.
///
/// A metric fires once when its fraction reaches 1. It can only fire again
/// after the fraction has dropped below 1 in between.
#[derive(Clone, Debug, Default)]
pub struct CelebrationTracker {
    celebrated: HashMap<Metric, bool>,
}

impl CelebrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest fraction for `metric`; returns true when it just completed.
    pub fn observe(&mut self, metric: Metric, fraction: f64) -> bool {
        let flag = self.celebrated.entry(metric).or_insert(false);
        if fraction >= 1.0 {
            if *flag {
                return false;
            }
            *flag = true;
            true
        } else {
            *flag = false;
            false
        }
    }

    /// Feed a full evaluation and collect the metrics that just completed.
    pub fn observe_all(&mut self, progress: &[GoalProgress]) -> Vec<Metric> {
        progress
            .iter()
            .filter(|p| self.observe(p.metric, p.fraction))
            .map(|p| p.metric)
            .collect()
    }

    pub fn has_celebrated(&self, metric: Metric) -> bool {
        self.celebrated.get(&metric).copied().unwrap_or(false)
    }
}
