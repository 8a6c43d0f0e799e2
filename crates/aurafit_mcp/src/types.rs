use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::goals::{GoalProgress, GoalTargets, Metric};
use crate::domains::records::{MealRecord, WorkoutRecord};
use crate::domains::summary::SummarySections;
use crate::domains::totals::Totals;
use crate::state::{LoadingStates, Notification};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DescriptionParams {
    /// Free-text description, e.g. "2 eggs and a slice of toast" or "30 min easy run"
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct WaterParams {
    /// Glasses to add (negative to remove); the count never drops below zero
    pub delta: i64,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SleepParams {
    /// Hours to add (negative to remove), usually in steps of 0.5
    pub delta: f64,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct WeightParams {
    /// Current body weight in kilograms
    pub weight_kg: f64,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GoalParams {
    /// Goal in free text; mentioning "gain" raises the calorie goal
    pub goal: String,
}

/// A goal that was just completed by the latest change.
#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct Celebration {
    pub metric: Metric,
    pub message: String,
}

impl Celebration {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            message: format!("🎉 {} goal reached!", metric.label()),
        }
    }
}

/// State after a mutation, with the notification it produced.
#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct UpdateResult {
    pub notification: Notification,
    pub celebrations: Vec<Celebration>,
    pub water_intake: u32,
    pub sleep_hours: f64,
    pub current_weight: f64,
    pub goal: String,
    pub totals: Totals,
    pub net_calories: f64,
    pub progress: Vec<GoalProgress>,
}

#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct MealLoggedResult {
    pub meal: MealRecord,
    pub update: UpdateResult,
}

#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct WorkoutLoggedResult {
    pub workout: WorkoutRecord,
    pub update: UpdateResult,
}

#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct SummaryView {
    /// Markdown exactly as the coach wrote it
    pub text: String,
    pub sections: SummarySections,
}

impl SummaryView {
    pub fn new(text: String) -> Self {
        let sections = SummarySections::parse(&text);
        Self { text, sections }
    }
}

#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct SummaryResult {
    pub notification: Notification,
    pub summary: SummaryView,
}

/// Headline numbers mid count-up, as a dashboard would currently show them.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct DisplayedVitals {
    pub calories_in: i64,
    pub calories_out: i64,
    pub net_calories: i64,
    pub settled: bool,
}

#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct DashboardResult {
    pub date: NaiveDate,
    pub goal: String,
    pub base_weight: f64,
    pub current_weight: f64,
    pub water_intake: u32,
    pub sleep_hours: f64,
    pub meals: Vec<MealRecord>,
    pub workouts: Vec<WorkoutRecord>,
    pub totals: Totals,
    pub net_calories: f64,
    pub targets: GoalTargets,
    pub progress: Vec<GoalProgress>,
    pub displayed: DisplayedVitals,
    pub loading: LoadingStates,
    pub summary: Option<SummaryView>,
    /// Most recent first
    pub notifications: Vec<Notification>,
}

impl DashboardResult {
    /// Plain markdown rendering used by prompts.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("## AuraFit dashboard for {}\n\n", self.date);
        out.push_str(&format!("Goal: {}\n", self.goal));
        out.push_str(&format!(
            "Weight: {:.1} kg (started at {:.1} kg)\n",
            self.current_weight, self.base_weight
        ));
        out.push_str(&format!(
            "Calories: {:.0} in, {:.0} out, net {:.0}\n",
            self.totals.total_calories, self.totals.total_calories_burned, self.net_calories
        ));
        out.push_str(&format!(
            "Macros: {:.0} g protein, {:.0} g carbs, {:.0} g fat\n",
            self.totals.total_protein, self.totals.total_carbs, self.totals.total_fat
        ));
        out.push_str(&format!(
            "Water: {} glasses, sleep: {:.1} h\n\n",
            self.water_intake, self.sleep_hours
        ));

        out.push_str("### Goals\n");
        for p in &self.progress {
            out.push_str(&format!(
                "- {}: {:.0}/{:.0} {} ({:.0}%){}\n",
                p.label,
                p.current,
                p.goal,
                p.unit,
                p.fraction * 100.0,
                if p.completed { " ✅" } else { "" }
            ));
        }

        out.push_str("\n### Meals\n");
        if self.meals.is_empty() {
            out.push_str("None\n");
        }
        for m in &self.meals {
            out.push_str(&format!(
                "- {} ({:.0} kcal, {:.0} g protein)\n",
                m.description, m.calories, m.protein
            ));
        }

        out.push_str("\n### Workouts\n");
        if self.workouts.is_empty() {
            out.push_str("None\n");
        }
        for w in &self.workouts {
            out.push_str(&format!(
                "- {} ({:.0} min, {:.0} kcal burned)\n",
                w.description, w.duration, w.calories_burned
            ));
        }

        if let Some(summary) = &self.summary {
            out.push_str("\n---\n\n");
            out.push_str(&summary.text);
            out.push('\n');
        }
        out
    }
}
