use schemars::JsonSchema;
use serde::Serialize;

use super::records::DailyLog;

/// Sums over the records of one log. Derived on demand, never stored.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, JsonSchema)]
pub struct Totals {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_calories_burned: f64,
}

impl Totals {
    /// Calories eaten minus calories burned.
    pub fn net_calories(&self) -> f64 {
        self.total_calories - self.total_calories_burned
    }
}

/// Fold every meal and workout into totals. Recomputes from scratch on every call.
pub fn compute_totals(log: &DailyLog) -> Totals {
    let meals = log.meals.iter().fold(Totals::default(), |mut t, m| {
        t.total_calories += m.calories;
        t.total_protein += m.protein;
        t.total_carbs += m.carbs;
        t.total_fat += m.fat;
        t
    });
    Totals {
        total_calories_burned: log.workouts.iter().map(|w| w.calories_burned).sum(),
        ..meals
    }
}
