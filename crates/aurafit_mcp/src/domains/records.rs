//! Logged meals, workouts and the day log that owns them.

use aurafit_client::{Nutrients, WorkoutEstimate};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged meal with its estimated nutrients.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct MealRecord {
    pub id: Uuid,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MealRecord {
    pub fn new(description: impl Into<String>, nutrients: Nutrients) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            calories: nutrients.calories,
            protein: nutrients.protein,
            carbs: nutrients.carbs,
            fat: nutrients.fat,
        }
    }
}

/// One logged workout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub description: String,
    /// Minutes
    pub duration: f64,
    pub calories_burned: f64,
}

impl WorkoutRecord {
    pub fn new(description: impl Into<String>, estimate: WorkoutEstimate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            duration: estimate.duration,
            calories_burned: estimate.calories_burned,
        }
    }
}

/// Everything tracked for a single day.
///
/// Values of this type are treated as immutable snapshots: the session store
/// builds a new log for every change instead of editing one in place.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct DailyLog {
    pub date: NaiveDate,
    /// Oldest first.
    pub meals: Vec<MealRecord>,
    /// Oldest first.
    pub workouts: Vec<WorkoutRecord>,
    /// Glasses of water.
    pub water_intake: u32,
    pub sleep_hours: f64,
    /// Kilograms; drives the protein goal.
    pub base_weight: f64,
    /// Kilograms.
    pub current_weight: f64,
    pub goal: String,
}

impl DailyLog {
    pub fn new(date: NaiveDate, profile: &crate::config::ProfileConfig) -> Self {
        Self {
            date,
            meals: Vec::new(),
            workouts: Vec::new(),
            water_intake: 0,
            sleep_hours: profile.sleep_hours,
            base_weight: profile.base_weight,
            current_weight: profile.current_weight,
            goal: profile.goal.clone(),
        }
    }
}
