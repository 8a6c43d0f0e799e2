//! `CoachClient` trait and the payloads exchanged with the generative model.
//!
//! The model is treated as an opaque collaborator: meal and workout
//! descriptions go in, numeric estimates come out, and a day snapshot can be
//! turned into a narrative summary.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod observability;
pub mod retry;
pub mod utils;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoachError {
    /// Map a non-success HTTP status to an error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => CoachError::RateLimited(message),
            _ => CoachError::Api { status, message },
        }
    }

    /// Transport failures, throttling and server-side errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            CoachError::Http(e) => e.is_timeout() || e.is_connect(),
            CoachError::Api { status, .. } => *status >= 500,
            CoachError::RateLimited(_) => true,
            _ => false,
        }
    }
}

/// Nutritional estimate for one meal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Nutrients {
    /// Estimated calories (kcal)
    pub calories: f64,
    /// Estimated protein in grams
    pub protein: f64,
    /// Estimated carbohydrates in grams
    pub carbs: f64,
    /// Estimated fat in grams
    pub fat: f64,
}

impl Nutrients {
    /// Reject estimates that cannot be logged (negative or non-finite values).
    pub fn validated(self) -> Result<Self, CoachError> {
        let fields = [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ];
        ensure_non_negative(&fields)?;
        Ok(self)
    }
}

/// Duration and energy estimate for one workout.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEstimate {
    /// Estimated duration in minutes
    pub duration: f64,
    /// Estimated calories burned (kcal)
    #[serde(alias = "calories_burned")]
    pub calories_burned: f64,
}

impl WorkoutEstimate {
    pub fn validated(self) -> Result<Self, CoachError> {
        let fields = [
            ("duration", self.duration),
            ("caloriesBurned", self.calories_burned),
        ];
        ensure_non_negative(&fields)?;
        Ok(self)
    }
}

fn ensure_non_negative(fields: &[(&str, f64)]) -> Result<(), CoachError> {
    for (name, value) in fields {
        if !value.is_finite() || *value < 0.0 {
            return Err(CoachError::MalformedPayload(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

/// Everything the summary prompt needs to know about one day.
///
/// Totals are pre-derived by the caller so the client never re-implements
/// the aggregation rules.
#[derive(Clone, Debug, PartialEq)]
pub struct DailySnapshot {
    pub date: chrono::NaiveDate,
    pub goal: String,
    pub base_weight: f64,
    pub current_weight: f64,
    pub calories_in: f64,
    pub calories_out: f64,
    pub protein: f64,
    pub water_glasses: u32,
    pub sleep_hours: f64,
    pub meals: Vec<String>,
    pub workouts: Vec<String>,
}

impl DailySnapshot {
    pub fn net_calories(&self) -> f64 {
        self.calories_in - self.calories_out
    }
}

#[async_trait]
pub trait CoachClient: Send + Sync + 'static {
    /// Estimate calories and macros for a free-text meal description.
    async fn analyze_meal(&self, description: &str) -> Result<Nutrients, CoachError>;

    /// Estimate duration and calories burned for a free-text workout description.
    async fn analyze_workout(&self, description: &str) -> Result<WorkoutEstimate, CoachError>;

    /// Produce a markdown narrative for the day. The text is opaque to callers.
    async fn generate_daily_summary(&self, snapshot: &DailySnapshot)
    -> Result<String, CoachError>;
}
