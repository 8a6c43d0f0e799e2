//! Shared test utilities and a mock `CoachClient` used by unit tests.
#![cfg(test)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use aurafit_client::{CoachClient, CoachError, DailySnapshot, Nutrients, WorkoutEstimate};

pub const SUMMARY_TEXT: &str = "### 🌟 Daily Quest Report
Solid day of fuel.

### 🔬 Weight & Goal Analysis
You are on track.

### ✨ Pro-Tip Unlocked!
Drink a glass of water with every meal.";

/// Fixed estimates (500 kcal meals, 300 kcal workouts) with call counters.
#[derive(Default)]
pub struct MockCoach {
    failing: AtomicBool,
    delay: Option<Duration>,
    meal_calls: AtomicUsize,
    workout_calls: AtomicUsize,
    summary_calls: AtomicUsize,
    last_snapshot: Mutex<Option<DailySnapshot>>,
}

impl MockCoach {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with an upstream API error.
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.set_failing(true);
        mock
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn meal_calls(&self) -> usize {
        self.meal_calls.load(Ordering::SeqCst)
    }

    pub fn workout_calls(&self) -> usize {
        self.workout_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn summary_text(&self) -> String {
        SUMMARY_TEXT.to_string()
    }

    pub fn last_snapshot(&self) -> Option<DailySnapshot> {
        self.last_snapshot.lock().unwrap().clone()
    }

    async fn respond<T>(&self, ok: T) -> Result<T, CoachError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoachError::Api {
                status: 500,
                message: "mock failure".into(),
            });
        }
        Ok(ok)
    }
}

#[async_trait]
impl CoachClient for MockCoach {
    async fn analyze_meal(&self, _description: &str) -> Result<Nutrients, CoachError> {
        self.meal_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Nutrients {
            calories: 500.0,
            protein: 40.0,
            carbs: 50.0,
            fat: 10.0,
        })
        .await
    }

    async fn analyze_workout(&self, _description: &str) -> Result<WorkoutEstimate, CoachError> {
        self.workout_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(WorkoutEstimate {
            duration: 30.0,
            calories_burned: 300.0,
        })
        .await
    }

    async fn generate_daily_summary(&self, snapshot: &DailySnapshot) -> Result<String, CoachError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_snapshot.lock().unwrap() = Some(snapshot.clone());
        self.respond(self.summary_text()).await
    }
}
