//! Whole-day flows through `TrackerService` with a scripted coach.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use aurafit_client::{CoachClient, CoachError, DailySnapshot, Nutrients, WorkoutEstimate};
use aurafit_mcp::domains::goals::Metric;
use aurafit_mcp::domains::records::DailyLog;
use aurafit_mcp::{McpError, NotificationLevel, ProfileConfig, TrackerService};
use chrono::NaiveDate;

/// Replies are popped in order; an empty queue means a malformed payload.
#[derive(Default)]
struct ScriptedCoach {
    meals: Mutex<VecDeque<Nutrients>>,
    workouts: Mutex<VecDeque<WorkoutEstimate>>,
}

impl ScriptedCoach {
    fn meal(self, calories: f64, protein: f64) -> Self {
        self.meals.lock().unwrap().push_back(Nutrients {
            calories,
            protein,
            carbs: 0.0,
            fat: 0.0,
        });
        self
    }

    fn workout(self, duration: f64, calories_burned: f64) -> Self {
        self.workouts.lock().unwrap().push_back(WorkoutEstimate {
            duration,
            calories_burned,
        });
        self
    }
}

#[async_trait::async_trait]
impl CoachClient for ScriptedCoach {
    async fn analyze_meal(&self, _description: &str) -> Result<Nutrients, CoachError> {
        self.meals
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CoachError::MalformedPayload("not json".into()))
    }

    async fn analyze_workout(&self, _description: &str) -> Result<WorkoutEstimate, CoachError> {
        self.workouts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CoachError::MalformedPayload("not json".into()))
    }

    async fn generate_daily_summary(
        &self,
        snapshot: &DailySnapshot,
    ) -> Result<String, CoachError> {
        Ok(format!(
            "### 🌟 Daily Quest Report\nNet {:.0} kcal.",
            snapshot.net_calories()
        ))
    }
}

fn service(coach: ScriptedCoach) -> TrackerService {
    let date = NaiveDate::from_ymd_opt(2025, 5, 4).unwrap();
    TrackerService::new(
        Arc::new(coach),
        DailyLog::new(date, &ProfileConfig::default()),
    )
}

#[tokio::test]
async fn day_with_meals_and_a_workout() {
    let svc = service(
        ScriptedCoach::default()
            .meal(500.0, 40.0)
            .meal(300.0, 20.0)
            .workout(30.0, 250.0),
    );
    svc.log_meal("breakfast").await.unwrap();
    svc.log_meal("lunch").await.unwrap();
    let res = svc.log_workout("run").await.unwrap();
    assert_eq!(res.update.totals.total_calories, 800.0);
    assert_eq!(res.update.net_calories, 550.0);

    let dash = svc.dashboard().await;
    let protein = dash
        .progress
        .iter()
        .find(|p| p.metric == Metric::Protein)
        .unwrap();
    assert_eq!(protein.goal, 112.0);
    assert!((protein.fraction - 60.0 / 112.0).abs() < 1e-9);
    assert!(dash.progress.iter().all(|p| (0.0..=1.0).contains(&p.fraction)));

    let summary = svc.generate_summary().await.unwrap();
    assert_eq!(summary.summary.text, "### 🌟 Daily Quest Report\nNet 550 kcal.");
    assert_eq!(
        svc.dashboard().await.summary.map(|s| s.text),
        Some(summary.summary.text)
    );
}

#[tokio::test]
async fn malformed_reply_does_not_touch_the_log() {
    let svc = service(ScriptedCoach::default().meal(400.0, 10.0));
    svc.log_meal("toast").await.unwrap();
    let before = svc.snapshot().await;

    let err = svc.log_meal("mystery").await.unwrap_err();
    assert!(matches!(
        err,
        McpError::Upstream(CoachError::MalformedPayload(_))
    ));
    let after = svc.snapshot().await;
    assert_eq!(before.meals, after.meals);

    let dash = svc.dashboard().await;
    assert_eq!(dash.notifications[0].level, NotificationLevel::Error);
    assert!(!dash.loading.meal);
}

#[tokio::test]
async fn protein_goal_celebrates_on_crossing_only() {
    let svc = service(
        ScriptedCoach::default()
            .meal(600.0, 100.0)
            .meal(200.0, 20.0)
            .meal(100.0, 5.0),
    );
    assert!(svc.log_meal("a").await.unwrap().update.celebrations.is_empty());
    let crossed = svc.log_meal("b").await.unwrap();
    assert_eq!(crossed.update.celebrations.len(), 1);
    assert_eq!(crossed.update.celebrations[0].metric, Metric::Protein);
    assert!(svc.log_meal("c").await.unwrap().update.celebrations.is_empty());
}

#[tokio::test]
async fn water_never_goes_below_zero() {
    let svc = service(ScriptedCoach::default());
    svc.adjust_water(2).await;
    assert_eq!(svc.adjust_water(-5).await.water_intake, 0);
    assert_eq!(svc.snapshot().await.water_intake, 0);
}
