use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use aurafit_client::{CoachClient, DailySnapshot};
use tokio::sync::Mutex;

use crate::config::ProfileConfig;
use crate::domains::count_up::CountUp;
use crate::domains::goals::{self, CelebrationTracker};
use crate::domains::records::{DailyLog, MealRecord, WorkoutRecord};
use crate::domains::store::SessionStore;
use crate::domains::totals::{Totals, compute_totals};
use crate::error::{McpError, McpResult};
use crate::state::{LoadingStates, Notification, NotificationLevel, OperationKind};
use crate::types::{
    Celebration, DashboardResult, DisplayedVitals, MealLoggedResult, SummaryResult, SummaryView,
    UpdateResult, WorkoutLoggedResult,
};

/// How many notifications the dashboard keeps around.
pub const NOTIFICATION_HISTORY: usize = 20;

struct Vitals {
    calories_in: CountUp,
    calories_out: CountUp,
    net: CountUp,
}

impl Vitals {
    fn new(now: Instant) -> Self {
        Self {
            calories_in: CountUp::settled(0.0, now),
            calories_out: CountUp::settled(0.0, now),
            net: CountUp::settled(0.0, now),
        }
    }

    fn retarget(&mut self, totals: &Totals, now: Instant) {
        self.calories_in.retarget(totals.total_calories, now);
        self.calories_out
            .retarget(totals.total_calories_burned, now);
        self.net.retarget(totals.net_calories(), now);
    }

    fn displayed(&self, now: Instant) -> DisplayedVitals {
        DisplayedVitals {
            calories_in: self.calories_in.rounded_at(now),
            calories_out: self.calories_out.rounded_at(now),
            net_calories: self.net.rounded_at(now),
            settled: [&self.calories_in, &self.calories_out, &self.net]
                .iter()
                .all(|c| c.is_finished(now)),
        }
    }
}

struct Session {
    store: SessionStore,
    celebrations: CelebrationTracker,
    summary: Option<String>,
    vitals: Vitals,
}

/// Marks one operation as in flight until dropped.
struct InFlight {
    loading: Arc<std::sync::Mutex<LoadingStates>>,
    kind: OperationKind,
}

impl InFlight {
    fn acquire(
        loading: &Arc<std::sync::Mutex<LoadingStates>>,
        kind: OperationKind,
    ) -> McpResult<Self> {
        let mut states = loading.lock().unwrap_or_else(|e| e.into_inner());
        if states.get(kind) {
            return Err(McpError::Busy(kind));
        }
        states.set(kind, true);
        Ok(Self {
            loading: Arc::clone(loading),
            kind,
        })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut states = self.loading.lock().unwrap_or_else(|e| e.into_inner());
        states.set(self.kind, false);
    }
}

/// Runs every tracker operation against one session.
///
/// The session lock is never held while waiting on the coach, so counters
/// can be adjusted while an analysis is outstanding.
#[derive(Clone)]
pub struct TrackerService {
    client: Arc<dyn CoachClient>,
    session: Arc<Mutex<Session>>,
    loading: Arc<std::sync::Mutex<LoadingStates>>,
    notifications: Arc<Mutex<VecDeque<Notification>>>,
}

impl TrackerService {
    pub fn new(client: Arc<dyn CoachClient>, log: DailyLog) -> Self {
        Self {
            client,
            session: Arc::new(Mutex::new(Session {
                store: SessionStore::new(log),
                celebrations: CelebrationTracker::new(),
                summary: None,
                vitals: Vitals::new(Instant::now()),
            })),
            loading: Arc::new(std::sync::Mutex::new(LoadingStates::default())),
            notifications: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Start today's log from profile defaults.
    pub fn for_today(client: Arc<dyn CoachClient>, profile: &ProfileConfig) -> Self {
        let today = chrono::Local::now().date_naive();
        Self::new(client, DailyLog::new(today, profile))
    }

    pub async fn snapshot(&self) -> Arc<DailyLog> {
        self.session.lock().await.store.snapshot()
    }

    pub fn loading(&self) -> LoadingStates {
        *self.loading.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn notify(&self, notification: Notification) -> Notification {
        match notification.level {
            NotificationLevel::Error => {
                tracing::error!(text = %notification.message, "notification")
            }
            NotificationLevel::Warning => {
                tracing::warn!(text = %notification.message, "notification")
            }
            _ => tracing::info!(text = %notification.message, "notification"),
        }
        let mut history = self.notifications.lock().await;
        history.push_front(notification.clone());
        history.truncate(NOTIFICATION_HISTORY);
        notification
    }

    /// Record the single notification for a failed operation and hand the error back.
    async fn fail<T>(&self, err: McpError) -> McpResult<T> {
        let notification = match &err {
            McpError::Validation(_) | McpError::Busy(_) => {
                Notification::warning(err.user_message())
            }
            _ => Notification::error(err.user_message()),
        };
        self.notify(notification).await;
        Err(err)
    }

    fn update(session: &mut Session, log: &DailyLog, notification: Notification) -> UpdateResult {
        let totals = compute_totals(log);
        session.vitals.retarget(&totals, Instant::now());
        let progress = goals::evaluate(log, &totals);
        let celebrations = session
            .celebrations
            .observe_all(&progress)
            .into_iter()
            .map(Celebration::new)
            .collect();
        UpdateResult {
            notification,
            celebrations,
            water_intake: log.water_intake,
            sleep_hours: log.sleep_hours,
            current_weight: log.current_weight,
            goal: log.goal.clone(),
            totals,
            net_calories: totals.net_calories(),
            progress,
        }
    }

    async fn announce(&self, update: UpdateResult) -> UpdateResult {
        self.notify(update.notification.clone()).await;
        for c in &update.celebrations {
            self.notify(Notification::success(c.message.clone())).await;
        }
        update
    }

    fn clean_description(description: &str) -> McpResult<String> {
        aurafit_client::utils::require_description(description)
            .map(str::to_string)
            .map_err(|_| McpError::Validation("description must not be empty".into()))
    }

    pub async fn log_meal(&self, description: &str) -> McpResult<MealLoggedResult> {
        let description = match Self::clean_description(description) {
            Ok(d) => d,
            Err(e) => return self.fail(e).await,
        };
        let _in_flight = match InFlight::acquire(&self.loading, OperationKind::Meal) {
            Ok(g) => g,
            Err(e) => return self.fail(e).await,
        };

        let analysis = self.client.analyze_meal(&description).await;
        let nutrients = match analysis {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "meal analysis failed");
                return self.fail(e.into()).await;
            }
        };

        let meal = MealRecord::new(description, nutrients);
        let update = {
            let mut session = self.session.lock().await;
            let log = session.store.append_meal(meal.clone());
            Self::update(
                &mut session,
                &log,
                Notification::success(format!("Logged {:.0} kcal meal", meal.calories)),
            )
        };
        tracing::info!(meal_id = %meal.id, calories = meal.calories, "meal logged");
        Ok(MealLoggedResult {
            meal,
            update: self.announce(update).await,
        })
    }

    pub async fn log_workout(&self, description: &str) -> McpResult<WorkoutLoggedResult> {
        let description = match Self::clean_description(description) {
            Ok(d) => d,
            Err(e) => return self.fail(e).await,
        };
        let _in_flight = match InFlight::acquire(&self.loading, OperationKind::Workout) {
            Ok(g) => g,
            Err(e) => return self.fail(e).await,
        };

        let analysis = self.client.analyze_workout(&description).await;
        let estimate = match analysis {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(error = %e, "workout analysis failed");
                return self.fail(e.into()).await;
            }
        };

        let workout = WorkoutRecord::new(description, estimate);
        let update = {
            let mut session = self.session.lock().await;
            let log = session.store.append_workout(workout.clone());
            Self::update(
                &mut session,
                &log,
                Notification::success(format!(
                    "Logged workout: {:.0} kcal burned",
                    workout.calories_burned
                )),
            )
        };
        tracing::info!(
            workout_id = %workout.id,
            calories_burned = workout.calories_burned,
            "workout logged"
        );
        Ok(WorkoutLoggedResult {
            workout,
            update: self.announce(update).await,
        })
    }

    pub async fn adjust_water(&self, delta: i64) -> UpdateResult {
        let update = {
            let mut session = self.session.lock().await;
            let log = session.store.adjust_water(delta);
            let message = format!("Water: {} glasses", log.water_intake);
            Self::update(&mut session, &log, Notification::info(message))
        };
        self.announce(update).await
    }

    pub async fn adjust_sleep(&self, delta: f64) -> UpdateResult {
        let update = {
            let mut session = self.session.lock().await;
            let log = session.store.adjust_sleep(delta);
            let message = format!("Sleep: {:.1} h", log.sleep_hours);
            Self::update(&mut session, &log, Notification::info(message))
        };
        self.announce(update).await
    }

    /// Applies any value; non-positive weights are only flagged.
    pub async fn set_weight(&self, value: f64) -> UpdateResult {
        let notification = if value > 0.0 {
            Notification::success(format!("Weight updated to {value:.1} kg"))
        } else {
            tracing::warn!(weight = value, "non-positive weight recorded");
            Notification::warning(format!("Weight set to {value} kg, which looks wrong"))
        };
        let update = {
            let mut session = self.session.lock().await;
            let log = session.store.set_weight(value);
            Self::update(&mut session, &log, notification)
        };
        self.announce(update).await
    }

    pub async fn set_goal(&self, goal: &str) -> McpResult<UpdateResult> {
        let goal = goal.trim();
        if goal.is_empty() {
            return self
                .fail(McpError::Validation("goal must not be empty".into()))
                .await;
        }
        let update = {
            let mut session = self.session.lock().await;
            let log = session.store.set_goal(goal);
            Self::update(&mut session, &log, Notification::success("Goal updated"))
        };
        Ok(self.announce(update).await)
    }

    fn daily_snapshot(log: &DailyLog) -> DailySnapshot {
        let totals = compute_totals(log);
        DailySnapshot {
            date: log.date,
            goal: log.goal.clone(),
            base_weight: log.base_weight,
            current_weight: log.current_weight,
            calories_in: totals.total_calories,
            calories_out: totals.total_calories_burned,
            protein: totals.total_protein,
            water_glasses: log.water_intake,
            sleep_hours: log.sleep_hours,
            meals: log.meals.iter().map(|m| m.description.clone()).collect(),
            workouts: log.workouts.iter().map(|w| w.description.clone()).collect(),
        }
    }

    /// Replace the stored summary with a fresh one from the coach.
    ///
    /// The previous summary is discarded before the request goes out.
    pub async fn generate_summary(&self) -> McpResult<SummaryResult> {
        let _in_flight = match InFlight::acquire(&self.loading, OperationKind::Summary) {
            Ok(g) => g,
            Err(e) => return self.fail(e).await,
        };
        let snapshot = {
            let mut session = self.session.lock().await;
            session.summary = None;
            Self::daily_snapshot(&session.store.snapshot())
        };

        let generated = self.client.generate_daily_summary(&snapshot).await;
        let text = match generated {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "summary generation failed");
                return self.fail(e.into()).await;
            }
        };

        self.session.lock().await.summary = Some(text.clone());
        let notification = self
            .notify(Notification::success("Your daily summary is ready"))
            .await;
        Ok(SummaryResult {
            notification,
            summary: SummaryView::new(text),
        })
    }

    pub async fn dashboard(&self) -> DashboardResult {
        self.dashboard_at(Instant::now()).await
    }

    /// Read-only view of the session; `now` only selects the count-up frame.
    pub async fn dashboard_at(&self, now: Instant) -> DashboardResult {
        let notifications = self.notifications.lock().await.iter().cloned().collect();
        let loading = self.loading();
        let session = self.session.lock().await;
        let log = session.store.snapshot();
        let totals = compute_totals(&log);
        let displayed = session.vitals.displayed(now);
        DashboardResult {
            date: log.date,
            goal: log.goal.clone(),
            base_weight: log.base_weight,
            current_weight: log.current_weight,
            water_intake: log.water_intake,
            sleep_hours: log.sleep_hours,
            meals: log.meals.clone(),
            workouts: log.workouts.clone(),
            totals,
            net_calories: totals.net_calories(),
            targets: goals::compute_goals(&log),
            progress: goals::evaluate(&log, &totals),
            displayed,
            loading,
            summary: session.summary.clone().map(SummaryView::new),
            notifications,
        }
    }
}
