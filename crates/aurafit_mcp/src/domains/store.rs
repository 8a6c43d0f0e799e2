//! Session state store.
//!
//! Holds exactly one [`DailyLog`] snapshot. Every operation builds a complete
//! new log from the current one and swaps it in, so readers holding an older
//! snapshot never observe a half-applied change.

use std::sync::Arc;

use super::records::{DailyLog, MealRecord, WorkoutRecord};

#[derive(Clone, Debug)]
pub struct SessionStore {
    current: Arc<DailyLog>,
}

impl SessionStore {
    pub fn new(log: DailyLog) -> Self {
        Self {
            current: Arc::new(log),
        }
    }

    /// The current snapshot. Cheap to clone and unaffected by later changes.
    pub fn snapshot(&self) -> Arc<DailyLog> {
        Arc::clone(&self.current)
    }

    fn replace(&mut self, f: impl FnOnce(&mut DailyLog)) -> Arc<DailyLog> {
        let mut next = DailyLog::clone(&self.current);
        f(&mut next);
        self.current = Arc::new(next);
        self.snapshot()
    }

    /// Append to the end of the meal list. Duplicates are allowed.
    pub fn append_meal(&mut self, record: MealRecord) -> Arc<DailyLog> {
        self.replace(|log| log.meals.push(record))
    }

    pub fn append_workout(&mut self, record: WorkoutRecord) -> Arc<DailyLog> {
        self.replace(|log| log.workouts.push(record))
    }

    /// Water never drops below zero and has no upper bound.
    pub fn adjust_water(&mut self, delta: i64) -> Arc<DailyLog> {
        self.replace(|log| {
            let next = i64::from(log.water_intake)
                .saturating_add(delta)
                .clamp(0, i64::from(u32::MAX));
            log.water_intake = next as u32;
        })
    }

    /// Sleep never drops below zero; half-hour steps are the usual delta.
    pub fn adjust_sleep(&mut self, delta: f64) -> Arc<DailyLog> {
        self.replace(|log| log.sleep_hours = (log.sleep_hours + delta).max(0.0))
    }

    /// Replaces the current weight as given. No validation happens here.
    pub fn set_weight(&mut self, value: f64) -> Arc<DailyLog> {
        self.replace(|log| log.current_weight = value)
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) -> Arc<DailyLog> {
        let goal = goal.into();
        self.replace(|log| log.goal = goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use aurafit_client::{Nutrients, WorkoutEstimate};
    use chrono::NaiveDate;

    fn store() -> SessionStore {
        let date = NaiveDate::from_ymd_opt(2025, 5, 4).unwrap();
        SessionStore::new(DailyLog::new(date, &ProfileConfig::default()))
    }

    fn meal(calories: f64) -> MealRecord {
        MealRecord::new(
            "meal",
            Nutrients {
                calories,
                protein: 0.0,
                carbs: 0.0,
                fat: 0.0,
            },
        )
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut s = store();
        s.append_meal(meal(1.0));
        s.append_meal(meal(2.0));
        let log = s.append_meal(meal(3.0));
        let cals: Vec<f64> = log.meals.iter().map(|m| m.calories).collect();
        assert_eq!(cals, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn append_does_not_deduplicate() {
        let mut s = store();
        let m = meal(100.0);
        s.append_meal(m.clone());
        let log = s.append_meal(m);
        assert_eq!(log.meals.len(), 2);
    }

    #[test]
    fn old_snapshots_are_untouched() {
        let mut s = store();
        let before = s.snapshot();
        s.append_workout(WorkoutRecord::new(
            "run",
            WorkoutEstimate {
                duration: 30.0,
                calories_burned: 300.0,
            },
        ));
        s.adjust_water(3);
        assert!(before.workouts.is_empty());
        assert_eq!(before.water_intake, 0);
        assert_eq!(s.snapshot().workouts.len(), 1);
        assert_eq!(s.snapshot().water_intake, 3);
    }

    #[test]
    fn water_never_goes_negative() {
        let mut s = store();
        s.adjust_water(2);
        assert_eq!(s.adjust_water(-1000).water_intake, 0);
        assert_eq!(s.adjust_water(-1).water_intake, 0);
        assert_eq!(s.adjust_water(1).water_intake, 1);
    }

    #[test]
    fn extreme_water_deltas_saturate() {
        let mut s = store();
        s.adjust_water(1);
        assert_eq!(s.adjust_water(i64::MAX).water_intake, u32::MAX);
        assert_eq!(s.adjust_water(i64::MAX).water_intake, u32::MAX);
        assert_eq!(s.adjust_water(i64::MIN).water_intake, 0);
    }

    #[test]
    fn sleep_moves_in_fractional_steps_and_floors_at_zero() {
        let mut s = store();
        assert_eq!(s.adjust_sleep(0.5).sleep_hours, 8.0);
        assert_eq!(s.adjust_sleep(-0.5).sleep_hours, 7.5);
        assert_eq!(s.adjust_sleep(-100.0).sleep_hours, 0.0);
    }

    #[test]
    fn set_weight_is_permissive() {
        let mut s = store();
        assert_eq!(s.set_weight(68.2).current_weight, 68.2);
        assert_eq!(s.set_weight(-3.0).current_weight, -3.0);
        assert!(s.set_weight(f64::NAN).current_weight.is_nan());
        // base weight never moves
        assert_eq!(s.snapshot().base_weight, 70.0);
    }

    #[test]
    fn set_goal_replaces_text() {
        let mut s = store();
        assert_eq!(s.set_goal("Lose weight").goal, "Lose weight");
    }
}
