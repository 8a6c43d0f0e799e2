//! Domain modules for the daily tracker.
//!
//! Everything here is synchronous and free of I/O. The collaborator is only
//! reached from [`crate::services`].
//!
//! # Modules
//!
//! - [`records`]: meal and workout records and the daily log
//! - [`store`]: the snapshot-swapping session store
//! - [`totals`]: derived sums over a log
//! - [`goals`]: daily goals, clamped progress and completion tracking
//! - [`count_up`]: eased transitions for displayed numbers
//! - [`summary`]: heading-based splitting of the narrative summary

pub mod count_up;
pub mod goals;
pub mod records;
pub mod store;
pub mod summary;
pub mod totals;

pub use goals::{CelebrationTracker, GoalProgress, GoalTargets, Metric};
pub use records::{DailyLog, MealRecord, WorkoutRecord};
pub use store::SessionStore;
pub use totals::Totals;
