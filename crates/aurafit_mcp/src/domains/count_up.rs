//! Count-up animation for displayed numbers.
//!
//! Purely cosmetic. Callers pass the clock in, which keeps the easing
//! deterministic and lets the presenter live outside any render loop.

use std::time::{Duration, Instant};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(1000);

/// Exponential ease-out over normalized time; exactly 1 at `t >= 1`.
pub fn ease_out_expo(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f64.powf(-10.0 * t.max(0.0))
    }
}

#[derive(Clone, Debug)]
pub struct CountUp {
    from: f64,
    target: f64,
    started: Instant,
    duration: Duration,
}

impl CountUp {
    /// A presenter already resting at `value`.
    pub fn settled(value: f64, now: Instant) -> Self {
        Self::with_duration(value, now, DEFAULT_DURATION)
    }

    pub fn with_duration(value: f64, now: Instant, duration: Duration) -> Self {
        Self {
            from: value,
            target: value,
            started: now,
            duration,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// The value to display at `now`.
    pub fn value_at(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target;
        }
        self.from + (self.target - self.from) * ease_out_expo(t)
    }

    /// Displayed value rounded to a whole number.
    pub fn rounded_at(&self, now: Instant) -> i64 {
        self.value_at(now).round() as i64
    }

    /// Start animating toward a new target, cancelling any animation in flight.
    ///
    /// The new animation starts from whatever is displayed at `now`.
    pub fn retarget(&mut self, target: f64, now: Instant) {
        if target == self.target {
            return;
        }
        self.from = self.value_at(now);
        self.target = target;
        self.started = now;
    }
}
