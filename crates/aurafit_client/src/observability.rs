//! Request metrics for calls to the model.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding binary installs a recorder.

use std::time::Duration;

use crate::CoachError;

pub const REQUESTS_TOTAL: &str = "aurafit_coach_requests_total";
pub const REQUEST_SECONDS: &str = "aurafit_coach_request_seconds";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    AnalyzeMeal,
    AnalyzeWorkout,
    DailySummary,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::AnalyzeMeal => "analyze_meal",
            Operation::AnalyzeWorkout => "analyze_workout",
            Operation::DailySummary => "daily_summary",
        }
    }
}

/// Outcome label used on the request counter.
pub fn outcome_label(err: Option<&CoachError>) -> &'static str {
    match err {
        None => "ok",
        Some(CoachError::Http(e)) if e.is_timeout() => "timeout",
        Some(CoachError::Http(_)) => "transport",
        Some(CoachError::Api { .. }) => "api_error",
        Some(CoachError::RateLimited(_)) => "rate_limited",
        Some(CoachError::MalformedPayload(_)) | Some(CoachError::EmptyResponse) => "malformed",
        Some(CoachError::InvalidInput(_)) => "invalid_input",
        Some(CoachError::Config(_)) => "config",
    }
}

pub fn record_request<T>(op: Operation, result: &Result<T, CoachError>, elapsed: Duration) {
    let outcome = outcome_label(result.as_ref().err());
    metrics::counter!(REQUESTS_TOTAL, "operation" => op.as_str(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!(REQUEST_SECONDS, "operation" => op.as_str())
        .record(elapsed.as_secs_f64());
}
