use std::fmt;

use schemars::JsonSchema;
use serde::Serialize;

/// Operations that call the collaborator and can be in flight.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Meal,
    Workout,
    Summary,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Meal => "meal analysis",
            OperationKind::Workout => "workout analysis",
            OperationKind::Summary => "daily summary",
        })
    }
}

/// One flag per operation; true while a request is outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LoadingStates {
    pub meal: bool,
    pub workout: bool,
    pub summary: bool,
}

impl LoadingStates {
    pub fn get(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Meal => self.meal,
            OperationKind::Workout => self.workout,
            OperationKind::Summary => self.summary,
        }
    }

    pub fn set(&mut self, kind: OperationKind, value: bool) {
        match kind {
            OperationKind::Meal => self.meal = value,
            OperationKind::Workout => self.workout = value,
            OperationKind::Summary => self.summary = value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A short user-facing message produced by an operation.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
