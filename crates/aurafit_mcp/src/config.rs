//! Starting profile for a tracking session, plus the startup check on the
//! coach settings.

use aurafit_client::config::Config;

use crate::error::{McpError, McpResult};

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_SLEEP_HOURS: f64 = 7.5;
pub const DEFAULT_GOAL: &str = "Lose belly fat and gain lean muscle";

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileConfig {
    pub base_weight: f64,
    pub current_weight: f64,
    pub sleep_hours: f64,
    pub goal: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            base_weight: DEFAULT_WEIGHT_KG,
            current_weight: DEFAULT_WEIGHT_KG,
            sleep_hours: DEFAULT_SLEEP_HOURS,
            goal: DEFAULT_GOAL.to_string(),
        }
    }
}

impl ProfileConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Unparsable or missing values fall back to the defaults; current weight
    /// defaults to the base weight.
    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut number = |key: &str| get(key).and_then(|v| v.trim().parse::<f64>().ok());
        let base_weight = number("AURAFIT_BASE_WEIGHT_KG").unwrap_or(DEFAULT_WEIGHT_KG);
        let current_weight = number("AURAFIT_CURRENT_WEIGHT_KG").unwrap_or(base_weight);
        let sleep_hours = number("AURAFIT_SLEEP_HOURS").unwrap_or(DEFAULT_SLEEP_HOURS);
        let goal = get("AURAFIT_GOAL")
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GOAL.to_string());
        Self {
            base_weight,
            current_weight,
            sleep_hours,
            goal,
        }
    }
}

/// Coach settings from the environment. A missing key stops the server.
pub fn load_coach_config() -> McpResult<Config> {
    load_coach_config_with(|k| std::env::var(k).ok())
}

pub fn load_coach_config_with<F>(get: F) -> McpResult<Config>
where
    F: FnMut(&str) -> Option<String>,
{
    Config::from_env_with(get).map_err(|e| McpError::Config(e.to_string()))
}
