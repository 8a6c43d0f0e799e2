use std::time::Duration;

use crate::CoachError;
use secrecy::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_SUMMARY_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub base_url: String,
    pub analysis_model: String,
    pub summary_model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, CoachError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function, so tests never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, CoachError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut non_blank = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let api_key = non_blank("GEMINI_API_KEY")
            .or_else(|| non_blank("API_KEY"))
            .ok_or_else(|| CoachError::Config("GEMINI_API_KEY missing".into()))?;
        let base_url = get("AURAFIT_GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let analysis_model =
            get("AURAFIT_ANALYSIS_MODEL").unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.into());
        let summary_model =
            get("AURAFIT_SUMMARY_MODEL").unwrap_or_else(|| DEFAULT_SUMMARY_MODEL.into());
        let timeout_secs = get("AURAFIT_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_retries = get("AURAFIT_MAX_RETRIES")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES);
        Ok(Self {
            api_key: SecretString::new(api_key.into()),
            base_url,
            analysis_model,
            summary_model,
            request_timeout: Duration::from_secs(timeout_secs),
            max_retries,
        })
    }
}
