//! Subscriber setup for the stdio binary. Logs go to stderr because stdout
//! carries the protocol.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,rmcp=warn,serve_inner=warn";

/// `AURAFIT_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn log_level_from<F>(get: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| get(key).filter(|v| !v.trim().is_empty());
    non_blank("AURAFIT_LOG_LEVEL")
        .or_else(|| non_blank("RUST_LOG"))
        .unwrap_or_else(|| "info".to_string())
}

/// Append per-target overrides to keep rmcp internals quiet by default.
pub fn env_filter(log_env: &str) -> EnvFilter {
    let combined_filter = format!("{},rmcp=warn,serve_inner=warn", log_env);
    EnvFilter::try_new(combined_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init(log_env: &str) {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(log_env))
        .init();
}
