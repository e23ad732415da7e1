//! CLI configuration loaded from environment variables.
//!
//! | Variable             | Default       | Description                                 |
//! |----------------------|---------------|---------------------------------------------|
//! | `LABTRACK_DB`        | `labtrack.db` | SQLite database path (also `--database`)    |
//! | `LABTRACK_LOG_LEVEL` | `warn`        | tracing filter (trace/debug/info/warn/error)|

/// Runtime configuration for the labtrack process.
#[derive(Debug)]
pub struct Config {
    /// Tracing filter string, e.g. `"labtrack_db=debug,warn"`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables, applying defaults
    /// where a variable is absent.
    pub fn from_env() -> Self {
        Self {
            log_level: env_str("LABTRACK_LOG_LEVEL", "warn"),
        }
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
