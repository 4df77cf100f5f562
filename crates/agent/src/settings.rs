//! Agent settings
//!
//! Environment-backed process settings, distinct from the on-disk
//! configuration XML that carries the server credentials. Every setting has
//! a default so the agent runs with nothing but `HEALTHMON_LOG_PATH` set.

use anyhow::Result;
use serde::Deserialize;

/// Process settings loaded from `HEALTHMON_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Telemetry log destination. Empty means "not configured": monitor
    /// mode refuses to run without a concrete path.
    #[serde(default)]
    pub log_path: String,

    /// Bound on a single API request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    15
}

impl Settings {
    /// Load settings from the environment.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("HEALTHMON"))
            .build()?;

        Ok(settings.try_deserialize().unwrap_or_else(|_| Settings {
            log_path: String::new(),
            request_timeout_secs: default_request_timeout(),
        }))
    }
}
