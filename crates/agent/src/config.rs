//! Agent configuration loaded from environment variables.
//!
//! With nothing set, the agent polls the production stats endpoint once
//! per second. Thresholds are fixed in `statwatch-core` and are not
//! configurable.

use std::time::Duration;

/// Endpoint polled when `STATS_URL` is unset.
pub const DEFAULT_STATS_URL: &str = "http://srv.msk01.gigacorp.local/_stats";

/// Interval between polls when `POLL_INTERVAL_MS` is unset.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings for the polling agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Full URL of the stats endpoint.
    pub stats_url: String,
    /// Time between the start of consecutive polls.
    pub poll_interval: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            stats_url: DEFAULT_STATS_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AgentConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var            | Default                                   |
    /// |--------------------|-------------------------------------------|
    /// | `STATS_URL`        | `http://srv.msk01.gigacorp.local/_stats`  |
    /// | `POLL_INTERVAL_MS` | `1000`                                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("STATS_URL") {
            if reqwest::Url::parse(&url).is_err() {
                return Err(ConfigError::Invalid {
                    var: "STATS_URL",
                    expected: "an absolute URL",
                    value: url,
                });
            }
            config.stats_url = url;
        }

        if let Some(raw) = lookup("POLL_INTERVAL_MS") {
            let millis = raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "POLL_INTERVAL_MS",
                    expected: "a positive integer",
                    value: raw.clone(),
                })?;
            config.poll_interval = Duration::from_millis(millis);
        }

        Ok(config)
    }
}
