// Runtime configuration, read once from the environment at startup.

use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the analyzer service, without a trailing slash.
    pub base_url: String,
    /// Request timeout. `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
    /// Keep the temporary payload file instead of deleting it.
    pub keep_payload: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            keep_payload: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but with an injectable lookup so tests don't have
    /// to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("ANALYZER_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url: normalize_base_url(&base_url),
            timeout: lookup("ANALYZE_TIMEOUT_SECS")
                .and_then(|secs| secs.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            keep_payload: lookup("ANALYZE_KEEP_PAYLOAD")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Log filter built from `log_level`, falling back to the default level
    /// when the directive doesn't parse.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, url: Option<&str>, keep_payload: bool) -> Self {
        if let Some(url) = url {
            self.base_url = normalize_base_url(url);
        }
        self.keep_payload |= keep_payload;
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
