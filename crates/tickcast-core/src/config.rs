//! Price source configuration.

use std::env;
use std::time::Duration;

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Some providers reject non-browser agents, so the default mimics a desktop browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Endpoint, identity and timeout settings for the remote quote provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub chart_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            chart_url: String::from(DEFAULT_CHART_URL),
            user_agent: String::from(DEFAULT_USER_AGENT),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl SourceConfig {
    /// Defaults overridden by `TICKCAST_*` environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `TICKCAST_CHART_URL` | `chart_url` |
    /// | `TICKCAST_USER_AGENT` | `user_agent` |
    /// | `TICKCAST_CONNECT_TIMEOUT_MS` | `connect_timeout` |
    /// | `TICKCAST_READ_TIMEOUT_MS` | `read_timeout` |
    ///
    /// Empty or unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get("TICKCAST_CHART_URL") {
            self.chart_url = url.trim().trim_end_matches('/').to_owned();
        }
        if let Some(agent) = get("TICKCAST_USER_AGENT") {
            self.user_agent = agent;
        }
        if let Some(timeout) = get("TICKCAST_CONNECT_TIMEOUT_MS").and_then(parse_millis) {
            self.connect_timeout = timeout;
        }
        if let Some(timeout) = get("TICKCAST_READ_TIMEOUT_MS").and_then(parse_millis) {
            self.read_timeout = timeout;
        }

        self
    }

    pub fn with_chart_url(mut self, url: impl Into<String>) -> Self {
        self.chart_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }
}

fn parse_millis(value: String) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_millis)
}
