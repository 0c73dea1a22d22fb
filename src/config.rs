//! Process-wide client configuration
//!
//! ## Environment Variables
//!
//! - `FIPE_BASE_URL`: catalog endpoint, defaults to [`DEFAULT_BASE_URL`]
//! - `FIPE_USER_AGENT`: user agent sent with every request
//! - `FIPE_TIMEOUT_SECS`: per-request timeout in seconds

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://www.fipe.org.br/web/indices/veiculos/default.aspx";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Fixed endpoint every postback is sent to
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CatalogConfig {
    /// Defaults overridden by whatever is set in the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("FIPE_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(ua) = lookup("FIPE_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            config.user_agent = ua;
        }

        if let Some(raw) = lookup("FIPE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(
                    "Ignoring invalid FIPE_TIMEOUT_SECS={raw:?}, using {}s",
                    DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        config
    }
}
