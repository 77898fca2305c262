//! Endpoint and transport settings for [`Client`](crate::Client).

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dnsdumpster.com";
pub const DEFAULT_API_URL: &str = "https://api.dnsdumpster.com";

/// Where the client sends requests and how long it waits for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Public landing page that embeds the authorization token.
    pub base_url: String,
    /// API host serving `/htmld/` and the `/static/` assets.
    pub api_url: String,
    /// Per-request timeout. `None` keeps reqwest's default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Builds a config pointing both hosts at `base_url`. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            base_url: base.clone(),
            api_url: base,
            timeout: None,
        }
    }

    /// Reads `DNSDUMPSTER_BASE_URL`, `DNSDUMPSTER_API_URL` and
    /// `DNSDUMPSTER_TIMEOUT_SECS`, falling back to the defaults for anything
    /// unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            base_url: env_url("DNSDUMPSTER_BASE_URL", DEFAULT_BASE_URL),
            api_url: env_url("DNSDUMPSTER_API_URL", DEFAULT_API_URL),
            timeout: env_u64("DNSDUMPSTER_TIMEOUT_SECS").map(Duration::from_secs),
        }
    }
}

fn env_url(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().trim_end_matches('/').to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
}
