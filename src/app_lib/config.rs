//! Client configuration for the identity service endpoint, request timeouts,
//! the refresh lead time and notification timings. Defaults can be overridden
//! from the environment so deployments can point at another API without
//! rebuilding. Configuration values are public; do not store secrets here.

use std::time::Duration;

/// Default request timeout applied to every identity service call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// How long before the access token expires the silent refresh fires.
pub const DEFAULT_REFRESH_LEAD: Duration = Duration::from_secs(60);
/// Lifetime of an auto-closing notification.
pub const DEFAULT_ALERT_AUTO_CLOSE: Duration = Duration::from_secs(3);
/// Delay between marking a dismissed notification as fading and removing it.
pub const DEFAULT_ALERT_FADE_OUT: Duration = Duration::from_millis(250);

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub refresh_lead: Duration,
    pub alert_auto_close: Duration,
    pub alert_fade_out: Duration,
    pub alert_fade: bool,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            refresh_lead: DEFAULT_REFRESH_LEAD,
            alert_auto_close: DEFAULT_ALERT_AUTO_CLOSE,
            alert_fade_out: DEFAULT_ALERT_FADE_OUT,
            alert_fade: true,
            user_agent: APP_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads defaults and applies environment overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_overrides(&mut config, env_overrides());
        config
    }

    /// Returns a copy pointing at another API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Base URL of the accounts collection on the identity service.
    #[must_use]
    pub fn accounts_url(&self) -> String {
        format!("{}/accounts", self.api_base_url.trim().trim_end_matches('/'))
    }
}

#[derive(Default)]
struct Overrides {
    api_base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    refresh_lead_secs: Option<u64>,
}

fn env_overrides() -> Overrides {
    Overrides {
        api_base_url: read_env("PORTAL_API_BASE_URL"),
        request_timeout_ms: read_env("PORTAL_REQUEST_TIMEOUT_MS").and_then(|v| v.parse().ok()),
        refresh_lead_secs: read_env("PORTAL_REFRESH_LEAD_SECS").and_then(|v| v.parse().ok()),
    }
}

fn apply_overrides(config: &mut AppConfig, overrides: Overrides) {
    if let Some(value) = overrides.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.request_timeout_ms {
        config.request_timeout = Duration::from_millis(value);
    }
    if let Some(value) = overrides.refresh_lead_secs {
        config.refresh_lead = Duration::from_secs(value);
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .and_then(|value| normalize_value(&value))
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
