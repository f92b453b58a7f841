//! Client configuration with environment overrides.
//!
//! Browser builds use [`ClientConfig::default`]; native hosts (the CLI, tests)
//! may layer environment variables on top with [`ClientConfig::from_env`].

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_LOGIN_PAGE: &str = "/login.html";
pub const DEFAULT_ALERT_TIMEOUT_MS: u64 = 5000;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix prepended to every endpoint path, without a trailing `/`.
    pub api_base: String,
    /// Where unauthenticated visitors and logged-out users are sent.
    pub login_page: String,
    /// How long an alert stays on the page before it is removed.
    pub alert_timeout: Duration,
    /// Whole-request timeout for the native transport. `None` waits forever.
    pub request_timeout_secs: Option<u64>,
    /// Connect timeout for the native transport. `None` waits forever.
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            login_page: DEFAULT_LOGIN_PAGE.to_owned(),
            alert_timeout: Duration::from_millis(DEFAULT_ALERT_TIMEOUT_MS),
            request_timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `SCHOOL_API_BASE`: default `http://localhost:8080/api`
    /// - `SCHOOL_LOGIN_PAGE`: default `/login.html`
    /// - `SCHOOL_ALERT_TIMEOUT_MS`: default 5000
    /// - `SCHOOL_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `SCHOOL_CONNECT_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a numeric variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let api_base = std::env::var("SCHOOL_API_BASE").unwrap_or(defaults.api_base);
        let login_page = std::env::var("SCHOOL_LOGIN_PAGE").unwrap_or(defaults.login_page);
        let alert_timeout = env_parse_u64("SCHOOL_ALERT_TIMEOUT_MS")?
            .map_or(defaults.alert_timeout, Duration::from_millis);

        Ok(Self {
            api_base: normalize_base(&api_base),
            login_page,
            alert_timeout,
            request_timeout_secs: env_parse_u64("SCHOOL_REQUEST_TIMEOUT_SECS")?,
            connect_timeout_secs: env_parse_u64("SCHOOL_CONNECT_TIMEOUT_SECS")?,
        })
    }

    /// Replace the API base, dropping any trailing `/`.
    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = normalize_base(api_base);
        self
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(var: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
