use std::{env, time::Duration};
use thiserror::Error;
use url::Url;

pub const DEFAULT_BALANCE_API_URL: &str = "https://telegram-mini-app-x496.onrender.com/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BALANCE_API_URL is not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("BALANCE_API_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Server settings read from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Always ends with `/` so endpoints can be joined onto it.
    pub balance_api_url: Url,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut raw_url = lookup("BALANCE_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BALANCE_API_URL.to_string());
        if !raw_url.ends_with('/') {
            raw_url.push('/');
        }
        let balance_api_url = Url::parse(&raw_url)?;

        let request_timeout = match lookup("BALANCE_API_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        Ok(Self {
            balance_api_url,
            request_timeout,
        })
    }
}
