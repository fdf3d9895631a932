//! Startup configuration read from the environment.
//!
//! # Design
//! Values are read once into an immutable `Config` that is passed by
//! reference to whatever needs it. `from_lookup` takes the lookup function as
//! a parameter so tests never touch the process environment.

use std::time::Duration;

use thiserror::Error;

use crate::practicum::DEFAULT_ENDPOINT;
use crate::telegram::DEFAULT_API_URL;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const PRACTICUM_ENDPOINT: &str = "PRACTICUM_ENDPOINT";
pub const TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
pub const RETRY_INTERVAL_SECS: &str = "RETRY_INTERVAL_SECS";

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// Unrecoverable configuration problems. The process cannot start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required environment variables are not set: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("{name} has invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            get(name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };
        let practicum_token = required(PRACTICUM_TOKEN);
        let telegram_token = required(TELEGRAM_TOKEN);
        let telegram_chat_id = required(TELEGRAM_CHAT_ID);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let retry_interval = match get(RETRY_INTERVAL_SECS) {
            None => DEFAULT_RETRY_INTERVAL,
            Some(value) => parse_interval(&value)?,
        };

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: get(PRACTICUM_ENDPOINT).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: get(TELEGRAM_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            retry_interval,
        })
    }
}

fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        name: RETRY_INTERVAL_SECS,
        value: value.to_string(),
        reason,
    };
    let secs: u64 = value.trim().parse().map_err(|_| invalid("not a whole number of seconds"))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
