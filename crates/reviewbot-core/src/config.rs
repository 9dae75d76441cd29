//! Process configuration, resolved once at startup from environment variables.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

const ENV_API_TOKEN: &str = "PRAKTIKUM_TOKEN";
const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
const ENV_ENDPOINT: &str = "REVIEWBOT_ENDPOINT";
const ENV_TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
const ENV_POLL_INTERVAL: &str = "REVIEWBOT_POLL_INTERVAL_SECS";
const ENV_RETRY_INTERVAL: &str = "REVIEWBOT_RETRY_INTERVAL_SECS";
const ENV_LOOKBACK: &str = "REVIEWBOT_LOOKBACK_SECS";
const ENV_HTTP_TIMEOUT: &str = "REVIEWBOT_HTTP_TIMEOUT_SECS";

const KNOWN_KEYS: [&str; 9] = [
    ENV_API_TOKEN,
    ENV_TELEGRAM_TOKEN,
    ENV_CHAT_ID,
    ENV_ENDPOINT,
    ENV_TELEGRAM_API_URL,
    ENV_POLL_INTERVAL,
    ENV_RETRY_INTERVAL,
    ENV_LOOKBACK,
    ENV_HTTP_TIMEOUT,
];

pub const DEFAULT_ENDPOINT: &str = "https://praktikum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 5;
const DEFAULT_LOOKBACK_SECS: u64 = 0;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Environment variable {0} is empty")]
    Empty(&'static str),

    #[error("Environment variable {key} has invalid value {value:?}: expected whole seconds")]
    InvalidSeconds { key: &'static str, value: String },

    #[error("Environment variable {0} must be greater than zero")]
    Zero(&'static str),
}

/// Immutable for the process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_token: String,
    pub telegram_token: String,
    pub chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub lookback: Duration,
    pub http_timeout: Duration,
}

impl Config {
    /// Loads from key/value pairs, typically `std::env::vars()`.
    pub fn load(
        env_vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<Self, ConfigError> {
        let env_vars: HashMap<String, String> = env_vars
            .into_iter()
            .map(|(key, val)| (key.into(), val.into()))
            .filter(|(key, _val)| KNOWN_KEYS.contains(&key.as_str()))
            .collect();

        let required = |key: &'static str| -> Result<String, ConfigError> {
            let value = env_vars.get(key).ok_or(ConfigError::Missing(key))?;
            let value = value.trim();
            if value.is_empty() {
                return Err(ConfigError::Empty(key));
            }
            Ok(value.to_string())
        };

        let optional = |key: &'static str, default: &str| -> String {
            env_vars
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let seconds = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match env_vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                None => Ok(Duration::from_secs(default)),
                Some(raw) => raw
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidSeconds {
                        key,
                        value: raw.to_string(),
                    }),
            }
        };

        Ok(Self {
            api_token: required(ENV_API_TOKEN)?,
            telegram_token: required(ENV_TELEGRAM_TOKEN)?,
            chat_id: required(ENV_CHAT_ID)?,
            endpoint: optional(ENV_ENDPOINT, DEFAULT_ENDPOINT),
            telegram_api_url: optional(ENV_TELEGRAM_API_URL, DEFAULT_TELEGRAM_API_URL),
            poll_interval: seconds(ENV_POLL_INTERVAL, DEFAULT_POLL_INTERVAL_SECS)?,
            retry_interval: seconds(ENV_RETRY_INTERVAL, DEFAULT_RETRY_INTERVAL_SECS)?,
            lookback: seconds(ENV_LOOKBACK, DEFAULT_LOOKBACK_SECS)?,
            http_timeout: non_zero(
                seconds(ENV_HTTP_TIMEOUT, DEFAULT_HTTP_TIMEOUT_SECS)?,
                ENV_HTTP_TIMEOUT,
            )?,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            api_token: "api-token".to_string(),
            telegram_token: "bot-token".to_string(),
            chat_id: "42".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
            lookback: Duration::ZERO,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

// A zero client timeout fails every request immediately.
fn non_zero(value: Duration, key: &'static str) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Zero(key));
    }
    Ok(value)
}

// Tokens are masked.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"***")
            .field("telegram_token", &"***")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_interval", &self.poll_interval)
            .field("retry_interval", &self.retry_interval)
            .field("lookback", &self.lookback)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
