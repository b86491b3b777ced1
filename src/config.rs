//! Runtime settings read from `OPENWALL_*` environment variables.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_CACHE_TTL: u64 = 120; // 2 minutes for lists and articles
const DEFAULT_DICTIONARY_TTL: u64 = 600; // dictionary rarely changes
const DEFAULT_REQUEST_TIMEOUT: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got '{value}'")]
    InvalidSeconds { name: String, value: String },

    #[error("{name} must be greater than zero")]
    Zero { name: String },

    #[error("{name} must not be empty")]
    Empty { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub cache_ttl: Duration,
    pub dictionary_ttl: Duration,
    pub request_timeout: Duration,
    /// `None` leaves expired entries to be reaped on read.
    pub sweep_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL),
            dictionary_ttl: Duration::from_secs(DEFAULT_DICTIONARY_TTL),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
            sweep_interval: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source, falling back to defaults
    /// for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("OPENWALL_API_URL") {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if url.is_empty() {
                    return Err(ConfigError::Empty {
                        name: "OPENWALL_API_URL".to_string(),
                    });
                }
                url
            }
            None => DEFAULT_API_URL.to_string(),
        };

        let request_timeout = seconds(&lookup, "OPENWALL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT)?;
        if request_timeout.is_zero() {
            return Err(ConfigError::Zero {
                name: "OPENWALL_REQUEST_TIMEOUT_SECS".to_string(),
            });
        }

        let sweep = seconds(&lookup, "OPENWALL_SWEEP_INTERVAL_SECS", 0)?;

        Ok(Self {
            api_url,
            cache_ttl: seconds(&lookup, "OPENWALL_CACHE_TTL_SECS", DEFAULT_CACHE_TTL)?,
            dictionary_ttl: seconds(&lookup, "OPENWALL_DICTIONARY_TTL_SECS", DEFAULT_DICTIONARY_TTL)?,
            request_timeout,
            sweep_interval: (!sweep.is_zero()).then_some(sweep),
        })
    }
}

fn seconds<F>(lookup: &F, name: &str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidSeconds {
                name: name.to_string(),
                value: raw,
            }),
    }
}
