use std::net::SocketAddr;
use std::time::Duration;

use readiness_registry::ValueParsing;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub value_parsing: ValueParsing,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            value_parsing: ValueParsing::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` instead of the process environment,
    /// so tests can feed values without touching global state.
    ///
    /// `READINESS_ADDRESS` takes precedence over `PORT`.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = non_empty(get("READINESS_ADDRESS")) {
            cfg.addr = raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                var: "READINESS_ADDRESS",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        } else if let Some(raw) = non_empty(get("PORT")) {
            let port = raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            cfg.addr.set_port(port);
        }

        if let Some(raw) = non_empty(get("READINESS_VALUE_PARSING")) {
            cfg.value_parsing = raw.parse::<ValueParsing>().map_err(|e| ConfigError::Invalid {
                var: "READINESS_VALUE_PARSING",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Some(raw) = non_empty(get("READINESS_REQUEST_TIMEOUT_SECS")) {
            let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "READINESS_REQUEST_TIMEOUT_SECS",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "READINESS_REQUEST_TIMEOUT_SECS",
                    value: raw,
                    reason: "must be greater than zero".into(),
                });
            }
            cfg.request_timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }
}

/// Log filter directive: `READINESS_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn log_filter_with<F>(mut get: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    non_empty(get("READINESS_LOG_LEVEL"))
        .or_else(|| non_empty(get("RUST_LOG")))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

pub fn log_filter() -> String {
    log_filter_with(|k| std::env::var(k).ok())
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
