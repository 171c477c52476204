//! Client configuration resolved at build time.
//!
//! The browser has no process environment, so values are captured with
//! `option_env!` when the WASM bundle is compiled. Parsing is split out into
//! [`ClientConfig::from_lookup`] so it can be exercised without rebuilding.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use log::LevelFilter;

use crate::error::ConfigError;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;
pub const DEFAULT_VALIDATE_TIMEOUT_MS: u32 = 8_000;
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "authToken";

const ENV_API_BASE_URL: &str = "ESTATE_API_BASE_URL";
const ENV_REQUEST_TIMEOUT_MS: &str = "ESTATE_REQUEST_TIMEOUT_MS";
const ENV_VALIDATE_TIMEOUT_MS: &str = "ESTATE_VALIDATE_TIMEOUT_MS";
const ENV_TOKEN_KEY: &str = "ESTATE_TOKEN_KEY";
const ENV_LOG_LEVEL: &str = "ESTATE_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for relative API paths. Empty means same-origin.
    pub api_base_url: String,
    /// Upper bound for any single backend call.
    pub request_timeout_ms: u32,
    /// Upper bound for the startup token validation call.
    pub validate_timeout_ms: u32,
    /// `localStorage` key holding the bearer token.
    pub token_storage_key: String,
    pub log_level: LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            validate_timeout_ms: DEFAULT_VALIDATE_TIMEOUT_MS,
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_owned(),
            log_level: LevelFilter::Info,
        }
    }
}

impl ClientConfig {
    /// Build config from variables captured when the crate was compiled.
    ///
    /// Optional:
    /// - `ESTATE_API_BASE_URL`: default same-origin
    /// - `ESTATE_REQUEST_TIMEOUT_MS`: default 15000
    /// - `ESTATE_VALIDATE_TIMEOUT_MS`: default 8000
    /// - `ESTATE_TOKEN_KEY`: default `authToken`
    /// - `ESTATE_LOG_LEVEL`: `off`, `error`, `warn`, `info` (default), `debug`, `trace`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but malformed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                ENV_API_BASE_URL => option_env!("ESTATE_API_BASE_URL"),
                ENV_REQUEST_TIMEOUT_MS => option_env!("ESTATE_REQUEST_TIMEOUT_MS"),
                ENV_VALIDATE_TIMEOUT_MS => option_env!("ESTATE_VALIDATE_TIMEOUT_MS"),
                ENV_TOKEN_KEY => option_env!("ESTATE_TOKEN_KEY"),
                ENV_LOG_LEVEL => option_env!("ESTATE_LOG_LEVEL"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_base_url = get(ENV_API_BASE_URL)
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or(defaults.api_base_url);
        let request_timeout_ms = match get(ENV_REQUEST_TIMEOUT_MS) {
            Some(raw) => parse_timeout(ENV_REQUEST_TIMEOUT_MS, &raw)?,
            None => defaults.request_timeout_ms,
        };
        let validate_timeout_ms = match get(ENV_VALIDATE_TIMEOUT_MS) {
            Some(raw) => parse_timeout(ENV_VALIDATE_TIMEOUT_MS, &raw)?,
            None => defaults.validate_timeout_ms,
        };
        let token_storage_key = get(ENV_TOKEN_KEY).unwrap_or(defaults.token_storage_key);
        let log_level = match get(ENV_LOG_LEVEL) {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel(raw.clone()))?,
            None => defaults.log_level,
        };

        Ok(Self { api_base_url, request_timeout_ms, validate_timeout_ms, token_storage_key, log_level })
    }

    /// Resolve a request target against the API base. Absolute URLs pass through.
    #[must_use]
    pub fn resolve_url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") || self.api_base_url.is_empty() {
            return target.to_owned();
        }
        if target.starts_with('/') {
            format!("{}{target}", self.api_base_url)
        } else {
            format!("{}/{target}", self.api_base_url)
        }
    }
}

fn parse_timeout(var: &'static str, raw: &str) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(ConfigError::InvalidTimeout { var, value: raw.to_owned() }),
    }
}
