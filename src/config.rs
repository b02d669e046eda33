//! Client configuration.
//!
//! Values come from the environment (a `.env` file is honoured) and can be
//! overridden per field from the command line.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the portal API, without trailing slash.
    pub api_url: String,
    /// Bearer token of the signed-in student.
    pub token: String,
    /// Upper bound on every HTTP request.
    pub timeout: Duration,
    pub log_filter: String,
    pub log_dir: PathBuf,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok(), overrides)
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F, overrides: Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = overrides
            .api_url
            .or_else(|| var("PORTAL_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "PORTAL_API_URL",
                reason: format!("expected an http(s) URL, got {api_url}"),
            });
        }

        let token = overrides
            .token
            .or_else(|| var("PORTAL_TOKEN"))
            .ok_or(ConfigError::Missing("PORTAL_TOKEN"))?;

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match var("PORTAL_TIMEOUT_SECS") {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "PORTAL_TIMEOUT_SECS",
                    reason: format!("{raw} is not a number of seconds"),
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "PORTAL_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let log_filter = var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let log_dir = overrides
            .log_dir
            .or_else(|| var("PORTAL_LOG_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            timeout: Duration::from_secs(timeout_secs),
            log_filter,
            log_dir,
        })
    }
}
