#[cfg(feature = "cli")]
pub mod cli;
pub mod manifest;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use manifest::Manifest;

use crate::utils::error::Result;
use crate::utils::validation::{validate_base_url, validate_min, Validate};
use std::time::Duration;

pub const BASE_URL_ENV: &str = "OLLAMA_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://ollama:11434";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Model builds can pull base layers, so creation gets a much longer budget.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(1800);

/// Where the model-serving host lives. Read-only once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub endpoint: ServiceEndpoint,
    pub poll_interval: Duration,
    pub max_attempts: u32,
    pub request_timeout: Duration,
    pub create_timeout: Duration,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            endpoint: ServiceEndpoint {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            create_timeout: DEFAULT_CREATE_TIMEOUT,
        }
    }
}

impl ProvisionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 從任意 key/value 來源解析設定，方便測試注入
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(BASE_URL_ENV)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.endpoint.base_url);

        Self {
            endpoint: ServiceEndpoint { base_url },
            poll_interval: parse_or(
                &lookup,
                "PROVISION_POLL_INTERVAL_MS",
                defaults.poll_interval,
                Duration::from_millis,
            ),
            max_attempts: parse_or(
                &lookup,
                "PROVISION_MAX_ATTEMPTS",
                defaults.max_attempts,
                |v: u32| v,
            ),
            request_timeout: parse_or(
                &lookup,
                "PROVISION_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout,
                Duration::from_secs,
            ),
            create_timeout: parse_or(
                &lookup,
                "PROVISION_CREATE_TIMEOUT_SECS",
                defaults.create_timeout,
                Duration::from_secs,
            ),
        }
    }
}

fn parse_or<F, T, R>(lookup: &F, key: &str, default: R, map: impl Fn(T) -> R) -> R
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => map(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring unparseable {}={:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}

impl Validate for ProvisionConfig {
    fn validate(&self) -> Result<()> {
        validate_base_url(BASE_URL_ENV, &self.endpoint.base_url)?;
        validate_min("PROVISION_MAX_ATTEMPTS", u64::from(self.max_attempts), 1)?;
        validate_min(
            "PROVISION_REQUEST_TIMEOUT_SECS",
            self.request_timeout.as_secs(),
            1,
        )?;
        validate_min(
            "PROVISION_CREATE_TIMEOUT_SECS",
            self.create_timeout.as_secs(),
            1,
        )?;

        tracing::debug!("✅ Provisioning configuration validation passed");
        Ok(())
    }
}
