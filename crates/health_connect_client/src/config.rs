use crate::HealthDataError;
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:8765";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub bridge_token: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, HealthDataError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, HealthDataError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("HEALTH_CONNECT_BRIDGE_TOKEN").ok_or_else(|| {
            HealthDataError::Config("HEALTH_CONNECT_BRIDGE_TOKEN missing".into())
        })?;
        let base_url = get("HEALTH_CONNECT_BRIDGE_URL").unwrap_or_else(|| DEFAULT_BRIDGE_URL.into());
        let timeout_secs = match get("HEALTH_CONNECT_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                HealthDataError::Config(format!(
                    "HEALTH_CONNECT_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            bridge_token: SecretString::new(token.into()),
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
