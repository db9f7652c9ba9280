use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openweather_api_key: String,
    /// Scheme and host of the provider, without a trailing slash.
    pub openweather_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Upper bound on a single provider request.
    pub weather_timeout: Duration,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process
    /// environment; tests pass a fixed map.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("missing required env var: {key}"))
        };
        let optional =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            openweather_api_key: required("OPENWEATHER_API_KEY")?,
            openweather_base_url: optional("OPENWEATHER_BASE_URL", DEFAULT_OPENWEATHER_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            weather_timeout: Duration::from_secs(
                parse_positive(&optional("WEATHER_TIMEOUT_SECS", "10"))
                    .context("WEATHER_TIMEOUT_SECS must be a positive integer")?,
            ),
            db_max_connections: u32::try_from(
                parse_positive(&optional("DB_MAX_CONNECTIONS", "10"))
                    .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            )
            .context("DB_MAX_CONNECTIONS is too large")?,
        })
    }
}

/// Parse a strictly positive integer; zero is rejected.
fn parse_positive(raw: &str) -> Result<u64> {
    let value: u64 = raw.trim().parse()?;
    anyhow::ensure!(value > 0, "value must be greater than zero, got {value}");
    Ok(value)
}
