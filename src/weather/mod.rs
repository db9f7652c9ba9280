pub mod models;

use std::sync::Arc;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

use self::models::{CurrentWeatherResponse, ErrorBody, WeatherReading};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("city must not be empty")]
    EmptyCity,

    #[error("invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("weather provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather provider returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode weather provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("weather provider returned no data for {0:?}")]
    EmptyResult(String),
}

impl ProviderError {
    /// Failures worth one more attempt: the request never completed, or the
    /// provider reported an overload.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Request(e) => e.is_timeout() || e.is_connect(),
            ProviderError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Client for the OpenWeatherMap current-weather endpoint.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(config.weather_timeout).build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: config.openweather_base_url.clone(),
                api_key: config.openweather_api_key.clone(),
            }),
        })
    }

    /// Fetch current conditions for `city`, optionally narrowed by `region`
    /// (state, province or country code).
    ///
    /// A transient failure is retried once. Any error means "no data": the
    /// caller must not persist or display anything for this request.
    pub async fn fetch(
        &self,
        city: &str,
        region: Option<&str>,
    ) -> Result<WeatherReading, ProviderError> {
        if city.trim().is_empty() {
            return Err(ProviderError::EmptyCity);
        }
        let url = self.current_weather_url(city, region)?;

        let body = match self.get(&url).await {
            Err(e) if e.is_transient() => {
                warn!(city = %city, error = %e, "Weather provider request failed; retrying once");
                self.get(&url).await?
            }
            other => other?,
        };

        let reading = serde_json::from_slice::<CurrentWeatherResponse>(&body)?.into_reading(city);
        if reading.is_empty() {
            return Err(ProviderError::EmptyResult(city.to_owned()));
        }

        debug!(city = %city, reading = ?reading, "Weather reading received");
        Ok(reading)
    }

    fn current_weather_url(&self, city: &str, region: Option<&str>) -> Result<Url, ProviderError> {
        let location = match region.map(str::trim).filter(|r| !r.is_empty()) {
            Some(region) => format!("{},{}", city.trim(), region),
            None => city.trim().to_owned(),
        };

        Url::parse_with_params(
            &format!("{}{}", self.inner.base_url, CURRENT_WEATHER_PATH),
            &[
                ("q", location.as_str()),
                ("appid", self.inner.api_key.as_str()),
                ("units", "metric"),
            ],
        )
        .map_err(|e| ProviderError::InvalidUrl(e.to_string()))
    }

    async fn get(&self, url: &Url) -> Result<Vec<u8>, ProviderError> {
        // The query string carries the API key: only the path is logged, and
        // transport errors are stripped of their URL.
        debug!(path = %url.path(), "Requesting current weather");

        let resp = self
            .inner
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.without_url()))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::Request(e.without_url()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ProviderError::Status { status, message });
        }

        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
