use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    db::store::WeatherStore,
    render::{self, CurrentPanels, HistoryPanels},
    weather::WeatherClient,
};

pub const SAVED_MESSAGE: &str = "Weather data saved successfully!";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("city must not be empty")]
pub struct InvalidCity;

/// Terminal state of one dashboard action.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardOutcome {
    /// The provider returned nothing usable. Nothing was written.
    ProviderUnavailable { city: String, message: String },
    /// The reading was fetched but could not be stored; history not queried.
    StoreWriteFailed { current: CurrentPanels, message: String },
    HistoryLoaded { current: CurrentPanels, history: HistoryPanels },
    /// Saved, but the history query returned zero rows.
    HistoryEmpty { current: CurrentPanels, message: String },
    /// Saved, but the history query itself failed.
    HistoryFailed { current: CurrentPanels, message: String },
}

impl DashboardOutcome {
    /// Whether the reading from this action was persisted.
    pub fn saved(&self) -> bool {
        matches!(
            self,
            Self::HistoryLoaded { .. } | Self::HistoryEmpty { .. } | Self::HistoryFailed { .. }
        )
    }
}

/// Runs one user action end to end: fetch, persist, render current
/// conditions, load history, render history.
#[derive(Debug, Clone)]
pub struct DashboardService {
    weather: WeatherClient,
    store: WeatherStore,
}

impl DashboardService {
    pub fn new(weather: WeatherClient, store: WeatherStore) -> Self {
        Self { weather, store }
    }

    /// Every failure after input validation is folded into the returned
    /// outcome; only an empty city is an `Err`.
    pub async fn run(
        &self,
        city: &str,
        region: Option<&str>,
    ) -> Result<DashboardOutcome, InvalidCity> {
        if city.trim().is_empty() {
            return Err(InvalidCity);
        }

        info!(city = %city, region = ?region, "Fetching weather for dashboard");
        let reading = match self.weather.fetch(city, region).await {
            Ok(reading) => reading,
            Err(e) => {
                warn!(city = %city, error = %e, "Weather provider unavailable");
                return Ok(DashboardOutcome::ProviderUnavailable {
                    city: city.to_owned(),
                    message: format!("Could not retrieve weather data for {city}."),
                });
            }
        };

        let current = render::render_current(&reading);

        if let Err(e) = self.store.save(&reading).await {
            error!(city = %city, error = %e, "Failed to save weather reading");
            return Ok(DashboardOutcome::StoreWriteFailed {
                current,
                message: format!("Database Error: {e}"),
            });
        }

        let outcome = match self.store.history(city).await {
            Ok(records) if records.is_empty() => DashboardOutcome::HistoryEmpty {
                current,
                message: format!("No historical data found for {city}. Fetch weather first!"),
            },
            Ok(records) => {
                info!(city = %city, rows = records.len(), "Dashboard history rendered");
                DashboardOutcome::HistoryLoaded {
                    current,
                    history: render::render_history(city, &records),
                }
            }
            Err(e) => {
                error!(city = %city, error = %e, "Failed to load weather history");
                DashboardOutcome::HistoryFailed {
                    current,
                    message: format!("Database Error: {e}"),
                }
            }
        };

        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
