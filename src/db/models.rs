use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One stored reading as read back for the history view.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct HistoricalRecord {
    /// Insert time assigned by the database.
    #[sqlx(rename = "recorded_at")]
    pub date: DateTime<Utc>,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
    /// Metres per second
    pub wind_speed: Option<f64>,
}
