use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use super::models::HistoricalRecord;
use crate::weather::models::WeatherReading;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not acquire a database connection: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),
}

/// Append-only persistence of weather readings in the `weather_data` table.
///
/// Every call acquires its own pooled connection; the guard is dropped, and
/// the connection returned to the pool, on every exit path.
#[derive(Debug, Clone)]
pub struct WeatherStore {
    pool: PgPool,
}

impl WeatherStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one row for `reading`. No deduplication: two saves of the same
    /// reading produce two rows.
    pub async fn save(&self, reading: &WeatherReading) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Connection)?;

        sqlx::query(
            r#"
            INSERT INTO weather_data
                (city, temperature, humidity, wind_speed, pressure, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&reading.city)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.wind_speed)
        .bind(reading.pressure)
        .bind(reading.latitude)
        .bind(reading.longitude)
        .execute(&mut *conn)
        .await
        .map_err(StoreError::Query)?;

        debug!(city = %reading.city, "Weather reading persisted");
        Ok(())
    }

    /// All rows for exactly `city`, oldest first. An unknown city yields an
    /// empty `Vec`, not an error.
    pub async fn history(&self, city: &str) -> Result<Vec<HistoricalRecord>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Connection)?;

        let rows = sqlx::query_as::<_, HistoricalRecord>(
            r#"
            SELECT recorded_at, temperature, humidity, wind_speed
            FROM weather_data
            WHERE city = $1
            ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(city)
        .fetch_all(&mut *conn)
        .await
        .map_err(StoreError::Query)?;

        debug!(city = %city, rows = rows.len(), "Weather history loaded");
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
