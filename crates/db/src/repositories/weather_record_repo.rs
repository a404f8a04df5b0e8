//! Repository for the `weather_records` table.

use nimbus_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::weather_record::{CreateWeatherRecord, WeatherRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, location_id, temperature_c, feels_like_c, humidity, wind_kph, \
    wind_dir, condition_text, pressure_mb, precip_mm, cloud_pct, uv_index, observed_at, \
    created_at, updated_at";

/// Provides insert/query/purge operations for weather snapshots.
/// Rows are immutable after insert.
pub struct WeatherRecordRepo;

impl WeatherRecordRepo {
    /// Insert a new weather record, returning the created row.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateWeatherRecord,
    ) -> Result<WeatherRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO weather_records
                (location_id, temperature_c, feels_like_c, humidity, wind_kph, wind_dir,
                 condition_text, pressure_mb, precip_mm, cloud_pct, uv_index, observed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeatherRecord>(&query)
            .bind(input.location_id)
            .bind(input.temperature_c)
            .bind(input.feels_like_c)
            .bind(input.humidity)
            .bind(input.wind_kph)
            .bind(&input.wind_dir)
            .bind(&input.condition_text)
            .bind(input.pressure_mb)
            .bind(input.precip_mm)
            .bind(input.cloud_pct)
            .bind(input.uv_index)
            .bind(input.observed_at)
            .fetch_one(pool)
            .await
    }

    /// List records for one location, newest first, with optional
    /// observation-time bounds and limit/offset pagination.
    ///
    /// `from` is inclusive, `to` is exclusive; `None` leaves that side
    /// unbounded.
    pub async fn list_by_location(
        pool: &PgPool,
        location_id: DbId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WeatherRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weather_records
             WHERE location_id = $1
               AND ($2::timestamptz IS NULL OR observed_at >= $2)
               AND ($3::timestamptz IS NULL OR observed_at < $3)
             ORDER BY observed_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, WeatherRecord>(&query)
            .bind(location_id)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete records observed before `cutoff`. Returns the number of
    /// rows removed. Used by the age-based retention sweep.
    pub async fn purge_observed_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM weather_records WHERE observed_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
