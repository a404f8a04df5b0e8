//! Repository for the `forecast_records` table.

use chrono::NaiveDate;
use nimbus_core::types::DbId;
use sqlx::PgPool;

use crate::models::forecast_record::{CreateForecastRecord, ForecastRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, location_id, forecast_date, max_temp_c, min_temp_c, avg_temp_c, \
    max_wind_kph, avg_humidity, condition_text, total_precip_mm, chance_of_rain, uv_index, \
    sunrise, sunset, created_at, updated_at";

/// Provides upsert/query/purge operations for daily forecasts.
pub struct ForecastRecordRepo;

impl ForecastRecordRepo {
    /// Insert or refresh the forecast for `(location_id, forecast_date)`,
    /// returning the stored row.
    pub async fn upsert(
        pool: &PgPool,
        input: &CreateForecastRecord,
    ) -> Result<ForecastRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO forecast_records
                (location_id, forecast_date, max_temp_c, min_temp_c, avg_temp_c, max_wind_kph,
                 avg_humidity, condition_text, total_precip_mm, chance_of_rain, uv_index,
                 sunrise, sunset)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             ON CONFLICT ON CONSTRAINT uq_forecast_records_location_date DO UPDATE SET
                max_temp_c = EXCLUDED.max_temp_c,
                min_temp_c = EXCLUDED.min_temp_c,
                avg_temp_c = EXCLUDED.avg_temp_c,
                max_wind_kph = EXCLUDED.max_wind_kph,
                avg_humidity = EXCLUDED.avg_humidity,
                condition_text = EXCLUDED.condition_text,
                total_precip_mm = EXCLUDED.total_precip_mm,
                chance_of_rain = EXCLUDED.chance_of_rain,
                uv_index = EXCLUDED.uv_index,
                sunrise = EXCLUDED.sunrise,
                sunset = EXCLUDED.sunset,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ForecastRecord>(&query)
            .bind(input.location_id)
            .bind(input.forecast_date)
            .bind(input.max_temp_c)
            .bind(input.min_temp_c)
            .bind(input.avg_temp_c)
            .bind(input.max_wind_kph)
            .bind(input.avg_humidity)
            .bind(&input.condition_text)
            .bind(input.total_precip_mm)
            .bind(input.chance_of_rain)
            .bind(input.uv_index)
            .bind(&input.sunrise)
            .bind(&input.sunset)
            .fetch_one(pool)
            .await
    }

    /// List stored forecasts for one location ordered by forecast date,
    /// with optional inclusive date bounds.
    pub async fn list_by_location(
        pool: &PgPool,
        location_id: DbId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ForecastRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forecast_records
             WHERE location_id = $1
               AND ($2::date IS NULL OR forecast_date >= $2)
               AND ($3::date IS NULL OR forecast_date <= $3)
             ORDER BY forecast_date ASC"
        );
        sqlx::query_as::<_, ForecastRecord>(&query)
            .bind(location_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Delete forecasts dated before `cutoff`. Returns the number of
    /// rows removed. Used by the date-based retention sweep.
    pub async fn purge_dated_before(pool: &PgPool, cutoff: NaiveDate) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forecast_records WHERE forecast_date < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
