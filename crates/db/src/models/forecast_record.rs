//! Forecast record entity model and DTOs.

use chrono::NaiveDate;
use nimbus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `forecast_records` table, unique per
/// `(location_id, forecast_date)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ForecastRecord {
    pub id: DbId,
    pub location_id: DbId,
    pub forecast_date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub avg_temp_c: f64,
    pub max_wind_kph: f64,
    pub avg_humidity: f64,
    pub condition_text: String,
    pub total_precip_mm: f64,
    pub chance_of_rain: i32,
    pub uv_index: f64,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for upserting a forecast record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForecastRecord {
    pub location_id: DbId,
    pub forecast_date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub avg_temp_c: f64,
    pub max_wind_kph: f64,
    pub avg_humidity: f64,
    pub condition_text: String,
    pub total_precip_mm: f64,
    pub chance_of_rain: i32,
    pub uv_index: f64,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

/// Outward read-only projection of one forecast day.
///
/// `id` and `location_id` are `None` for fetches that were not
/// persisted; `location_name` is always resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<DbId>,
    pub location_name: String,
    pub forecast_date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub avg_temp_c: f64,
    pub max_wind_kph: f64,
    pub avg_humidity: f64,
    pub condition_text: String,
    pub total_precip_mm: f64,
    pub chance_of_rain: i32,
    pub uv_index: f64,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}
