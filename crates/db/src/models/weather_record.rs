//! Weather record entity model and DTOs.

use nimbus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `weather_records` table. Immutable after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeatherRecord {
    pub id: DbId,
    pub location_id: DbId,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: i32,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub condition_text: String,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub cloud_pct: i32,
    pub uv_index: f64,
    pub observed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new weather record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWeatherRecord {
    pub location_id: DbId,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: i32,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub condition_text: String,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub cloud_pct: i32,
    pub uv_index: f64,
    pub observed_at: Timestamp,
}

/// Outward read-only projection of a weather snapshot.
///
/// `id` and `location_id` are `None` for fetches that were not
/// persisted; `location_name` is always resolved.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<DbId>,
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: i32,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub condition_text: String,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub cloud_pct: i32,
    pub uv_index: f64,
    pub observed_at: Timestamp,
}
