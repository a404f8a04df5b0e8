//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use chrono::NaiveDate;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped via `nimbus_core::pagination` before reaching the
/// repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for location search (`?q=&limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Free-text weather fetch (`?q=&persist=`).
#[derive(Debug, Deserialize)]
pub struct WeatherQueryParams {
    pub q: String,
    #[serde(default)]
    pub persist: bool,
}

/// Weather fetch for a stored location (`?persist=`).
#[derive(Debug, Deserialize)]
pub struct PersistParams {
    #[serde(default)]
    pub persist: bool,
}

/// Free-text forecast fetch (`?q=&days=&persist=`).
#[derive(Debug, Deserialize)]
pub struct ForecastQueryParams {
    pub q: String,
    pub days: Option<u8>,
    #[serde(default)]
    pub persist: bool,
}

/// Forecast fetch for a stored location (`?days=&persist=`).
#[derive(Debug, Deserialize)]
pub struct ForecastFetchParams {
    pub days: Option<u8>,
    #[serde(default)]
    pub persist: bool,
}

/// Paginated history query with an optional UTC date range
/// (`?limit=&offset=&from=&to=`).
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Stored-forecast query with an optional inclusive date range.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
