//! Wire-format structs for the weather provider's JSON responses.
//!
//! Only the fields this service consumes are modelled; everything else
//! in the provider payload is ignored. The `current` and `forecast`
//! payloads are optional: an absent payload is a normal "no data" case
//! handled by the mapping layer, not a deserialization failure.

use chrono::NaiveDate;
use serde::Deserialize;

/// Location metadata echoed back by every provider endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiLocation {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Provider-local time, e.g. `2024-06-01 14:30`.
    #[serde(default)]
    pub localtime: Option<String>,
}

/// The free-text/coded condition sub-object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCondition {
    pub text: String,
}

/// Current conditions payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCurrent {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub humidity: i32,
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_dir: String,
    pub condition: ApiCondition,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    pub cloud: i32,
    pub uv: f64,
    /// Provider-local observation time, e.g. `2024-06-01 14:30`.
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Response shape of the current-conditions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    pub location: ApiLocation,
    #[serde(default)]
    pub current: Option<ApiCurrent>,
}

/// Daily aggregate payload within a forecast day.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDay {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub avgtemp_c: f64,
    pub maxwind_kph: f64,
    pub avghumidity: f64,
    pub condition: ApiCondition,
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub daily_chance_of_rain: i32,
    pub uv: f64,
}

/// Astronomical sub-object; may be absent entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiAstro {
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
}

/// One forecast day.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiForecastDay {
    pub date: NaiveDate,
    pub day: ApiDay,
    #[serde(default)]
    pub astro: Option<ApiAstro>,
}

/// Forecast payload wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiForecast {
    pub forecastday: Vec<ApiForecastDay>,
}

/// Response shape of the forecast endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub location: ApiLocation,
    #[serde(default)]
    pub forecast: Option<ApiForecast>,
}
