//! Pure transformations between provider wire responses, persisted
//! records, and outward DTOs. No I/O, no hidden state.
//!
//! Two distinct "absent" cases flow through here and must never be
//! confused:
//! - A provider response without its `current`/`forecast` payload is a
//!   normal "no data" case and maps to `None`/empty.
//! - A persisted record surfaced without its location association is a
//!   broken contract and raises [`CoreError::InvalidState`].

use chrono::{NaiveDateTime, TimeZone, Utc};
use nimbus_core::error::CoreError;
use nimbus_core::types::{DbId, Timestamp};
use nimbus_db::models::forecast_record::{CreateForecastRecord, ForecastDto, ForecastRecord};
use nimbus_db::models::location::{CreateLocation, Location};
use nimbus_db::models::weather_record::{CreateWeatherRecord, WeatherDto, WeatherRecord};
use nimbus_provider::models::{
    ApiForecastDay, ApiLocation, CurrentResponse, ForecastResponse,
};

/// Fixed pattern for the provider's local-time strings.
const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Parse a provider local-time string.
///
/// On parse failure (or absence) the current instant is substituted and
/// a warning logged; the rest of the record still converts.
pub fn parse_provider_time(raw: Option<&str>) -> Timestamp {
    match raw {
        Some(s) => match NaiveDateTime::parse_from_str(s, PROVIDER_TIME_FORMAT) {
            Ok(naive) => Utc.from_utc_datetime(&naive),
            Err(err) => {
                tracing::warn!(raw = s, error = %err, "Unparseable provider timestamp, substituting current instant");
                Utc::now()
            }
        },
        None => Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Provider response -> record shape
// ---------------------------------------------------------------------------

/// Provider location metadata, as an implicit-creation input.
pub fn location_from_api(meta: &ApiLocation) -> CreateLocation {
    CreateLocation {
        name: meta.name.clone(),
        country: meta.country.clone(),
        region: meta.region.clone(),
        latitude: meta.lat,
        longitude: meta.lon,
    }
}

/// Convert a current-conditions response into an insertable record.
///
/// Returns `None` when the `current` payload is absent.
pub fn weather_record_from_response(
    location_id: DbId,
    response: &CurrentResponse,
) -> Option<CreateWeatherRecord> {
    let current = response.current.as_ref()?;
    Some(CreateWeatherRecord {
        location_id,
        temperature_c: current.temp_c,
        feels_like_c: current.feelslike_c,
        humidity: current.humidity,
        wind_kph: current.wind_kph,
        wind_dir: current.wind_dir.clone(),
        condition_text: current.condition.text.clone(),
        pressure_mb: current.pressure_mb,
        precip_mm: current.precip_mm,
        cloud_pct: current.cloud,
        uv_index: current.uv,
        observed_at: parse_provider_time(current.last_updated.as_deref()),
    })
}

/// Convert a forecast response into upsertable per-day records.
///
/// Returns an empty list when the `forecast` payload is absent.
pub fn forecast_records_from_response(
    location_id: DbId,
    response: &ForecastResponse,
) -> Vec<CreateForecastRecord> {
    response
        .forecast
        .as_ref()
        .map(|forecast| {
            forecast
                .forecastday
                .iter()
                .map(|day| forecast_record_from_day(location_id, day))
                .collect()
        })
        .unwrap_or_default()
}

/// Convert one forecast day. An absent astro sub-object yields `None`
/// sunrise/sunset rather than failing the day's conversion.
fn forecast_record_from_day(location_id: DbId, day: &ApiForecastDay) -> CreateForecastRecord {
    let astro = day.astro.as_ref();
    CreateForecastRecord {
        location_id,
        forecast_date: day.date,
        max_temp_c: day.day.maxtemp_c,
        min_temp_c: day.day.mintemp_c,
        avg_temp_c: day.day.avgtemp_c,
        max_wind_kph: day.day.maxwind_kph,
        avg_humidity: day.day.avghumidity,
        condition_text: day.day.condition.text.clone(),
        total_precip_mm: day.day.totalprecip_mm,
        chance_of_rain: day.day.daily_chance_of_rain,
        uv_index: day.day.uv,
        sunrise: astro.and_then(|a| a.sunrise.clone()),
        sunset: astro.and_then(|a| a.sunset.clone()),
    }
}

// ---------------------------------------------------------------------------
// Record -> outward DTO
// ---------------------------------------------------------------------------

/// Resolved display name: `"<name>, <country>"`.
fn location_display_name(name: &str, country: &str) -> String {
    format!("{name}, {country}")
}

/// Project a persisted weather record into its outward DTO.
///
/// The location association must be resolvable; its absence is a
/// contract violation, never converted into a partial DTO.
pub fn weather_dto_from_record(
    record: &WeatherRecord,
    location: Option<&Location>,
) -> Result<WeatherDto, CoreError> {
    let location = location.ok_or_else(|| {
        CoreError::InvalidState(format!(
            "weather record {} surfaced without a resolvable location association",
            record.id
        ))
    })?;
    Ok(WeatherDto {
        id: Some(record.id),
        location_id: Some(record.location_id),
        location_name: location_display_name(&location.name, &location.country),
        temperature_c: record.temperature_c,
        feels_like_c: record.feels_like_c,
        humidity: record.humidity,
        wind_kph: record.wind_kph,
        wind_dir: record.wind_dir.clone(),
        condition_text: record.condition_text.clone(),
        pressure_mb: record.pressure_mb,
        precip_mm: record.precip_mm,
        cloud_pct: record.cloud_pct,
        uv_index: record.uv_index,
        observed_at: record.observed_at,
    })
}

/// Project a persisted forecast record into its outward DTO.
///
/// Same contract as [`weather_dto_from_record`] for the location
/// association.
pub fn forecast_dto_from_record(
    record: &ForecastRecord,
    location: Option<&Location>,
) -> Result<ForecastDto, CoreError> {
    let location = location.ok_or_else(|| {
        CoreError::InvalidState(format!(
            "forecast record {} surfaced without a resolvable location association",
            record.id
        ))
    })?;
    Ok(ForecastDto {
        id: Some(record.id),
        location_id: Some(record.location_id),
        location_name: location_display_name(&location.name, &location.country),
        forecast_date: record.forecast_date,
        max_temp_c: record.max_temp_c,
        min_temp_c: record.min_temp_c,
        avg_temp_c: record.avg_temp_c,
        max_wind_kph: record.max_wind_kph,
        avg_humidity: record.avg_humidity,
        condition_text: record.condition_text.clone(),
        total_precip_mm: record.total_precip_mm,
        chance_of_rain: record.chance_of_rain,
        uv_index: record.uv_index,
        sunrise: record.sunrise.clone(),
        sunset: record.sunset.clone(),
    })
}

// ---------------------------------------------------------------------------
// Provider response -> unsaved DTO
// ---------------------------------------------------------------------------

/// Project a non-persisted current-conditions response straight into a
/// DTO, with `id`/`location_id` as absent markers.
///
/// Returns `None` when the `current` payload is absent.
pub fn unsaved_weather_dto(response: &CurrentResponse) -> Option<WeatherDto> {
    let current = response.current.as_ref()?;
    Some(WeatherDto {
        id: None,
        location_id: None,
        location_name: location_display_name(&response.location.name, &response.location.country),
        temperature_c: current.temp_c,
        feels_like_c: current.feelslike_c,
        humidity: current.humidity,
        wind_kph: current.wind_kph,
        wind_dir: current.wind_dir.clone(),
        condition_text: current.condition.text.clone(),
        pressure_mb: current.pressure_mb,
        precip_mm: current.precip_mm,
        cloud_pct: current.cloud,
        uv_index: current.uv,
        observed_at: parse_provider_time(current.last_updated.as_deref()),
    })
}

/// Project a non-persisted forecast response into per-day DTOs, with
/// `id`/`location_id` as absent markers.
///
/// Returns an empty list when the `forecast` payload is absent.
pub fn unsaved_forecast_dtos(response: &ForecastResponse) -> Vec<ForecastDto> {
    let name =
        location_display_name(&response.location.name, &response.location.country);
    response
        .forecast
        .as_ref()
        .map(|forecast| {
            forecast
                .forecastday
                .iter()
                .map(|day| {
                    let astro = day.astro.as_ref();
                    ForecastDto {
                        id: None,
                        location_id: None,
                        location_name: name.clone(),
                        forecast_date: day.date,
                        max_temp_c: day.day.maxtemp_c,
                        min_temp_c: day.day.mintemp_c,
                        avg_temp_c: day.day.avgtemp_c,
                        max_wind_kph: day.day.maxwind_kph,
                        avg_humidity: day.day.avghumidity,
                        condition_text: day.day.condition.text.clone(),
                        total_precip_mm: day.day.totalprecip_mm,
                        chance_of_rain: day.day.daily_chance_of_rain,
                        uv_index: day.day.uv,
                        sunrise: astro.and_then(|a| a.sunrise.clone()),
                        sunset: astro.and_then(|a| a.sunset.clone()),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_current_json() -> CurrentResponse {
        serde_json::from_value(serde_json::json!({
            "location": { "name": "London", "country": "United Kingdom", "lat": 51.52, "lon": -0.11 },
            "current": {
                "temp_c": 15.5,
                "feelslike_c": 14.0,
                "humidity": 72,
                "wind_kph": 13.0,
                "wind_dir": "SW",
                "condition": { "text": "Partly cloudy" },
                "pressure_mb": 1012.0,
                "precip_mm": 0.1,
                "cloud": 50,
                "uv": 4.0,
                "last_updated": "2024-06-01 14:30"
            }
        }))
        .unwrap()
    }

    fn sample_location() -> Location {
        Location {
            id: 7,
            name: "London".into(),
            country: "United Kingdom".into(),
            region: None,
            latitude: 51.52,
            longitude: -0.11,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_record() -> WeatherRecord {
        WeatherRecord {
            id: 42,
            location_id: 7,
            temperature_c: 15.5,
            feels_like_c: 14.0,
            humidity: 72,
            wind_kph: 13.0,
            wind_dir: "SW".into(),
            condition_text: "Partly cloudy".into(),
            pressure_mb: 1012.0,
            precip_mm: 0.1,
            cloud_pct: 50,
            uv_index: 4.0,
            observed_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn provider_response_maps_to_dto_fields() {
        let dto = unsaved_weather_dto(&sample_current_json()).unwrap();
        assert_eq!(dto.temperature_c, 15.5);
        assert_eq!(dto.condition_text, "Partly cloudy");
        assert_eq!(dto.location_name, "London, United Kingdom");
        assert!(dto.id.is_none());
        assert!(dto.location_id.is_none());
    }

    #[test]
    fn absent_current_payload_maps_to_none() {
        let response: CurrentResponse = serde_json::from_value(serde_json::json!({
            "location": { "name": "London", "country": "United Kingdom", "lat": 51.52, "lon": -0.11 }
        }))
        .unwrap();
        assert!(weather_record_from_response(1, &response).is_none());
        assert!(unsaved_weather_dto(&response).is_none());
    }

    #[test]
    fn absent_forecast_payload_maps_to_empty() {
        let response: ForecastResponse = serde_json::from_value(serde_json::json!({
            "location": { "name": "London", "country": "United Kingdom", "lat": 51.52, "lon": -0.11 }
        }))
        .unwrap();
        assert!(forecast_records_from_response(1, &response).is_empty());
        assert!(unsaved_forecast_dtos(&response).is_empty());
    }

    #[test]
    fn missing_location_association_is_a_consistency_error() {
        let err = weather_dto_from_record(&sample_record(), None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn resolved_association_projects_full_dto() {
        let location = sample_location();
        let dto = weather_dto_from_record(&sample_record(), Some(&location)).unwrap();
        assert_eq!(dto.id, Some(42));
        assert_eq!(dto.location_id, Some(7));
        assert_eq!(dto.location_name, "London, United Kingdom");
    }

    #[test]
    fn valid_provider_time_parses_exactly() {
        let parsed = parse_provider_time(Some("2024-06-01 14:30"));
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn unparseable_provider_time_substitutes_now() {
        let before = Utc::now();
        let parsed = parse_provider_time(Some("not a timestamp"));
        assert!(parsed >= before);
    }

    #[test]
    fn absent_astro_yields_null_sun_times() {
        let response: ForecastResponse = serde_json::from_value(serde_json::json!({
            "location": { "name": "London", "country": "United Kingdom", "lat": 51.52, "lon": -0.11 },
            "forecast": {
                "forecastday": [{
                    "date": "2024-06-01",
                    "day": {
                        "maxtemp_c": 18.0,
                        "mintemp_c": 9.0,
                        "avgtemp_c": 13.5,
                        "maxwind_kph": 22.0,
                        "avghumidity": 68.0,
                        "condition": { "text": "Sunny" },
                        "totalprecip_mm": 0.0,
                        "daily_chance_of_rain": 10,
                        "uv": 5.0
                    }
                }]
            }
        }))
        .unwrap();

        let records = forecast_records_from_response(3, &response);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].forecast_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(records[0].sunrise.is_none());
        assert!(records[0].sunset.is_none());
    }
}
