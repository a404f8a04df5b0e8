//! Handlers for current-weather fetching and stored history.
//!
//! Fetch flow: validate -> resilient provider call -> map -> (optional)
//! persist -> outward DTO. With `persist=true` the location is created
//! implicitly from provider metadata when it does not exist yet.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use metrics::counter;
use nimbus_core::metric_names::METRIC_RECORDS_SAVED;
use nimbus_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use nimbus_core::types::{DbId, Timestamp};
use nimbus_core::validation::{validate_date_range, validate_location_query};
use nimbus_db::models::location::Location;
use nimbus_db::models::weather_record::WeatherDto;
use nimbus_db::repositories::{LocationRepo, WeatherRecordRepo};
use nimbus_provider::models::CurrentResponse;

use crate::error::{AppError, AppResult};
use crate::handlers::location::find_location;
use crate::mapping;
use crate::query::{HistoryParams, PersistParams, WeatherQueryParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/weather/current?q=&persist=
pub async fn fetch_current(
    State(state): State<AppState>,
    Query(params): Query<WeatherQueryParams>,
) -> AppResult<Json<WeatherDto>> {
    validate_location_query(&params.q)?;
    let response = state.weather.current_weather(params.q.trim()).await?;

    let dto = if params.persist {
        let location =
            LocationRepo::upsert(&state.pool, &mapping::location_from_api(&response.location))
                .await?;
        persist_snapshot(&state, &location, &response).await?
    } else {
        mapping::unsaved_weather_dto(&response)
            .ok_or_else(|| no_current_data(&params.q))?
    };
    Ok(Json(dto))
}

/// GET /api/v1/locations/{id}/weather?persist=
pub async fn fetch_for_location(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PersistParams>,
) -> AppResult<Json<WeatherDto>> {
    let location = find_location(&state, id).await?;
    let query = format!("{},{}", location.latitude, location.longitude);
    let response = state.weather.current_weather(&query).await?;

    let dto = if params.persist {
        persist_snapshot(&state, &location, &response).await?
    } else {
        mapping::unsaved_weather_dto(&response)
            .ok_or_else(|| no_current_data(&location.name))?
    };
    Ok(Json(dto))
}

/// GET /api/v1/locations/{id}/weather/history?limit=&offset=&from=&to=
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<Vec<WeatherDto>>>> {
    validate_date_range(params.from, params.to)?;
    let location = find_location(&state, id).await?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let records = WeatherRecordRepo::list_by_location(
        &state.pool,
        location.id,
        params.from.map(day_start),
        params.to.map(day_end_exclusive),
        limit,
        offset,
    )
    .await?;

    let dtos = records
        .iter()
        .map(|record| mapping::weather_dto_from_record(record, Some(&location)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: dtos }))
}

/// Map a snapshot into a record, insert it, and project the DTO.
async fn persist_snapshot(
    state: &AppState,
    location: &Location,
    response: &CurrentResponse,
) -> AppResult<WeatherDto> {
    let input = mapping::weather_record_from_response(location.id, response)
        .ok_or_else(|| no_current_data(&location.name))?;
    let record = WeatherRecordRepo::insert(&state.pool, &input).await?;
    counter!(METRIC_RECORDS_SAVED, "kind" => "weather").increment(1);
    tracing::info!(location_id = location.id, record_id = record.id, "Weather snapshot persisted");
    Ok(mapping::weather_dto_from_record(&record, Some(location))?)
}

fn no_current_data(query: &str) -> AppError {
    AppError::NoData(format!("no current conditions available for '{query}'"))
}

/// Inclusive start of a UTC day.
fn day_start(date: NaiveDate) -> Timestamp {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Exclusive end of a UTC day (start of the next one).
fn day_end_exclusive(date: NaiveDate) -> Timestamp {
    day_start(date + chrono::Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let start = day_start(date);
        let end = day_end_exclusive(date);
        assert_eq!((end - start).num_hours(), 24);
    }
}
