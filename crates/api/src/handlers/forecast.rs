//! Handlers for forecast fetching and stored forecast queries.
//!
//! Day counts are validated inside the provider client, before any
//! network attempt; persisted days are upserts keyed on
//! `(location, forecast_date)`.

use axum::extract::{Path, Query, State};
use axum::Json;
use metrics::counter;
use nimbus_core::metric_names::METRIC_RECORDS_SAVED;
use nimbus_core::types::DbId;
use nimbus_core::validation::{validate_date_range, validate_location_query};
use nimbus_db::models::forecast_record::ForecastDto;
use nimbus_db::models::location::Location;
use nimbus_db::repositories::{ForecastRecordRepo, LocationRepo};
use nimbus_provider::models::ForecastResponse;

use crate::error::AppResult;
use crate::handlers::location::find_location;
use crate::mapping;
use crate::query::{DateRangeParams, ForecastFetchParams, ForecastQueryParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Day count used when the caller does not specify one.
const DEFAULT_FORECAST_DAYS: u8 = 3;

/// GET /api/v1/weather/forecast?q=&days=&persist=
pub async fn fetch_by_query(
    State(state): State<AppState>,
    Query(params): Query<ForecastQueryParams>,
) -> AppResult<Json<DataResponse<Vec<ForecastDto>>>> {
    validate_location_query(&params.q)?;
    let days = params.days.unwrap_or(DEFAULT_FORECAST_DAYS);
    let response = state.weather.forecast(params.q.trim(), days).await?;

    let dtos = if params.persist {
        let location =
            LocationRepo::upsert(&state.pool, &mapping::location_from_api(&response.location))
                .await?;
        persist_days(&state, &location, &response).await?
    } else {
        mapping::unsaved_forecast_dtos(&response)
    };
    Ok(Json(DataResponse { data: dtos }))
}

/// GET /api/v1/locations/{id}/forecast?days=&persist=
pub async fn fetch_for_location(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ForecastFetchParams>,
) -> AppResult<Json<DataResponse<Vec<ForecastDto>>>> {
    let location = find_location(&state, id).await?;
    let days = params.days.unwrap_or(DEFAULT_FORECAST_DAYS);
    let query = format!("{},{}", location.latitude, location.longitude);
    let response = state.weather.forecast(&query, days).await?;

    let dtos = if params.persist {
        persist_days(&state, &location, &response).await?
    } else {
        mapping::unsaved_forecast_dtos(&response)
    };
    Ok(Json(DataResponse { data: dtos }))
}

/// GET /api/v1/locations/{id}/forecast/stored?from=&to=
pub async fn stored(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<ForecastDto>>>> {
    validate_date_range(params.from, params.to)?;
    let location = find_location(&state, id).await?;

    let records =
        ForecastRecordRepo::list_by_location(&state.pool, location.id, params.from, params.to)
            .await?;
    let dtos = records
        .iter()
        .map(|record| mapping::forecast_dto_from_record(record, Some(&location)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: dtos }))
}

/// Upsert every returned day and project the stored rows.
async fn persist_days(
    state: &AppState,
    location: &Location,
    response: &ForecastResponse,
) -> AppResult<Vec<ForecastDto>> {
    let inputs = mapping::forecast_records_from_response(location.id, response);
    let mut dtos = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let record = ForecastRecordRepo::upsert(&state.pool, input).await?;
        counter!(METRIC_RECORDS_SAVED, "kind" => "forecast").increment(1);
        dtos.push(mapping::forecast_dto_from_record(&record, Some(location))?);
    }
    if !dtos.is_empty() {
        tracing::info!(
            location_id = location.id,
            days = dtos.len(),
            "Forecast days persisted"
        );
    }
    Ok(dtos)
}
