//! Handlers for the `/locations` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nimbus_core::error::CoreError;
use nimbus_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use nimbus_core::types::DbId;
use nimbus_core::validation::validate_location_query;
use nimbus_db::models::location::{CreateLocation, Location, LocationDto, UpdateLocation};
use nimbus_db::repositories::LocationRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::{PaginationParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/locations
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<LocationDto>)> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    let location = LocationRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(location.into())))
}

/// GET /api/v1/locations
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<LocationDto>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let locations = LocationRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse {
        data: locations.into_iter().map(LocationDto::from).collect(),
    }))
}

/// GET /api/v1/locations/all
pub async fn list_all(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LocationDto>>>> {
    let locations = LocationRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: locations.into_iter().map(LocationDto::from).collect(),
    }))
}

/// GET /api/v1/locations/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<LocationDto>>>> {
    validate_location_query(&params.q)?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let locations = LocationRepo::search(&state.pool, params.q.trim(), limit, offset).await?;
    Ok(Json(DataResponse {
        data: locations.into_iter().map(LocationDto::from).collect(),
    }))
}

/// GET /api/v1/locations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<LocationDto>> {
    let location = find_location(&state, id).await?;
    Ok(Json(location.into()))
}

/// PUT /api/v1/locations/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<Json<LocationDto>> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    let location = LocationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;
    Ok(Json(location.into()))
}

/// DELETE /api/v1/locations/{id}
///
/// Dependent weather/forecast records cascade.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = LocationRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))
    }
}

/// Fetch a location or fail with 404. Shared with the weather/forecast
/// handlers.
pub(crate) async fn find_location(state: &AppState, id: DbId) -> AppResult<Location> {
    LocationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))
}
