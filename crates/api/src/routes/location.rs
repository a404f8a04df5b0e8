//! Route definitions for the `/locations` resource and its nested
//! weather/forecast sub-resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{forecast, location, weather};
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /                          -> list (paginated)
/// POST   /                          -> create
/// GET    /all                       -> list_all
/// GET    /search                    -> search (paginated)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (cascade)
/// GET    /{id}/weather              -> fetch_for_location
/// GET    /{id}/weather/history      -> history (paginated)
/// GET    /{id}/forecast             -> forecast fetch_for_location
/// GET    /{id}/forecast/stored      -> stored forecasts by date range
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(location::list).post(location::create))
        .route("/all", get(location::list_all))
        .route("/search", get(location::search))
        .route(
            "/{id}",
            get(location::get_by_id)
                .put(location::update)
                .delete(location::delete),
        )
        .route("/{id}/weather", get(weather::fetch_for_location))
        .route("/{id}/weather/history", get(weather::history))
        .route("/{id}/forecast", get(forecast::fetch_for_location))
        .route("/{id}/forecast/stored", get(forecast::stored))
}
