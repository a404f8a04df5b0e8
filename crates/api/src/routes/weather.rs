//! Route definitions for free-text weather fetching.

use axum::routing::get;
use axum::Router;

use crate::handlers::{forecast, weather};
use crate::state::AppState;

/// Routes mounted at `/weather`.
///
/// ```text
/// GET /current    -> fetch_current   (?q=&persist=)
/// GET /forecast   -> fetch_by_query  (?q=&days=&persist=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/current", get(weather::fetch_current))
        .route("/forecast", get(forecast::fetch_by_query))
}
