//! Route definitions.
//!
//! [`api_routes`] assembles everything mounted under `/api/v1`; health
//! and metrics are mounted at the root by the router builder.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod location;
pub mod metrics;
pub mod weather;

/// All versioned API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/locations", location::router())
        .nest("/weather", weather::router())
}
