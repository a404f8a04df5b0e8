use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use nimbus_provider::WeatherClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: nimbus_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Resilient weather provider client; the only path to the provider.
    pub weather: Arc<WeatherClient>,
    /// Prometheus registry handle; `None` when no recorder is installed
    /// (e.g. in tests).
    pub metrics: Option<PrometheusHandle>,
}
