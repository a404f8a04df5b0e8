use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nimbus_api::background::refresh::RefreshSweep;
use nimbus_api::background::retention::RetentionSweep;
use nimbus_api::config::ServerConfig;
use nimbus_api::router::build_app_router;
use nimbus_api::state::AppState;
use nimbus_provider::WeatherClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimbus_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = nimbus_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    nimbus_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    nimbus_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Metrics recorder ---
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    tracing::info!("Prometheus metrics recorder installed");

    // --- Weather provider client ---
    let weather = Arc::new(WeatherClient::new(config.weather_client_config()));
    tracing::info!(base_url = %config.weather.base_url, "Weather provider client created");

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        weather: Arc::clone(&weather),
        metrics: Some(metrics_handle),
    };

    // --- Background tasks ---
    let background_cancel = tokio_util::sync::CancellationToken::new();
    let mut background_handles = Vec::new();

    if config.refresh.enabled {
        let sweep = RefreshSweep::new(
            pool.clone(),
            Arc::clone(&weather),
            Duration::from_secs(config.refresh.interval_secs),
            config.refresh.chunk_size,
        );
        background_handles.push(tokio::spawn(sweep.run(background_cancel.child_token())));
        tracing::info!(
            interval_secs = config.refresh.interval_secs,
            chunk_size = config.refresh.chunk_size,
            "Refresh sweep started"
        );
    }

    if config.retention.enabled {
        let sweep = RetentionSweep::new(pool.clone(), config.retention.clone());
        background_handles.push(tokio::spawn(sweep.run(background_cancel.child_token())));
        tracing::info!(
            interval_secs = config.retention.interval_secs,
            "Retention sweep started"
        );
    }

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    background_cancel.cancel();
    for handle in background_handles {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Background tasks stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
