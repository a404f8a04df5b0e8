//! Retention sweeps: age-based purge of weather snapshots and
//! date-based purge of stale forecast rows.

use std::time::Duration;

use chrono::Utc;
use nimbus_db::repositories::{ForecastRecordRepo, WeatherRecordRepo};
use nimbus_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::config::RetentionSettings;

/// Periodically deletes records past their retention horizon.
pub struct RetentionSweep {
    pool: DbPool,
    settings: RetentionSettings,
}

impl RetentionSweep {
    pub fn new(pool: DbPool, settings: RetentionSettings) -> Self {
        Self { pool, settings }
    }

    /// Run sweeps until cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(Duration::from_secs(self.settings.interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Retention sweep stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep_once().await {
                        tracing::error!(error = %err, "Retention sweep failed");
                    }
                }
            }
        }
    }

    /// One purge pass. Returns `(weather_purged, forecast_purged)`.
    pub async fn sweep_once(&self) -> Result<(u64, u64), sqlx::Error> {
        let weather_cutoff = Utc::now() - chrono::Duration::days(self.settings.weather_max_age_days);
        let weather_purged =
            WeatherRecordRepo::purge_observed_before(&self.pool, weather_cutoff).await?;

        let forecast_cutoff =
            Utc::now().date_naive() - chrono::Duration::days(self.settings.forecast_max_age_days);
        let forecast_purged =
            ForecastRecordRepo::purge_dated_before(&self.pool, forecast_cutoff).await?;

        tracing::info!(weather_purged, forecast_purged, "Retention sweep complete");
        Ok((weather_purged, forecast_purged))
    }
}
