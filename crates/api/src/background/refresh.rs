//! Scheduled refresh of current weather across all stored locations.
//!
//! Each sweep lists every location and fans out per-location fetches
//! through the chunked batch aggregator. A failed location resolves to
//! an absent result and is counted; it never aborts its siblings or
//! the sweep.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use nimbus_core::batch::process_in_chunks;
use nimbus_core::metric_names::METRIC_RECORDS_SAVED;
use nimbus_core::types::DbId;
use nimbus_db::models::location::Location;
use nimbus_db::repositories::{LocationRepo, WeatherRecordRepo};
use nimbus_db::DbPool;
use nimbus_provider::WeatherClient;
use tokio_util::sync::CancellationToken;

use crate::mapping;

/// Periodically refreshes current weather for every stored location.
pub struct RefreshSweep {
    pool: DbPool,
    weather: Arc<WeatherClient>,
    interval: Duration,
    chunk_size: usize,
}

impl RefreshSweep {
    pub fn new(
        pool: DbPool,
        weather: Arc<WeatherClient>,
        interval: Duration,
        chunk_size: usize,
    ) -> Self {
        Self {
            pool,
            weather,
            interval,
            chunk_size,
        }
    }

    /// Run sweeps until cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // An interval's first tick completes immediately; consume it so
        // the first sweep happens one full period after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Refresh sweep stopped");
                    return;
                }
                _ = ticker.tick() => {
                    match self.sweep_once().await {
                        Ok(saved) => tracing::info!(saved, "Refresh sweep complete"),
                        Err(err) => tracing::error!(error = %err, "Refresh sweep failed"),
                    }
                }
            }
        }
    }

    /// One full pass over all stored locations. Returns how many
    /// snapshots were persisted.
    pub async fn sweep_once(&self) -> anyhow::Result<usize> {
        let locations = LocationRepo::list_all(&self.pool).await?;
        let total = locations.len();
        tracing::debug!(total, "Starting refresh sweep");

        let saved =
            process_in_chunks(locations, self.chunk_size, |location| self.refresh_one(location))
                .await?;
        Ok(saved.len())
    }

    /// Fetch and persist one location's current weather.
    ///
    /// Any failure is logged and swallowed into `None`; the resilient
    /// client already retried where that made sense.
    async fn refresh_one(&self, location: Location) -> Option<DbId> {
        let query = format!("{},{}", location.latitude, location.longitude);
        let response = match self.weather.current_weather(&query).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(location_id = location.id, error = %err, "Refresh fetch failed");
                return None;
            }
        };

        let input = mapping::weather_record_from_response(location.id, &response)?;
        match WeatherRecordRepo::insert(&self.pool, &input).await {
            Ok(record) => {
                counter!(METRIC_RECORDS_SAVED, "kind" => "weather").increment(1);
                Some(record.id)
            }
            Err(err) => {
                tracing::warn!(location_id = location.id, error = %err, "Refresh persist failed");
                None
            }
        }
    }
}
