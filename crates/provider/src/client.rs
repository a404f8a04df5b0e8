//! Resilient weather client: retry + circuit breaker + rate limiter
//! composed around the raw [`WeatherApi`] transport.
//!
//! Each operation ("current", "forecast") owns an independent policy
//! set, built from explicit configuration at construction time. The
//! fallback is a synthesized "service unavailable" error naming the
//! failing operation and location — never a partially-valid result.

use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use nimbus_core::metric_names::{METRIC_PROVIDER_CALLS, METRIC_PROVIDER_CALL_DURATION_SECONDS};
use nimbus_core::validation::validate_forecast_days;

use crate::api::{ApiError, WeatherApi};
use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::models::{CurrentResponse, ForecastResponse};
use crate::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::retry::RetryConfig;

/// Operation name for current-conditions fetches.
pub const OP_CURRENT: &str = "current";

/// Operation name for forecast fetches.
pub const OP_FORECAST: &str = "forecast";

/// Default provider endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Client-facing failure of one resilient provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Input rejected before any network attempt.
    #[error("{0}")]
    Validation(String),

    /// The provider classified the request itself as invalid (HTTP
    /// 4xx), typically an unknown location. Never retried.
    #[error("Provider rejected {operation} request for '{query}' (HTTP {status})")]
    InvalidRequest {
        operation: &'static str,
        query: String,
        status: u16,
    },

    /// No outbound permit was available within the wait window.
    #[error("Outbound rate limit exceeded for {operation}")]
    RateLimited { operation: &'static str },

    /// The fallback result: retries exhausted or circuit open.
    #[error("Weather service unavailable: {operation} fetch for '{query}' failed")]
    ServiceUnavailable {
        operation: &'static str,
        query: String,
        #[source]
        source: Option<ApiError>,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The full policy set for one operation.
#[derive(Debug, Clone, Default)]
pub struct OperationPolicy {
    pub retry: RetryConfig,
    pub breaker: BreakerConfig,
    pub rate_limit: RateLimiterConfig,
}

/// Construction-time configuration for [`WeatherClient`].
#[derive(Debug, Clone)]
pub struct WeatherClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Policy for the lighter-weight current-conditions operation.
    pub current: OperationPolicy,
    /// Policy for the heavier forecast operation.
    pub forecast: OperationPolicy,
}

impl WeatherClientConfig {
    /// Default configuration for the given API key: 3 retries for
    /// current conditions, 2 for forecasts, shared breaker/limiter
    /// defaults.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            current: OperationPolicy {
                retry: RetryConfig {
                    max_retries: 3,
                    ..RetryConfig::default()
                },
                ..OperationPolicy::default()
            },
            forecast: OperationPolicy {
                retry: RetryConfig {
                    max_retries: 2,
                    ..RetryConfig::default()
                },
                ..OperationPolicy::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Per-operation resilience state.
struct OperationGuard {
    name: &'static str,
    retry: RetryConfig,
    breaker: CircuitBreaker,
    limiter: RateLimiter,
}

impl OperationGuard {
    fn new(name: &'static str, policy: OperationPolicy) -> Self {
        Self {
            name,
            retry: policy.retry,
            breaker: CircuitBreaker::new(policy.breaker),
            limiter: RateLimiter::new(policy.rate_limit),
        }
    }
}

/// The only path to the weather provider. Owns the transport and all
/// resilience state; callers must never reach the network directly.
pub struct WeatherClient {
    api: WeatherApi,
    current: OperationGuard,
    forecast: OperationGuard,
}

impl WeatherClient {
    pub fn new(config: WeatherClientConfig) -> Self {
        let api = WeatherApi::new(config.base_url, config.api_key, config.timeout);
        Self {
            api,
            current: OperationGuard::new(OP_CURRENT, config.current),
            forecast: OperationGuard::new(OP_FORECAST, config.forecast),
        }
    }

    /// Fetch current conditions for a free-text location query.
    pub async fn current_weather(&self, query: &str) -> Result<CurrentResponse, ProviderError> {
        self.execute(&self.current, query, || self.api.current(query))
            .await
    }

    /// Fetch a `days`-day forecast for a free-text location query.
    ///
    /// The day count is validated before any network or policy work.
    pub async fn forecast(&self, query: &str, days: u8) -> Result<ForecastResponse, ProviderError> {
        validate_forecast_days(days).map_err(|e| ProviderError::Validation(e.to_string()))?;
        self.execute(&self.forecast, query, || self.api.forecast(query, days))
            .await
    }

    /// Drive one logical call through the operation's policy set.
    ///
    /// Per attempt: rate-limiter permit, breaker gate, network call.
    /// Transient failures are retried with backoff up to the configured
    /// budget; 4xx surfaces immediately; an open breaker or an
    /// exhausted budget falls back to [`ProviderError::ServiceUnavailable`].
    async fn execute<T, F, Fut>(
        &self,
        guard: &OperationGuard,
        query: &str,
        mut attempt_fn: F,
    ) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        let mut last_err: Option<ApiError> = None;
        let attempts = guard.retry.max_retries + 1;

        for attempt in 0..attempts {
            if guard.limiter.acquire().await.is_err() {
                counter!(METRIC_PROVIDER_CALLS, "operation" => guard.name, "outcome" => "rate_limited")
                    .increment(1);
                tracing::warn!(operation = guard.name, query, "Outbound rate limit exceeded");
                return Err(ProviderError::RateLimited {
                    operation: guard.name,
                });
            }

            if !guard.breaker.try_acquire() {
                counter!(METRIC_PROVIDER_CALLS, "operation" => guard.name, "outcome" => "short_circuit")
                    .increment(1);
                return Err(fallback(guard.name, query, last_err));
            }

            let started = Instant::now();
            match attempt_fn().await {
                Ok(value) => {
                    guard.breaker.record_success();
                    histogram!(METRIC_PROVIDER_CALL_DURATION_SECONDS, "operation" => guard.name)
                        .record(started.elapsed().as_secs_f64());
                    counter!(METRIC_PROVIDER_CALLS, "operation" => guard.name, "outcome" => "success")
                        .increment(1);
                    return Ok(value);
                }
                Err(err) => {
                    guard.breaker.record_failure();
                    histogram!(METRIC_PROVIDER_CALL_DURATION_SECONDS, "operation" => guard.name)
                        .record(started.elapsed().as_secs_f64());
                    counter!(METRIC_PROVIDER_CALLS, "operation" => guard.name, "outcome" => "failure")
                        .increment(1);

                    if let ApiError::InvalidRequest { status, .. } = &err {
                        tracing::warn!(
                            operation = guard.name,
                            query,
                            status,
                            "Provider rejected request, not retrying"
                        );
                        return Err(ProviderError::InvalidRequest {
                            operation: guard.name,
                            query: query.to_string(),
                            status: *status,
                        });
                    }

                    tracing::warn!(
                        operation = guard.name,
                        query,
                        attempt = attempt + 1,
                        error = %err,
                        "Provider call failed"
                    );
                    last_err = Some(err);

                    if attempt + 1 < attempts {
                        tokio::time::sleep(guard.retry.delay_for_attempt(attempt)).await;
                    }
                }
            }
        }

        Err(fallback(guard.name, query, last_err))
    }
}

/// Synthesize the final client-facing failure.
fn fallback(operation: &'static str, query: &str, source: Option<ApiError>) -> ProviderError {
    tracing::error!(operation, query, "Weather service unavailable, serving fallback error");
    ProviderError::ServiceUnavailable {
        operation,
        query: query.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_retry_budgets_differ_per_operation() {
        let config = WeatherClientConfig::new("key".into());
        assert_eq!(config.current.retry.max_retries, 3);
        assert_eq!(config.forecast.retry.max_retries, 2);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn out_of_range_days_fail_before_any_policy_work() {
        // Unroutable base URL: a network attempt would error differently.
        let client = WeatherClient::new(WeatherClientConfig {
            api_key: "key".into(),
            base_url: "http://127.0.0.1:1".into(),
            timeout: Duration::from_millis(100),
            current: OperationPolicy::default(),
            forecast: OperationPolicy::default(),
        });

        for days in [0u8, 15] {
            let err = client.forecast("London", days).await.unwrap_err();
            assert!(matches!(err, ProviderError::Validation(_)), "days={days}");
        }
    }
}
