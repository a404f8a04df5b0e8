//! HTTP client for the external weather data provider, wrapped with
//! explicit resilience policies (circuit breaker, retry with backoff,
//! rate limiter).
//!
//! Policies are plain configuration structs passed at construction —
//! there is no ambient registry, and callers never reach the transport
//! except through [`WeatherClient`].

pub mod api;
pub mod breaker;
pub mod client;
pub mod models;
pub mod rate_limit;
pub mod retry;

pub use api::{ApiError, WeatherApi};
pub use breaker::{BreakerConfig, BreakerState, CircuitBreaker};
pub use client::{
    OperationPolicy, ProviderError, WeatherClient, WeatherClientConfig, DEFAULT_BASE_URL,
    OP_CURRENT, OP_FORECAST,
};
pub use rate_limit::{RateLimitExceeded, RateLimiter, RateLimiterConfig};
pub use retry::RetryConfig;
