use std::str::FromStr;
use std::time::Duration;

use nimbus_core::batch::DEFAULT_CHUNK_SIZE;
use nimbus_provider::{
    BreakerConfig, OperationPolicy, RateLimiterConfig, RetryConfig, WeatherClientConfig,
    DEFAULT_BASE_URL,
};

/// Server configuration loaded from environment variables.
///
/// All fields except the provider API key have sensible defaults
/// suitable for local development. In production, override via
/// environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// External weather provider settings.
    pub weather: WeatherSettings,
    /// Background refresh sweep settings.
    pub refresh: RefreshSettings,
    /// Background retention sweep settings.
    pub retention: RetentionSettings,
}

/// Provider endpoint and resilience tunables.
#[derive(Debug, Clone)]
pub struct WeatherSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub retries_current: u32,
    pub retries_forecast: u32,
    pub retry_initial_delay_ms: u64,
    pub breaker_window: usize,
    pub breaker_threshold: f64,
    pub breaker_cooldown_secs: u64,
    pub rate_limit_per_sec: f64,
    pub rate_limit_burst: u32,
    pub rate_limit_wait_ms: u64,
}

/// Scheduled refresh of current weather across all stored locations.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    pub chunk_size: usize,
}

/// Age/date based purging of stored records.
#[derive(Debug, Clone)]
pub struct RetentionSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    /// Weather snapshots older than this many days are purged.
    pub weather_max_age_days: i64,
    /// Forecast rows dated further back than this many days are purged.
    pub forecast_max_age_days: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// `WEATHER_API_KEY` is required; everything else falls back to a
    /// local-development default. Misconfiguration fails fast at
    /// startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let weather = WeatherSettings {
            api_key: std::env::var("WEATHER_API_KEY").expect("WEATHER_API_KEY must be set"),
            base_url: std::env::var("WEATHER_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            timeout_secs: env_or("WEATHER_API_TIMEOUT_SECS", 10),
            retries_current: env_or("WEATHER_RETRIES_CURRENT", 3),
            retries_forecast: env_or("WEATHER_RETRIES_FORECAST", 2),
            retry_initial_delay_ms: env_or("WEATHER_RETRY_INITIAL_DELAY_MS", 500),
            breaker_window: env_or("WEATHER_BREAKER_WINDOW", 8),
            breaker_threshold: env_or("WEATHER_BREAKER_THRESHOLD", 0.5),
            breaker_cooldown_secs: env_or("WEATHER_BREAKER_COOLDOWN_SECS", 30),
            rate_limit_per_sec: env_or("WEATHER_RATE_LIMIT_PER_SEC", 10.0),
            rate_limit_burst: env_or("WEATHER_RATE_LIMIT_BURST", 10),
            rate_limit_wait_ms: env_or("WEATHER_RATE_LIMIT_WAIT_MS", 100),
        };

        let refresh = RefreshSettings {
            enabled: env_or("REFRESH_ENABLED", false),
            interval_secs: env_or("REFRESH_INTERVAL_SECS", 900),
            chunk_size: env_or("REFRESH_CHUNK_SIZE", DEFAULT_CHUNK_SIZE),
        };

        let retention = RetentionSettings {
            enabled: env_or("RETENTION_ENABLED", false),
            interval_secs: env_or("RETENTION_INTERVAL_SECS", 86_400),
            weather_max_age_days: env_or("RETENTION_WEATHER_DAYS", 30),
            forecast_max_age_days: env_or("RETENTION_FORECAST_DAYS", 7),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            weather,
            refresh,
            retention,
        }
    }

    /// Build the explicit provider-client configuration from settings.
    ///
    /// Constructed once at startup and passed to [`nimbus_provider::WeatherClient::new`];
    /// there is no ambient policy registry.
    pub fn weather_client_config(&self) -> WeatherClientConfig {
        let w = &self.weather;

        let breaker = BreakerConfig {
            window_size: w.breaker_window,
            failure_threshold: w.breaker_threshold,
            cooldown: Duration::from_secs(w.breaker_cooldown_secs),
        };
        let rate_limit = RateLimiterConfig {
            permits_per_second: w.rate_limit_per_sec,
            burst: w.rate_limit_burst,
            max_wait: Duration::from_millis(w.rate_limit_wait_ms),
        };
        let retry = |max_retries: u32| RetryConfig {
            max_retries,
            initial_delay: Duration::from_millis(w.retry_initial_delay_ms),
            ..RetryConfig::default()
        };

        WeatherClientConfig {
            api_key: w.api_key.clone(),
            base_url: w.base_url.clone(),
            timeout: Duration::from_secs(w.timeout_secs),
            current: OperationPolicy {
                retry: retry(w.retries_current),
                breaker: breaker.clone(),
                rate_limit: rate_limit.clone(),
            },
            forecast: OperationPolicy {
                retry: retry(w.retries_forecast),
                breaker,
                rate_limit,
            },
        }
    }
}

/// Read an env var and parse it, falling back to `default` when unset.
/// Panics at startup on unparseable values, which is the desired
/// behaviour -- we want misconfiguration to fail fast.
fn env_or<T: FromStr>(key: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
