//! Raw REST client for the weather provider's HTTP endpoints.
//!
//! Builds the query, sends the request, and classifies the response by
//! status-code band. Resilience (breaker/retry/limiter) lives one layer
//! up in [`crate::client`]; nothing here retries.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::models::{CurrentResponse, ForecastResponse};

/// Maximum length of the response-body excerpt carried in errors.
const BODY_EXCERPT_LEN: usize = 200;

/// Errors from a single provider call, classified by failure band.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The provider rejected the request (HTTP 4xx). Not retryable.
    #[error("Provider rejected request (HTTP {status}): {body}")]
    InvalidRequest { status: u16, body: String },

    /// The provider failed (HTTP 5xx or other non-success). Retryable.
    #[error("Provider error (HTTP {status}): {body}")]
    ServerError { status: u16, body: String },

    /// A successful status arrived with an empty body.
    #[error("Provider returned an empty response body")]
    EmptyResponse,

    /// The response body could not be parsed as the expected JSON shape.
    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether this failure class is worth retrying.
    ///
    /// Only validated-bad-input failures (4xx) are permanent; server
    /// errors, empty/garbled bodies, and transport failures are
    /// transient.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ApiError::InvalidRequest { .. })
    }
}

/// HTTP client for the weather provider.
pub struct WeatherApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApi {
    /// Create a new API client.
    ///
    /// * `base_url` - endpoint root, e.g. `https://api.weatherapi.com/v1`.
    /// * `timeout` - per-request timeout applied to every call.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Fetch current conditions for a free-text location query.
    pub async fn current(&self, query: &str) -> Result<CurrentResponse, ApiError> {
        self.get_json("current.json", &[("key", self.api_key.as_str()), ("q", query)])
            .await
    }

    /// Fetch an N-day forecast for a free-text location query.
    ///
    /// The day count is validated by the caller before any network work.
    pub async fn forecast(&self, query: &str, days: u8) -> Result<ForecastResponse, ApiError> {
        let days = days.to_string();
        self.get_json(
            "forecast.json",
            &[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("days", days.as_str()),
            ],
        )
        .await
    }

    /// Execute one GET request and classify the outcome.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_client_error() {
            return Err(ApiError::InvalidRequest {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }
        if !status.is_success() {
            return Err(ApiError::ServerError {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }
        if body.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Truncate a response body for inclusion in error messages.
fn excerpt(body: &str) -> String {
    if body.len() > BODY_EXCERPT_LEN {
        format!("{}...", &body[..BODY_EXCERPT_LEN])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_is_not_transient() {
        let err = ApiError::InvalidRequest {
            status: 400,
            body: "no matching location found".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn server_and_empty_errors_are_transient() {
        let server = ApiError::ServerError {
            status: 502,
            body: String::new(),
        };
        assert!(server.is_transient());
        assert!(ApiError::EmptyResponse.is_transient());
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let cut = excerpt(&long);
        assert_eq!(cut.len(), BODY_EXCERPT_LEN + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short"), "short");
    }
}
