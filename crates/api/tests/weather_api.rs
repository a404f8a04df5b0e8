//! Integration tests for the weather/forecast endpoints against a mock
//! provider, and for the JSON error envelope (stable code, message,
//! originating path).
//!
//! Everything here runs with `persist=false` or fails before the
//! repository layer, so the lazy database pool is never connected.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body() -> serde_json::Value {
    json!({
        "location": {
            "name": "London",
            "country": "United Kingdom",
            "lat": 51.52,
            "lon": -0.11
        },
        "current": {
            "temp_c": 15.5,
            "feelslike_c": 14.0,
            "humidity": 72,
            "wind_kph": 13.0,
            "wind_dir": "SW",
            "condition": { "text": "Partly cloudy" },
            "pressure_mb": 1012.0,
            "precip_mm": 0.1,
            "cloud": 50,
            "uv": 4.0,
            "last_updated": "2024-06-01 14:30"
        }
    })
}

fn forecast_body() -> serde_json::Value {
    json!({
        "location": {
            "name": "London",
            "country": "United Kingdom",
            "lat": 51.52,
            "lon": -0.11
        },
        "forecast": {
            "forecastday": [{
                "date": "2024-06-01",
                "day": {
                    "maxtemp_c": 18.0,
                    "mintemp_c": 9.0,
                    "avgtemp_c": 13.5,
                    "maxwind_kph": 22.0,
                    "avghumidity": 68.0,
                    "condition": { "text": "Sunny" },
                    "totalprecip_mm": 0.0,
                    "daily_chance_of_rain": 10,
                    "uv": 5.0
                },
                "astro": { "sunrise": "06:45 AM", "sunset": "08:12 PM" }
            }]
        }
    })
}

// ---------------------------------------------------------------------------
// Current weather, unsaved
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsaved_fetch_returns_dto_without_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let app = common::build_test_app(&server.uri());
    let response = get(app, "/api/v1/weather/current?q=London").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["temperature_c"], 15.5);
    assert_eq!(json["condition_text"], "Partly cloudy");
    assert_eq!(json["location_name"], "London, United Kingdom");
    // Unsaved: id/location_id are absent markers.
    assert!(json.get("id").is_none());
    assert!(json.get("location_id").is_none());
}

// ---------------------------------------------------------------------------
// Forecast, unsaved
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsaved_forecast_returns_day_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let app = common::build_test_app(&server.uri());
    let response = get(app, "/api/v1/weather/forecast?q=London").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let days = json["data"].as_array().expect("data array");
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["condition_text"], "Sunny");
    assert_eq!(days[0]["sunrise"], "06:45 AM");
    assert_eq!(days[0]["forecast_date"], "2024-06-01");
}

// ---------------------------------------------------------------------------
// Validation errors carry the stable envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn out_of_range_days_are_rejected_before_any_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(0)
        .mount(&server)
        .await;

    let app = common::build_test_app(&server.uri());
    let response = get(app, "/api/v1/weather/forecast?q=London&days=15").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["path"], "/api/v1/weather/forecast");
    assert!(json["error"].as_str().unwrap().contains("14"));
    server.verify().await;
}

#[tokio::test]
async fn invalid_create_location_payload_is_rejected() {
    let app = common::build_test_app("http://127.0.0.1:9");
    let response = post_json(
        app,
        "/api/v1/locations",
        json!({
            "name": "Atlantis",
            "country": "Nowhere",
            "latitude": 123.0,
            "longitude": 0.0
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["path"], "/api/v1/locations");
}

#[tokio::test]
async fn missing_query_parameter_is_a_bad_request() {
    let app = common::build_test_app("http://127.0.0.1:9");
    let response = get(app, "/api/v1/weather/current").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Upstream failure classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provider_4xx_maps_to_invalid_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = common::build_test_app(&server.uri());
    let response = get(app, "/api/v1/weather/current?q=Nowhereville").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_LOCATION");
    assert_eq!(json["path"], "/api/v1/weather/current");
    server.verify().await;
}

#[tokio::test]
async fn exhausted_upstream_retries_map_to_service_unavailable() {
    let server = MockServer::start().await;
    // One retry is configured, so exactly two attempts reach the mock.
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let app = common::build_test_app(&server.uri());
    let response = get(app, "/api/v1/weather/current?q=London").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(json["path"], "/api/v1/weather/current");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("London"));
    server.verify().await;
}

// ---------------------------------------------------------------------------
// Absent payload is "no data", not an error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_without_current_payload_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {
                "name": "London",
                "country": "United Kingdom",
                "lat": 51.52,
                "lon": -0.11
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = common::build_test_app(&server.uri());
    let response = get(app, "/api/v1/weather/current?q=London").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_DATA");
}
