//! Injects the originating request path into JSON error bodies.
//!
//! Handlers produce `{ "error": ..., "code": ... }` bodies without
//! knowing their mount point; this middleware adds a `"path"` field so
//! every externally-surfaced failure names the request that caused it.

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::Next;
use axum::response::Response;

/// Upper bound on error bodies this middleware will buffer.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

pub async fn attach_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, ERROR_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "Failed to buffer error body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(serde_json::Value::Object(mut map)) => {
            map.insert("path".to_string(), serde_json::Value::String(path));
            let rewritten =
                serde_json::to_vec(&map).unwrap_or_else(|_| bytes.to_vec());
            // The body length changed; let hyper recompute the header.
            parts.headers.remove(axum::http::header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(rewritten))
        }
        _ => Response::from_parts(parts, Body::from(bytes)),
    }
}
