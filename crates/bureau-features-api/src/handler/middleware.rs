//! Middleware for request processing
//!
//! - request logging with a per-request id
//! - Content-Type enforcement on the feature endpoints

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;

use super::{ErrorInfo, ErrorResponse};

/// Header carrying the request id, echoed on the response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging middleware
///
/// Reuses the caller's `x-request-id` when present, otherwise mints one,
/// and logs method, uri, status and duration.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let start = Instant::now();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Content-Type enforcement
///
/// Feature endpoints only accept `application/json` bodies.
pub async fn content_type_middleware(request: Request, next: Next) -> Response {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !content_type.contains("application/json") {
        let error = ErrorInfo::new(
            "INVALID_CONTENT_TYPE",
            "Content-Type must be application/json",
        );
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponse::new(error, uuid::Uuid::new_v4().to_string())),
        )
            .into_response();
    }

    next.run(request).await
}
