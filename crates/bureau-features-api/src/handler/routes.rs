//! Route definitions for the feature service
//!
//! - GET  /                              - service description
//! - GET  /health                        - liveness probe
//! - POST /calculate-features            - features for one applicant
//! - POST /calculate-features-from-json  - same, tabular-row compatible
//! - GET  /metrics                       - Prometheus exposition

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use bureau_features_core::FeatureError;

use super::middleware::{content_type_middleware, request_logging_middleware};
use super::{
    ErrorInfo, ErrorResponse, FeatureRequest, FeatureResponse, HealthResponse, HealthStatus,
    ServiceInfo,
};
use crate::{AppState, SERVICE_NAME};

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalError(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::InternalError(msg) => {
                msg
            }
        }
    }
}

impl From<FeatureError> for ApiError {
    fn from(err: FeatureError) -> Self {
        if err.is_user_error() {
            ApiError::BadRequest(format!("Error calculating features: {}", err))
        } else {
            ApiError::InternalError(format!("Error calculating features: {}", err))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_info = ErrorInfo::new(self.error_code(), self.message());
        let response = ErrorResponse::new(error_info, uuid::Uuid::new_v4().to_string());

        (status, Json(response)).into_response()
    }
}

/// Create the router with all routes and layers
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let feature_routes = Router::new()
        .route("/calculate-features", post(calculate_features))
        .route("/calculate-features-from-json", post(calculate_features_from_json))
        .route_layer(middleware::from_fn(content_type_middleware));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .merge(feature_routes)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms)))
        .layer(cors_layer(&config.cors_origins))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(cors::Any)
        .allow_headers(cors::Any)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    ApiError::InternalError("Error calculating features".to_string()).into_response()
}

/// GET / - Service description
pub async fn root() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        (
            "POST /calculate-features".to_string(),
            "Calculate features from application data".to_string(),
        ),
        (
            "POST /calculate-features-from-json".to_string(),
            "Calculate features from a tabular row with JSON-encoded contracts".to_string(),
        ),
        ("GET /health".to_string(), "Health check endpoint".to_string()),
        ("GET /metrics".to_string(), "Prometheus metrics".to_string()),
    ]);

    Json(ServiceInfo {
        message: SERVICE_NAME.to_string(),
        description: "Submit application data to calculate financial features".to_string(),
        endpoints,
    })
}

/// GET /health - Liveness probe
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// POST /calculate-features - Features for one applicant
pub async fn calculate_features(
    State(state): State<AppState>,
    Json(request): Json<FeatureRequest>,
) -> Result<Json<FeatureResponse>, ApiError> {
    compute(&state, "calculate_features", request).map(Json)
}

/// POST /calculate-features-from-json - Tabular-row compatible variant
///
/// Accepts the shape of one CSV row: `id` may be numeric and `contracts` is
/// usually a JSON-encoded string.
pub async fn calculate_features_from_json(
    State(state): State<AppState>,
    Json(request): Json<FeatureRequest>,
) -> Result<Json<FeatureResponse>, ApiError> {
    compute(&state, "calculate_features_from_json", request).map(Json)
}

/// GET /metrics - Prometheus exposition
pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    if !state.config.metrics_enabled {
        return Err(ApiError::NotFound("Metrics are disabled".to_string()));
    }
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

fn compute(
    state: &AppState,
    endpoint: &str,
    request: FeatureRequest,
) -> Result<FeatureResponse, ApiError> {
    let start = Instant::now();

    let Some(application_date) = request.application_date.filter(|d| !d.trim().is_empty()) else {
        state.metrics.record_request(endpoint, "rejected");
        return Err(FeatureError::MissingReferenceTimestamp.into());
    };

    let contracts = request.contracts.into_contracts();
    state.metrics.observe_contracts(contracts.len());

    let features = match state.engine.calculate_from_text(&application_date, &contracts) {
        Ok(features) => features,
        Err(err) => {
            let result = if err.is_user_error() { "rejected" } else { "error" };
            state.metrics.record_request(endpoint, result);
            tracing::info!(
                endpoint,
                id = %request.id,
                error = %err,
                "Feature request rejected"
            );
            return Err(err.into());
        }
    };

    state.metrics.record_features(&features);
    state.metrics.record_request(endpoint, "ok");
    state
        .metrics
        .observe_duration(endpoint, start.elapsed().as_secs_f64());

    tracing::debug!(
        endpoint,
        id = %request.id,
        contracts = contracts.len(),
        tot_claim_cnt_l180d = features.tot_claim_cnt_l180d,
        disb_bank_loan_wo_tbc = features.disb_bank_loan_wo_tbc,
        day_sinlastloan = features.day_sinlastloan,
        "Features calculated"
    );

    Ok(FeatureResponse {
        id: request.id,
        application_date,
        features,
    })
}
