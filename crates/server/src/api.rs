//! HTTP API: the submit boundary plus health checks and metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use sizer_lib::{
    coordinator::{RecommendationOutcome, RequestCoordinator},
    health::{ComponentStatus, HealthRegistry},
    models::RecommendationRequest,
    observability::{SizerLogger, SizerMetrics},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub coordinator: RequestCoordinator,
    pub health_registry: HealthRegistry,
    pub metrics: SizerMetrics,
    pub logger: SizerLogger,
}

impl AppState {
    pub fn new(
        coordinator: RequestCoordinator,
        health_registry: HealthRegistry,
        metrics: SizerMetrics,
        logger: SizerLogger,
    ) -> Self {
        Self {
            coordinator,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Submit one recommendation request and wait for its outcome
async fn submit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendationRequest>,
) -> impl IntoResponse {
    let source = request_source(&request);
    let file_name = match &request {
        RecommendationRequest::File { file_name, .. } => Some(file_name.clone()),
        _ => None,
    };

    let start = Instant::now();
    state.metrics.inc_in_flight();
    let outcome = state.coordinator.submit(request).await;
    state.metrics.dec_in_flight();
    state
        .metrics
        .observe_request_latency(start.elapsed().as_secs_f64());
    state.metrics.inc_outcome(&outcome);

    match &outcome {
        RecommendationOutcome::Success { recommendations } => {
            state.logger.log_recommendations(source, recommendations);
        }
        RecommendationOutcome::ValidationFailed { errors } => {
            let fields: Vec<String> = errors.iter().map(|e| e.field.clone()).collect();
            state.logger.log_validation_failure(&fields);
        }
        RecommendationOutcome::ParseFailed { reason } => {
            state
                .logger
                .log_parse_failure(file_name.as_deref().unwrap_or("<none>"), reason);
        }
        _ => {}
    }

    (outcome_status(&outcome), Json(outcome))
}

/// The latest committed outcome, if any
async fn last_outcome(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.coordinator.last_outcome().await {
        Some(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Clear the stored outcome, returning the session to idle
async fn clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.coordinator.clear().await;
    StatusCode::NO_CONTENT
}

fn outcome_status(outcome: &RecommendationOutcome) -> StatusCode {
    match outcome {
        RecommendationOutcome::Success { .. } => StatusCode::OK,
        RecommendationOutcome::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RecommendationOutcome::InsufficientData => StatusCode::UNPROCESSABLE_ENTITY,
        RecommendationOutcome::ParseFailed { .. } => StatusCode::BAD_REQUEST,
        RecommendationOutcome::Superseded => StatusCode::CONFLICT,
        RecommendationOutcome::InternalFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn request_source(request: &RecommendationRequest) -> &'static str {
    match request {
        RecommendationRequest::FromScratch { .. } => "from_scratch",
        RecommendationRequest::Existing { .. } => "existing",
        RecommendationRequest::File { .. } => "file",
    }
}

/// Health check - 200 while operational, 503 when unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

/// Readiness check - 200 once initialized, 503 otherwise
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            e.to_string().into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(submit).delete(clear))
        .route("/api/v1/recommendations/last", get(last_outcome))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
