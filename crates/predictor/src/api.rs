//! HTTP API for predictions, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    error::PredictionError,
    health::{components, ComponentStatus, HealthRegistry},
    models::PredictionRequest,
    observability::{ServiceMetrics, StructuredLogger},
    predictor::PredictionPipeline,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        pipeline: Arc<PredictionPipeline>,
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            pipeline,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Error body returned for failed prediction requests
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

fn error_status(err: &PredictionError) -> StatusCode {
    match err {
        // The caller can fix these by changing the request
        PredictionError::UnmappedValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PredictionError::SchemaMismatch { .. } | PredictionError::Inference(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        PredictionError::ArtifactLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Serve one prediction request
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> impl IntoResponse {
    let start = Instant::now();
    let result = state.pipeline.predict(&request);
    let elapsed = start.elapsed();
    state.metrics.observe_prediction_latency(elapsed.as_secs_f64());

    match result {
        Ok(prediction) => {
            state.metrics.inc_predictions(&prediction.predicted_label);
            state.logger.log_prediction(
                &prediction.category,
                &prediction.predicted_label,
                &prediction.model_version,
                elapsed.as_micros() as u64,
            );
            state.health_registry.set_healthy(components::MODEL).await;
            (StatusCode::OK, Json(prediction)).into_response()
        }
        Err(err) => {
            match &err {
                PredictionError::UnmappedValue { .. } => {
                    state.metrics.inc_rejected_requests();
                }
                _ => {
                    state.metrics.inc_prediction_errors();
                    state
                        .health_registry
                        .set_degraded(components::MODEL, err.to_string())
                        .await;
                }
            }
            state.logger.log_prediction_failed(err.code(), &err.to_string());

            let body = ErrorBody {
                error: err.to_string(),
                code: err.code(),
            };
            (error_status(&err), Json(body)).into_response()
        }
    }
}

/// Metadata about the loaded model artifact
#[derive(Debug, Serialize)]
struct ModelInfo {
    version: String,
    features: Vec<String>,
    classes: Vec<String>,
}

/// Describe the loaded model artifact
async fn model_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let info = ModelInfo {
        version: state.pipeline.model_version().to_string(),
        features: state.pipeline.required_features().to_vec(),
        classes: state.pipeline.classes().to_vec(),
    };
    Json(info)
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
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

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/model", get(model_info))
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
