//! Integration tests for the prediction service API endpoints

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    error::PredictionError,
    health::{components, ComponentStatus, HealthRegistry},
    models::{FeatureRecord, PredictionRequest},
    observability::{ServiceMetrics, StructuredLogger},
    predictor::{Classifier, PredictionPipeline},
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceExt;

fn canonical_features() -> Vec<String> {
    [
        "Gender",
        "family_history",
        "FAVC",
        "CAEC",
        "SMOKE",
        "SCC",
        "CALC",
        "MTRANS",
        "Age",
        "Height",
        "Weight",
        "FCVC",
        "NCP",
        "CH2O",
        "FAF",
        "TUE",
    ]
    .iter()
    .map(|name| (*name).to_string())
    .collect()
}

fn canonical_classes() -> Vec<String> {
    [
        "Insufficient_Weight",
        "Normal_Weight",
        "Obesity_Type_I",
        "Obesity_Type_II",
        "Obesity_Type_III",
        "Overweight_Level_I",
        "Overweight_Level_II",
    ]
    .iter()
    .map(|name| (*name).to_string())
    .collect()
}

/// Classifier stub that always emits one label
struct StubClassifier {
    label: String,
    features: Vec<String>,
    classes: Vec<String>,
}

impl StubClassifier {
    fn emitting(label: &str) -> Self {
        Self {
            label: label.to_string(),
            features: canonical_features(),
            classes: canonical_classes(),
        }
    }
}

impl Classifier for StubClassifier {
    fn predict(&self, record: &FeatureRecord) -> Result<String, PredictionError> {
        for feature in &self.features {
            if record.get(feature).is_none() {
                return Err(PredictionError::SchemaMismatch {
                    feature: feature.clone(),
                });
            }
        }
        Ok(self.label.clone())
    }

    fn required_features(&self) -> &[String] {
        &self.features
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn version(&self) -> &str {
        "2024.1"
    }
}

/// Classifier stub whose backend always fails
struct FailingClassifier {
    features: Vec<String>,
    classes: Vec<String>,
}

impl FailingClassifier {
    fn new() -> Self {
        Self {
            features: canonical_features(),
            classes: canonical_classes(),
        }
    }
}

impl Classifier for FailingClassifier {
    fn predict(&self, _record: &FeatureRecord) -> Result<String, PredictionError> {
        Err(PredictionError::Inference("tensor shape mismatch".to_string()))
    }

    fn required_features(&self) -> &[String] {
        &self.features
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn version(&self) -> &str {
        "2024.1"
    }
}

#[derive(Clone)]
struct AppState {
    pipeline: Arc<PredictionPipeline>,
    health_registry: HealthRegistry,
    metrics: ServiceMetrics,
    logger: StructuredLogger,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

fn error_status(err: &PredictionError) -> StatusCode {
    match err {
        PredictionError::UnmappedValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PredictionError::SchemaMismatch { .. } | PredictionError::Inference(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        PredictionError::ArtifactLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> impl IntoResponse {
    let start = std::time::Instant::now();
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
                PredictionError::UnmappedValue { .. } => state.metrics.inc_rejected_requests(),
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

#[derive(Debug, Serialize)]
struct ModelInfo {
    version: String,
    features: Vec<String>,
    classes: Vec<String>,
}

async fn model_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ModelInfo {
        version: state.pipeline.model_version().to_string(),
        features: state.pipeline.required_features().to_vec(),
        classes: state.pipeline.classes().to_vec(),
    })
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

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

fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/model", get(model_info))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn setup_test_app(classifier: Arc<dyn Classifier>) -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL).await;

    let state = Arc::new(AppState {
        pipeline: Arc::new(PredictionPipeline::new(classifier)),
        health_registry,
        metrics: ServiceMetrics::new(),
        logger: StructuredLogger::new("test-instance"),
    });
    let router = create_test_router(state.clone());

    (router, state)
}

fn sample_body() -> serde_json::Value {
    serde_json::json!({
        "gender": "Feminino",
        "age": 30,
        "height_m": 1.70,
        "weight_kg": 70.0,
        "family_history": "Não",
        "high_calorie_food": "Sim",
        "vegetable_consumption": 2,
        "main_meals": 3,
        "snacking": "Às vezes",
        "smokes": "Não",
        "water_intake": 2,
        "calorie_monitoring": "Não",
        "physical_activity": 1,
        "screen_time": 1,
        "alcohol": "Nunca",
        "transport": "A pé"
    })
}

fn predict_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_predict_returns_translated_category() {
    let (app, _state) = setup_test_app(Arc::new(StubClassifier::emitting("Obesity_Type_III"))).await;

    let response = app.oneshot(predict_request(&sample_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let prediction = response_json(response).await;
    assert_eq!(prediction["category"], "Obesidade – Grau III");
    assert_eq!(prediction["predicted_label"], "Obesity_Type_III");
    assert_eq!(prediction["model_version"], "2024.1");
    assert!(prediction["generated_at"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_predict_rejects_unmapped_value_with_422() {
    let (app, _state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    let mut body = sample_body();
    body["gender"] = serde_json::json!("Unknown");

    let response = app
        .clone()
        .oneshot(predict_request(&body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error = response_json(response).await;
    assert_eq!(error["code"], "unmapped_value");
    assert!(error["error"].as_str().unwrap().contains("gender"));

    // The instance keeps serving after a rejected request
    let response = app.oneshot(predict_request(&sample_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_surfaces_inference_failure_as_500() {
    let (app, _state) = setup_test_app(Arc::new(FailingClassifier::new())).await;

    let response = app
        .clone()
        .oneshot(predict_request(&sample_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error = response_json(response).await;
    assert_eq!(error["code"], "inference_error");

    // Failures are per-request; the endpoint still answers
    let response = app.oneshot(predict_request(&sample_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_predict_rejects_malformed_body() {
    let (app, _state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/predict")
        .header("content-type", "application/json")
        .body(Body::from("{\"gender\": \"Feminino\""))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_model_endpoint_describes_artifact() {
    let (app, _state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let info = response_json(response).await;
    assert_eq!(info["version"], "2024.1");
    assert_eq!(info["features"].as_array().unwrap().len(), 16);
    assert!(info["features"]
        .as_array()
        .unwrap()
        .iter()
        .any(|name| name == "family_history"));
    assert_eq!(info["classes"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let health = response_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["model"].is_object());
}

#[tokio::test]
async fn test_healthz_stays_operational_after_inference_failure() {
    let (app, _state) = setup_test_app(Arc::new(FailingClassifier::new())).await;

    let response = app
        .clone()
        .oneshot(predict_request(&sample_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Degraded, not dead: liveness keeps returning 200
    assert_eq!(response.status(), StatusCode::OK);
    let health = response_json(response).await;
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_readyz_returns_503_when_not_ready() {
    let (app, _state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let readiness = response_json(response).await;
    assert_eq!(readiness["ready"], false);
}

#[tokio::test]
async fn test_readyz_returns_ok_once_artifact_loaded() {
    let (app, state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    state.health_registry.set_ready(true).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let readiness = response_json(response).await;
    assert_eq!(readiness["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    state.metrics.observe_prediction_latency(0.002);
    state.metrics.inc_predictions("Normal_Weight");
    state.metrics.set_model_info("2024.1");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("obesity_predictor_prediction_latency_seconds"));
    assert!(metrics_text.contains("obesity_predictor_predictions_total"));
    assert!(metrics_text.contains("obesity_predictor_model_info"));
}

#[tokio::test]
async fn test_metrics_contains_histogram_buckets() {
    let (app, state) = setup_test_app(Arc::new(StubClassifier::emitting("Normal_Weight"))).await;

    state.metrics.observe_prediction_latency(0.001);
    state.metrics.observe_prediction_latency(0.005);
    state.metrics.observe_prediction_latency(0.01);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("obesity_predictor_prediction_latency_seconds_bucket"));
    assert!(metrics_text.contains("obesity_predictor_prediction_latency_seconds_count"));
    assert!(metrics_text.contains("obesity_predictor_prediction_latency_seconds_sum"));
}
