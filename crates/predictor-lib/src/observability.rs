//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (request latency, prediction counts, model version)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_gauge, GaugeVec, Histogram, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntGauge,
    predictions_by_class: GaugeVec,
    rejected_requests_total: IntGauge,
    prediction_errors_total: IntGauge,
    model_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "obesity_predictor_prediction_latency_seconds",
                "Time spent serving a prediction request end to end",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_gauge!(
                "obesity_predictor_predictions_total",
                "Total number of predictions served"
            )
            .expect("Failed to register predictions_total"),

            predictions_by_class: register_gauge_vec!(
                "obesity_predictor_predictions_by_class",
                "Predictions served per raw class label",
                &["class"]
            )
            .expect("Failed to register predictions_by_class"),

            rejected_requests_total: register_int_gauge!(
                "obesity_predictor_rejected_requests_total",
                "Requests rejected because a value was outside the supported domain"
            )
            .expect("Failed to register rejected_requests_total"),

            prediction_errors_total: register_int_gauge!(
                "obesity_predictor_prediction_errors_total",
                "Predictions that failed inside the inference adapter"
            )
            .expect("Failed to register prediction_errors_total"),

            model_info: register_gauge_vec!(
                "obesity_predictor_model_info",
                "Information about the currently loaded model artifact",
                &["version"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    // This is just a marker - we use the global instance
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a request latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Count one served prediction under its raw class label
    pub fn inc_predictions(&self, class_label: &str) {
        self.inner().predictions_total.inc();
        self.inner()
            .predictions_by_class
            .with_label_values(&[class_label])
            .inc();
    }

    /// Count one request rejected at the encoding stage
    pub fn inc_rejected_requests(&self) {
        self.inner().rejected_requests_total.inc();
    }

    /// Count one failed inference
    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    /// Update loaded model info
    pub fn set_model_info(&self, version: &str) {
        // Reset previous version
        self.inner().model_info.reset();
        // Set new version with value 1
        self.inner().model_info.with_label_values(&[version]).set(1.0);
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for predictions and
/// lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    instance_name: String,
}

impl StructuredLogger {
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
        }
    }

    /// Log a served prediction
    pub fn log_prediction(
        &self,
        category: &str,
        predicted_label: &str,
        model_version: &str,
        latency_us: u64,
    ) {
        info!(
            event = "prediction_served",
            instance = %self.instance_name,
            category = %category,
            predicted_label = %predicted_label,
            model_version = %model_version,
            latency_us = latency_us,
            "Prediction served"
        );
    }

    /// Log a failed prediction request
    pub fn log_prediction_failed(&self, code: &str, error: &str) {
        match code {
            // Client-side input problems are expected traffic, not service faults
            "unmapped_value" => {
                info!(
                    event = "prediction_rejected",
                    instance = %self.instance_name,
                    code = %code,
                    error = %error,
                    "Prediction request rejected"
                );
            }
            _ => {
                warn!(
                    event = "prediction_failed",
                    instance = %self.instance_name,
                    code = %code,
                    error = %error,
                    "Prediction request failed"
                );
            }
        }
    }

    /// Log a loaded model artifact
    pub fn log_artifact_loaded(&self, model_version: &str, features: usize, classes: usize) {
        info!(
            event = "artifact_loaded",
            instance = %self.instance_name,
            model_version = %model_version,
            features = features,
            classes = classes,
            "Model artifact loaded"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_version: &str) {
        info!(
            event = "service_started",
            instance = %self.instance_name,
            service_version = %version,
            model_version = %model_version,
            "Prediction service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance_name,
            reason = %reason,
            "Prediction service shutting down"
        );
    }
}
