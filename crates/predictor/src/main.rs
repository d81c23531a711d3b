//! Obesity Level Predictor - weight-status prediction service
//!
//! This binary serves predictions over HTTP from a pre-trained classifier
//! artifact. The artifact is loaded once at startup and never retrained or
//! mutated while serving.

use anyhow::{Context, Result};
use predictor_lib::{
    artifact::ModelStore,
    health::{components, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    predictor::PredictionPipeline,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting obesity-predictor");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(
        instance_name = %config.instance_name,
        model_dir = %config.model_dir.display(),
        api_port = config.api_port,
        "Service configured"
    );

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL).await;

    // Initialize metrics and structured logger
    let metrics = ServiceMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    // Load the model artifact. This is the one startup-fatal dependency:
    // without a usable bundle the service refuses to start.
    let store = ModelStore::new(&config.model_dir);
    let classifier = store
        .get_or_load()
        .await
        .context("failed to load model artifact bundle")?;

    metrics.set_model_info(classifier.version());
    logger.log_artifact_loaded(
        classifier.version(),
        classifier.required_features().len(),
        classifier.classes().len(),
    );
    logger.log_startup(SERVICE_VERSION, classifier.version());

    // Create shared application state
    let pipeline = Arc::new(PredictionPipeline::new(classifier));
    let app_state = Arc::new(api::AppState::new(
        pipeline,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Mark the service as ready once the artifact is loaded
    health_registry.set_ready(true).await;

    // Start the API server
    tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
