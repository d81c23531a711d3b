//! Service configuration

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Prediction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Instance name used to tag structured log events
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// API server port for predictions, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Directory holding the model artifact bundle (model.onnx + schema.json)
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "local".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("model")
}

impl ServiceConfig {
    /// Load configuration from OLP_-prefixed environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("OLP"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServiceConfig {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            model_dir: default_model_dir(),
        }))
    }
}
