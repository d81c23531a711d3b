//! API client for communicating with the prediction service

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// API client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a GET request that also parses 503 bodies.
    ///
    /// The health probes encode their verdict in the status code while still
    /// returning a JSON body, so the health command needs both.
    pub async fn get_with_status<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::SERVICE_UNAVAILABLE {
            return Err(api_error(response).await);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response.json().await.context("Failed to parse response")
    }
}

async fn api_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    // The service returns a structured error body for failed predictions
    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
        return anyhow::anyhow!("API error ({}): {} [{}]", status, err.error, err.code);
    }

    anyhow::anyhow!("API error ({}): {}", status, body)
}

// API request/response types. Redefined locally rather than importing
// predictor-lib: the CLI depends only on the service's wire contract.

/// Prediction request body for POST /api/v1/predict
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub gender: String,
    pub age: u32,
    pub height_m: f32,
    pub weight_kg: f32,
    pub family_history: String,
    pub high_calorie_food: String,
    pub vegetable_consumption: u8,
    pub main_meals: u8,
    pub snacking: String,
    pub smokes: String,
    pub water_intake: u8,
    pub calorie_monitoring: String,
    pub physical_activity: u8,
    pub screen_time: u8,
    pub alcohol: String,
    pub transport: String,
}

/// Prediction returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Localized display label, e.g. "Obesidade – Grau III"
    pub category: String,
    /// Raw class label emitted by the model, e.g. "Obesity_Type_III"
    pub predicted_label: String,
    pub model_version: String,
    pub generated_at: i64,
}

/// Metadata about the loaded model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub version: String,
    pub features: Vec<String>,
    pub classes: Vec<String>,
}

/// Health state of one service component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

/// Overall health response from /healthz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, ComponentHealth>,
}

/// Readiness response from /readyz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Structured error body the service returns for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
