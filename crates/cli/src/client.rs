//! API client for communicating with the sizer-server

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

/// API client for the sizer-server
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

    /// Submit a recommendation request and return the outcome.
    ///
    /// Non-2xx statuses still carry a structured outcome body (validation
    /// and parse failures), so they are decoded rather than treated as
    /// transport errors.
    pub async fn submit(&self, request: &RecommendationRequest) -> Result<Outcome> {
        let url = self
            .base_url
            .join("api/v1/recommendations")
            .context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response")?;
        serde_json::from_str(&body)
            .with_context(|| format!("Unexpected response ({}): {}", status, body))
    }

    /// Fetch the last stored outcome, if any
    pub async fn last(&self) -> Result<Option<Outcome>> {
        let url = self
            .base_url
            .join("api/v1/recommendations/last")
            .context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        Ok(Some(response.json().await.context("Failed to parse response")?))
    }

    /// Clear the stored outcome
    pub async fn clear(&self) -> Result<()> {
        let url = self
            .base_url
            .join("api/v1/recommendations")
            .context("Invalid path")?;

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("API error ({})", status);
        }
        Ok(())
    }
}

// Request and response types, mirroring the server's JSON contract

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationRequest {
    FromScratch {
        total_users: String,
        workload_type: String,
        user_concurrency: String,
    },
    Existing {
        cpu: String,
        ram: String,
        hard_disk: String,
    },
    File {
        file_name: String,
        content: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Success { recommendations: Vec<Recommendation> },
    ValidationFailed { errors: Vec<FieldError> },
    ParseFailed { reason: String },
    InsufficientData,
    InternalFailure { reason: String },
    Superseded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub tier: String,
    pub title: String,
    pub description: String,
    pub cpu_vcpus: u32,
    pub ram_gb: u32,
    pub storage_gb: u64,
    pub network_gbps: u32,
    pub estimated_monthly_cost: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
