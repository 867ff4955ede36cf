//! HTTP candidate source: POSTs `{context, feedback}` and ingests the JSON layout response.

use super::{CandidateSource, GenerationContext};
use crate::config::CandidateSourceConfig;
use crate::controller::QualityFeedback;
use crate::error::{ApiError, GenerationFailure};
use crate::layout::{ingest, Layout};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    context: &'a GenerationContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<FeedbackPayload<'a>>,
}

#[derive(Serialize)]
struct FeedbackPayload<'a> {
    #[serde(flatten)]
    structured: &'a QualityFeedback,
    text: String,
}

pub struct HttpCandidateSource {
    client: Client,
    endpoint: String,
}

impl HttpCandidateSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &CandidateSourceConfig) -> Result<Self, ApiError> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            ApiError::ConfigError("source.endpoint is required for a remote source".to_string())
        })?;
        Self::new(endpoint, Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn map_http_error(error: reqwest::Error) -> GenerationFailure {
    if error.is_timeout() {
        GenerationFailure::new(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GenerationFailure::new(format!("Connection error: {}", error))
    } else {
        GenerationFailure::new(format!("HTTP error: {}", error))
    }
}

#[async_trait]
impl CandidateSource for HttpCandidateSource {
    async fn generate(
        &self,
        context: &GenerationContext,
        feedback: Option<&QualityFeedback>,
    ) -> Result<Layout, GenerationFailure> {
        let request = GenerateRequest {
            context,
            feedback: feedback.map(|structured| FeedbackPayload {
                structured,
                text: structured.to_string(),
            }),
        };

        debug!(endpoint = %self.endpoint, attempt = context.attempt, "requesting candidate");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationFailure::new(format!(
                "Request failed with status {}: {}",
                status, body
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| GenerationFailure::new(format!("Failed to parse response: {}", e)))?;
        Ok(ingest::from_json(&value)?)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = CandidateSourceConfig::default();
        assert!(matches!(
            HttpCandidateSource::from_config(&config),
            Err(ApiError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_generation_failure() {
        let source =
            HttpCandidateSource::new("http://127.0.0.1:9/generate", Duration::from_millis(500))
                .unwrap();
        let result = source.generate(&GenerationContext::default(), None).await;
        assert!(result.is_err());
    }
}
