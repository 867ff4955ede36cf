//! Error types for the Pagewright layout quality gate.
//!
//! Rule violations are data, not errors: they live in [`crate::analysis`] as codes. The types
//! here cover configuration, ingestion, collaborators, and the per-attempt generation failure
//! that the controller records and moves past.

use thiserror::Error;

/// API-level errors surfaced by loaders, ingestion, and collaborators
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Layout ingestion failed: {0}")]
    IngestError(String),

    #[error("Candidate source error: {0}")]
    ProviderError(String),

    #[error("Telemetry sink error: {0}")]
    TelemetryError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// A candidate source could not produce a layout for one attempt.
///
/// Recorded by the controller; never propagated out of the retry loop.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[error("Generation failed: {reason}")]
pub struct GenerationFailure {
    pub reason: String,
}

impl GenerationFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<ApiError> for GenerationFailure {
    fn from(err: ApiError) -> Self {
        GenerationFailure::new(err.to_string())
    }
}
