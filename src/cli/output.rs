//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to a single line for stderr.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ConfigError(msg) => format!("configuration: {}", msg),
        ApiError::IngestError(msg) => format!("layout: {}", msg),
        other => other.to_string(),
    }
}
