//! Candidate Source Abstraction
//!
//! The controller's only suspending dependency: something that turns a generation context
//! (plus, on retries, the previous attempt's quality feedback) into a complete [`Layout`].
//! How the layout is composed is the source's business; the core only requires the result.

use crate::controller::QualityFeedback;
use crate::error::GenerationFailure;
use crate::layout::Layout;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod http;
pub mod scripted;

pub use http::HttpCandidateSource;
pub use scripted::{ScriptedCandidates, ScriptedItem};

/// Caller request forwarded to the candidate source on every attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Opaque brief (page goal, audience, copy hints); never inspected by the core
    #[serde(default)]
    pub request: Value,
    #[serde(default)]
    pub attempt: u32,
    #[serde(default)]
    pub max_attempts: u32,
}

impl GenerationContext {
    pub fn new(request: Value) -> Self {
        Self {
            request,
            attempt: 0,
            max_attempts: 0,
        }
    }

    pub fn for_attempt(&self, attempt: u32, max_attempts: u32) -> Self {
        Self {
            request: self.request.clone(),
            attempt,
            max_attempts,
        }
    }
}

/// Candidate source trait
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Produce one candidate layout. A failure consumes the attempt but never aborts the loop.
    async fn generate(
        &self,
        context: &GenerationContext,
        feedback: Option<&QualityFeedback>,
    ) -> Result<Layout, GenerationFailure>;

    /// Short name for logs
    fn name(&self) -> &str;
}
