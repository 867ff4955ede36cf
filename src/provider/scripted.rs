//! Replays a fixed sequence of candidates, one per call.

use super::{CandidateSource, GenerationContext};
use crate::controller::QualityFeedback;
use crate::error::GenerationFailure;
use crate::layout::Layout;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedItem {
    Layout(Layout),
    Failure(String),
}

impl From<Layout> for ScriptedItem {
    fn from(layout: Layout) -> Self {
        ScriptedItem::Layout(layout)
    }
}

/// Deterministic source for tests and `pagewright run`. Once the script is used up every call
/// fails; the feedback it was handed is kept for inspection.
#[derive(Debug, Default)]
pub struct ScriptedCandidates {
    queue: Mutex<VecDeque<ScriptedItem>>,
    feedback: Mutex<Vec<Option<QualityFeedback>>>,
}

impl ScriptedCandidates {
    pub fn new(items: impl IntoIterator<Item = ScriptedItem>) -> Self {
        Self {
            queue: Mutex::new(items.into_iter().collect()),
            feedback: Mutex::new(Vec::new()),
        }
    }

    pub fn from_layouts(layouts: impl IntoIterator<Item = Layout>) -> Self {
        Self::new(layouts.into_iter().map(ScriptedItem::Layout))
    }

    /// Feedback received per call, in call order.
    pub fn received_feedback(&self) -> Vec<Option<QualityFeedback>> {
        self.feedback.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

#[async_trait]
impl CandidateSource for ScriptedCandidates {
    async fn generate(
        &self,
        _context: &GenerationContext,
        feedback: Option<&QualityFeedback>,
    ) -> Result<Layout, GenerationFailure> {
        self.feedback.lock().push(feedback.cloned());
        match self.queue.lock().pop_front() {
            Some(ScriptedItem::Layout(layout)) => Ok(layout),
            Some(ScriptedItem::Failure(reason)) => Err(GenerationFailure::new(reason)),
            None => Err(GenerationFailure::new("script exhausted")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
