//! Decision values produced by the retry controller.

use crate::analysis::ViolationCode;
use crate::config::PolicyConfig;
use serde::{Deserialize, Serialize};

string_enum! {
    /// What the controller does after an attempt.
    pub enum Decision {
        Accept => "ACCEPT",
        Retry => "RETRY",
        Fail => "FAIL",
    }
}

string_enum! {
    /// Why the controller stopped (or, for `CriticalRetry`, why it went on).
    pub enum StopReason {
        Accepted => "ACCEPTED",
        ForcedAccept => "FORCED_ACCEPT",
        CriticalRetry => "CRITICAL_RETRY",
        Oscillation => "OSCILLATION",
        MaxAttemptsWithCritical => "MAX_ATTEMPTS_WITH_CRITICAL",
        MaxAttemptsNoCritical => "MAX_ATTEMPTS_NO_CRITICAL",
        AutofixRegression => "AUTOFIX_REGRESSION",
        AutofixRegressionFallback => "AUTOFIX_REGRESSION_FALLBACK",
        AllAttemptsFailed => "ALL_ATTEMPTS_FAILED",
    }
}

impl Decision {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Decision::Retry)
    }
}

/// One decision with the policy-derived confidence that backs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceDecision {
    pub attempt: u32,
    pub confidence: f64,
    pub decision: Decision,
    pub stop_reason: StopReason,
    pub forced_accept: bool,
    pub has_critical: bool,
    pub is_oscillation: bool,
    /// Post-fix score minus pre-fix score for this attempt
    #[serde(default)]
    pub improvement: i16,
    /// Violation codes the fix pipeline introduced on this attempt
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regression: Vec<ViolationCode>,
}

impl ConfidenceDecision {
    pub(crate) fn new(attempt: u32, decision: Decision, stop_reason: StopReason) -> Self {
        Self {
            attempt,
            confidence: 0.0,
            decision,
            stop_reason,
            forced_accept: false,
            has_critical: false,
            is_oscillation: false,
            improvement: 0,
            regression: Vec::new(),
        }
    }

    /// Confidence lookup: clean, critical, or the regression override.
    pub(crate) fn with_confidence(mut self, policy: &PolicyConfig) -> Self {
        self.confidence = if !self.regression.is_empty() {
            policy.confidence_regression
        } else if self.has_critical {
            policy.confidence_critical
        } else {
            policy.confidence_clean
        };
        self
    }

    pub fn is_regression(&self) -> bool {
        !self.regression.is_empty()
    }
}
