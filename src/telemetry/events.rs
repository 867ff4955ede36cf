//! Event schema for decision telemetry.

use crate::analysis::{QualityStatus, ScoreBreakdown, ViolationCode, WarningCode};
use crate::controller::{ConfidenceDecision, ControllerOutcome, Decision, EvaluatedAttempt, StopReason};
use crate::error::GenerationFailure;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    Attempt,
    GenerationFailed,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEnvelope {
    pub ts: String,
    pub kind: EnvelopeKind,
    pub attempt: u32,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_before_fix: Option<u8>,
    pub status: QualityStatus,
    pub forced_accept: bool,
    pub failed: bool,
    pub confidence: f64,
    pub decision: Decision,
    pub stop_reason: StopReason,
    pub improvement: i16,
    pub has_critical: bool,
    pub is_oscillation: bool,
    pub autofix_applied: bool,
    pub autofix_rules: Vec<String>,
    pub violations: Vec<ViolationCode>,
    pub warnings: Vec<WarningCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl DecisionEnvelope {
    pub fn for_attempt(evaluated: &EvaluatedAttempt, decision: &ConfidenceDecision) -> Self {
        let autofix_rules = evaluated.log.applied_rules();
        Self {
            ts: now(),
            kind: EnvelopeKind::Attempt,
            attempt: evaluated.attempt,
            score: evaluated.after.score,
            score_before_fix: Some(evaluated.before.score),
            status: evaluated.after.status,
            forced_accept: decision.forced_accept,
            failed: decision.decision == Decision::Fail,
            confidence: decision.confidence,
            decision: decision.decision,
            stop_reason: decision.stop_reason,
            improvement: decision.improvement,
            has_critical: decision.has_critical,
            is_oscillation: decision.is_oscillation,
            autofix_applied: !autofix_rules.is_empty(),
            autofix_rules,
            violations: evaluated.after.violation_codes().into_iter().collect(),
            warnings: evaluated.after.warning_codes().into_iter().collect(),
            breakdown: Some(evaluated.after.breakdown),
            error: None,
        }
    }

    pub fn for_failure(attempt: u32, failure: &GenerationFailure) -> Self {
        Self {
            ts: now(),
            kind: EnvelopeKind::GenerationFailed,
            attempt,
            score: 0,
            score_before_fix: None,
            status: QualityStatus::Reject,
            forced_accept: false,
            failed: true,
            confidence: 0.0,
            decision: Decision::Retry,
            stop_reason: StopReason::CriticalRetry,
            improvement: 0,
            has_critical: false,
            is_oscillation: false,
            autofix_applied: false,
            autofix_rules: Vec::new(),
            violations: Vec::new(),
            warnings: Vec::new(),
            breakdown: None,
            error: Some(failure.reason.clone()),
        }
    }

    pub fn for_outcome(outcome: &ControllerOutcome) -> Self {
        let decision = &outcome.decision;
        let (violations, warnings, breakdown) = match &outcome.report {
            Some(report) => (
                report.violation_codes().into_iter().collect(),
                report.warning_codes().into_iter().collect(),
                Some(report.breakdown),
            ),
            None => (Vec::new(), Vec::new(), None),
        };
        Self {
            ts: now(),
            kind: EnvelopeKind::Final,
            attempt: outcome.attempts,
            score: outcome.score,
            score_before_fix: outcome.score_before_fix,
            status: outcome.status,
            forced_accept: decision.forced_accept,
            failed: decision.decision == Decision::Fail,
            confidence: decision.confidence,
            decision: decision.decision,
            stop_reason: decision.stop_reason,
            improvement: outcome
                .score_before_fix
                .map_or(0, |before| i16::from(outcome.score) - i16::from(before)),
            has_critical: decision.has_critical,
            is_oscillation: decision.is_oscillation,
            autofix_applied: !outcome.autofix_rules.is_empty(),
            autofix_rules: outcome.autofix_rules.clone(),
            violations,
            warnings,
            breakdown,
            error: None,
        }
    }
}
