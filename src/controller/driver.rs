//! Bounded async driver around the pure [`step`](super::state::step) transition.

use super::decision::{ConfidenceDecision, Decision, StopReason};
use super::feedback::QualityFeedback;
use super::state::{self, AttemptFailure, EvaluatedAttempt, LoopState, Step};
use crate::analysis::{QualityReport, QualityStatus, Validator};
use crate::autofix::{AutoFix, ContextStyler, FixSignals, IdSource};
use crate::catalog::CategoryCatalog;
use crate::config::PolicyConfig;
use crate::layout::{layout_hash, Layout};
use crate::provider::{CandidateSource, GenerationContext};
use crate::telemetry::{record_best_effort, DecisionEnvelope, TelemetrySink};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Final result of a controller run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerOutcome {
    /// Selected post-fix layout; absent only when every attempt failed to generate
    pub layout: Option<Layout>,
    pub report: Option<QualityReport>,
    pub score: u8,
    pub status: QualityStatus,
    pub score_before_fix: Option<u8>,
    pub decision: ConfidenceDecision,
    /// Attempts consumed, failures included
    pub attempts: u32,
    /// Attempt the selected layout came from
    pub selected_attempt: Option<u32>,
    pub autofix_rules: Vec<String>,
    /// Every per-attempt decision, in order
    pub history: Vec<ConfidenceDecision>,
    pub failures: Vec<AttemptFailure>,
}

impl ControllerOutcome {
    fn selected(decision: ConfidenceDecision, chosen: EvaluatedAttempt, state: LoopState) -> Self {
        Self {
            score: chosen.after.score,
            status: chosen.after.status,
            score_before_fix: Some(chosen.before.score),
            selected_attempt: Some(chosen.attempt),
            autofix_rules: chosen.log.applied_rules(),
            layout: Some(chosen.layout),
            report: Some(chosen.after),
            decision,
            attempts: state.attempt,
            history: state.decisions,
            failures: state.failures,
        }
    }

    fn all_failed(state: LoopState) -> Self {
        let mut decision =
            ConfidenceDecision::new(state.attempt, Decision::Fail, StopReason::AllAttemptsFailed);
        decision.confidence = 0.0;
        Self {
            layout: None,
            report: None,
            score: 0,
            status: QualityStatus::Reject,
            score_before_fix: None,
            decision,
            attempts: state.attempt,
            selected_attempt: None,
            autofix_rules: Vec::new(),
            history: state.decisions,
            failures: state.failures,
        }
    }

    pub fn accepted(&self) -> bool {
        self.decision.decision == Decision::Accept
    }

    pub fn envelope(&self) -> DecisionEnvelope {
        DecisionEnvelope::for_outcome(self)
    }
}

/// Generate, validate, fix, re-validate, decide; at most `policy.attempt_limit()` times.
pub struct ConfidenceController<'a> {
    catalog: &'a CategoryCatalog,
    policy: &'a PolicyConfig,
    styler: &'a dyn ContextStyler,
    telemetry: Option<&'a dyn TelemetrySink>,
}

impl<'a> ConfidenceController<'a> {
    pub fn new(
        catalog: &'a CategoryCatalog,
        policy: &'a PolicyConfig,
        styler: &'a dyn ContextStyler,
    ) -> Self {
        Self {
            catalog,
            policy,
            styler,
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, sink: &'a dyn TelemetrySink) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Validate and repair one candidate without deciding anything.
    pub fn evaluate(&self, attempt: u32, candidate: Layout, ids: &mut dyn IdSource) -> EvaluatedAttempt {
        let validator = Validator::new(self.catalog, self.policy);
        let before = validator.validate(&candidate);
        let signals = FixSignals::from_report(&before, self.policy);
        let fixed = AutoFix::new(self.catalog, self.policy, self.styler).run(candidate, signals, ids);
        let after = validator
            .validate(&fixed.layout)
            .with_autofix_notices(&fixed.log);
        let hash = layout_hash(&fixed.layout);
        EvaluatedAttempt {
            attempt,
            layout: fixed.layout,
            before,
            after,
            log: fixed.log,
            hash,
        }
    }

    pub async fn run(
        &self,
        source: &dyn CandidateSource,
        context: &GenerationContext,
        ids: &mut dyn IdSource,
    ) -> ControllerOutcome {
        let limit = self.policy.attempt_limit();
        let mut state = LoopState::new();
        let mut previous: Option<QualityReport> = None;

        while state.attempt < limit {
            let attempt = state.next_attempt();
            let feedback = previous
                .as_ref()
                .and_then(|report| QualityFeedback::from_report(report, attempt, limit));
            let attempt_context = context.for_attempt(attempt, limit);

            let candidate = match source.generate(&attempt_context, feedback.as_ref()).await {
                Ok(layout) => layout,
                Err(failure) => {
                    warn!(
                        attempt,
                        source = source.name(),
                        reason = %failure.reason,
                        "candidate generation failed"
                    );
                    record_best_effort(
                        self.telemetry,
                        &DecisionEnvelope::for_failure(attempt, &failure),
                    );
                    state = state.record_failure(failure);
                    continue;
                }
            };

            let evaluated = self.evaluate(attempt, candidate, ids);
            previous = Some(evaluated.after.clone());
            let (next, step) = state::step(state, evaluated.clone(), self.policy);
            state = next;

            let decision = match &step {
                Step::Retry(decision) => decision,
                Step::Done { decision, .. } => decision,
            };
            info!(
                attempt,
                score_before = evaluated.before.score,
                score = evaluated.after.score,
                decision = %decision.decision,
                stop_reason = %decision.stop_reason,
                confidence = decision.confidence,
                oscillation = decision.is_oscillation,
                "attempt decided"
            );
            if decision.is_regression() {
                warn!(
                    attempt,
                    introduced = ?decision.regression,
                    stop_reason = %decision.stop_reason,
                    "autofix introduced violations"
                );
            }
            record_best_effort(
                self.telemetry,
                &DecisionEnvelope::for_attempt(&evaluated, decision),
            );

            if let Step::Done { decision, selected } = step {
                return self.finish(ControllerOutcome::selected(decision, *selected, state));
            }
        }

        let outcome = match state::exhaust(&state, self.policy) {
            Some((decision, best)) => ControllerOutcome::selected(decision, best, state),
            None => ControllerOutcome::all_failed(state),
        };
        self.finish(outcome)
    }

    fn finish(&self, outcome: ControllerOutcome) -> ControllerOutcome {
        info!(
            attempts = outcome.attempts,
            score = outcome.score,
            decision = %outcome.decision.decision,
            stop_reason = %outcome.decision.stop_reason,
            forced_accept = outcome.decision.forced_accept,
            "controller finished"
        );
        record_best_effort(self.telemetry, &outcome.envelope());
        outcome
    }
}
