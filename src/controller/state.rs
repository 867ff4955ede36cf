//! Retry-loop state and the pure transition that advances it.
//!
//! The driver owns I/O (candidate generation, telemetry); everything that decides lives here
//! so the loop can be exercised without a candidate source.

use super::decision::{ConfidenceDecision, Decision, StopReason};
use crate::analysis::QualityReport;
use crate::autofix::FixLog;
use crate::config::PolicyConfig;
use crate::error::GenerationFailure;
use crate::layout::{Hash, Layout};
use serde::{Deserialize, Serialize};

/// A candidate that was generated, validated, fixed and validated again.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedAttempt {
    pub attempt: u32,
    /// Post-fix layout
    pub layout: Layout,
    pub before: QualityReport,
    pub after: QualityReport,
    pub log: FixLog,
    /// Content hash of the post-fix layout
    pub hash: Hash,
}

impl EvaluatedAttempt {
    pub fn score(&self) -> u8 {
        self.after.score
    }

    pub fn improvement(&self) -> i16 {
        i16::from(self.after.score) - i16::from(self.before.score)
    }
}

/// A generation failure paired with the attempt it consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptFailure {
    pub attempt: u32,
    pub failure: GenerationFailure,
}

/// Loop state carried between attempts.
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    /// Attempts consumed so far, failures included
    pub attempt: u32,
    /// Highest post-fix score seen; ties keep the earlier attempt
    pub best: Option<EvaluatedAttempt>,
    pub hash_history: Vec<Hash>,
    /// Consecutive repeated hashes while a critical violation remains
    pub oscillation_streak: u32,
    pub failures: Vec<AttemptFailure>,
    pub decisions: Vec<ConfidenceDecision>,
}

/// Result of one transition.
#[derive(Debug, Clone)]
pub enum Step {
    Retry(ConfidenceDecision),
    Done {
        decision: ConfidenceDecision,
        selected: Box<EvaluatedAttempt>,
    },
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_attempt(&self) -> u32 {
        self.attempt + 1
    }

    /// Record a failed generation. Failures never enter the hash history.
    pub fn record_failure(mut self, failure: GenerationFailure) -> Self {
        self.attempt += 1;
        self.failures.push(AttemptFailure {
            attempt: self.attempt,
            failure,
        });
        self
    }

    fn best_score(&self) -> Option<u8> {
        self.best.as_ref().map(EvaluatedAttempt::score)
    }

    fn offer_best(&mut self, candidate: &EvaluatedAttempt) {
        if self.best_score().map_or(true, |best| candidate.score() > best) {
            self.best = Some(candidate.clone());
        }
    }
}

/// Advance the loop by one evaluated attempt.
///
/// Order of checks: regression, then acceptance, then oscillation, then the attempt cap.
pub fn step(mut state: LoopState, current: EvaluatedAttempt, policy: &PolicyConfig) -> (LoopState, Step) {
    state.attempt = current.attempt;
    let attempt = current.attempt;
    let has_critical = current.after.has_critical(policy);
    let is_oscillation = state.hash_history.contains(&current.hash);
    state.hash_history.push(current.hash);
    state.oscillation_streak = if is_oscillation && has_critical {
        state.oscillation_streak + 1
    } else {
        0
    };
    let is_last = attempt >= policy.attempt_limit();

    let improvement = current.improvement();
    let annotate = |mut decision: ConfidenceDecision| {
        decision.has_critical = has_critical;
        decision.is_oscillation = is_oscillation;
        decision.improvement = improvement;
        decision
    };

    let regression = current.after.introduced_since(&current.before);
    if !regression.is_empty() {
        // A higher-scoring prior attempt replaces the regressed one.
        let prior = state
            .best
            .clone()
            .filter(|best| best.score() > current.score());
        let (stop_reason, selected) = match prior {
            Some(best) => (StopReason::AutofixRegressionFallback, best),
            None => (StopReason::AutofixRegression, current),
        };
        let mut decision = annotate(ConfidenceDecision::new(attempt, Decision::Fail, stop_reason));
        decision.regression = regression;
        let decision = decision.with_confidence(policy);
        state.decisions.push(decision.clone());
        return (
            state,
            Step::Done {
                decision,
                selected: Box::new(selected),
            },
        );
    }

    state.offer_best(&current);

    let decision = if !has_critical {
        let forced = is_last && current.score() < policy.forced_accept_floor;
        let mut decision = annotate(ConfidenceDecision::new(
            attempt,
            Decision::Accept,
            if forced {
                StopReason::ForcedAccept
            } else {
                StopReason::Accepted
            },
        ));
        decision.forced_accept = forced;
        decision.with_confidence(policy)
    } else if state.oscillation_streak >= 2 {
        annotate(ConfidenceDecision::new(attempt, Decision::Fail, StopReason::Oscillation))
            .with_confidence(policy)
    } else if is_last {
        annotate(ConfidenceDecision::new(
            attempt,
            Decision::Fail,
            StopReason::MaxAttemptsWithCritical,
        ))
        .with_confidence(policy)
    } else {
        annotate(ConfidenceDecision::new(attempt, Decision::Retry, StopReason::CriticalRetry))
            .with_confidence(policy)
    };
    state.decisions.push(decision.clone());

    let step = match decision.decision {
        Decision::Retry => Step::Retry(decision),
        Decision::Accept => Step::Done {
            decision,
            selected: Box::new(current),
        },
        Decision::Fail => {
            let selected = state.best.clone().unwrap_or(current);
            Step::Done {
                decision,
                selected: Box::new(selected),
            }
        }
    };
    (state, step)
}

/// Terminal decision once the attempt budget is spent without a terminal step, which only
/// happens when the final attempt failed to generate.
pub fn exhaust(state: &LoopState, policy: &PolicyConfig) -> Option<(ConfidenceDecision, EvaluatedAttempt)> {
    let best = state.best.clone()?;
    let has_critical = best.after.has_critical(policy);
    let mut decision = if has_critical {
        ConfidenceDecision::new(
            state.attempt,
            Decision::Fail,
            StopReason::MaxAttemptsWithCritical,
        )
    } else {
        let mut accepted = ConfidenceDecision::new(
            state.attempt,
            Decision::Accept,
            StopReason::MaxAttemptsNoCritical,
        );
        accepted.forced_accept = true;
        accepted
    };
    decision.has_critical = has_critical;
    decision.improvement = best.improvement();
    Some((decision.with_confidence(policy), best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Validator;
    use crate::catalog::CategoryCatalog;
    use crate::layout::{layout_hash, Section, VisualContext};

    fn evaluated(attempt: u32, before: &Layout, after: &Layout) -> EvaluatedAttempt {
        let catalog = CategoryCatalog::default();
        let policy = PolicyConfig::default();
        let validator = Validator::new(&catalog, &policy);
        EvaluatedAttempt {
            attempt,
            layout: after.clone(),
            before: validator.validate(before),
            after: validator.validate(after),
            log: FixLog::new(),
            hash: layout_hash(after),
        }
    }

    fn clean_layout() -> Layout {
        Layout::new(vec![
            Section::new("hero", "hero_centered"),
            Section::new("features", "features"),
            Section::new("cta", "final_cta").with_context(VisualContext::Primary),
        ])
    }

    fn critical_layout() -> Layout {
        Layout::new(vec![
            Section::new("hero", "hero_centered"),
            Section::new("pricing", "pricing").with_context(VisualContext::Dark),
        ])
    }

    #[test]
    fn test_clean_attempt_is_accepted() {
        let policy = PolicyConfig::default();
        let layout = clean_layout();
        let (state, step) = step(LoopState::new(), evaluated(1, &layout, &layout), &policy);
        match step {
            Step::Done { decision, .. } => {
                assert_eq!(decision.decision, Decision::Accept);
                assert!(!decision.forced_accept);
                assert_eq!(decision.confidence, 0.9);
            }
            Step::Retry(_) => panic!("expected a terminal step"),
        }
        assert_eq!(state.hash_history.len(), 1);
    }

    #[test]
    fn test_repeated_critical_hash_fails_on_third_attempt() {
        let policy = PolicyConfig::default();
        let layout = critical_layout();
        let mut state = LoopState::new();
        let mut decisions = Vec::new();
        for attempt in 1..=3 {
            let (next, step) = step(state, evaluated(attempt, &layout, &layout), &policy);
            state = next;
            match step {
                Step::Retry(d) => decisions.push(d),
                Step::Done { decision, .. } => {
                    decisions.push(decision);
                    break;
                }
            }
        }
        let kinds: Vec<Decision> = decisions.iter().map(|d| d.decision).collect();
        assert_eq!(kinds, vec![Decision::Retry, Decision::Retry, Decision::Fail]);
        assert!(!decisions[0].is_oscillation);
        assert!(decisions[1].is_oscillation);
        assert_eq!(decisions[2].stop_reason, StopReason::Oscillation);
        assert!(!decisions[2].forced_accept);
    }

    #[test]
    fn test_regression_prefers_higher_scoring_prior() {
        let policy = PolicyConfig::default();
        let clean = clean_layout();
        let mut state = LoopState::new();
        state.best = Some(evaluated(1, &clean, &clean));
        state.attempt = 1;

        let regressed = Layout::new(vec![
            Section::new("hero", "hero_centered"),
            Section::new("pricing", "pricing").with_context(VisualContext::Dark),
        ]);
        let current = evaluated(2, &clean, &regressed);
        assert!(!current.after.introduced_since(&current.before).is_empty());

        let (_, step) = step(state, current, &policy);
        match step {
            Step::Done { decision, selected } => {
                assert_eq!(decision.decision, Decision::Fail);
                assert_eq!(decision.stop_reason, StopReason::AutofixRegressionFallback);
                assert_eq!(decision.confidence, 0.0);
                assert_eq!(selected.attempt, 1);
            }
            Step::Retry(_) => panic!("regression must be terminal"),
        }
    }

    #[test]
    fn test_regression_without_better_prior_keeps_current() {
        let policy = PolicyConfig::default();
        let clean = clean_layout();
        let regressed = Layout::new(vec![
            Section::new("hero", "hero_centered"),
            Section::new("pricing", "pricing").with_context(VisualContext::Dark),
        ]);
        let current = evaluated(1, &clean, &regressed);
        let expected_improvement = current.improvement();
        assert!(expected_improvement < 0);

        let (state, step) = step(LoopState::new(), current, &policy);
        match step {
            Step::Done { decision, selected } => {
                assert_eq!(decision.decision, Decision::Fail);
                assert_eq!(decision.stop_reason, StopReason::AutofixRegression);
                assert_eq!(decision.improvement, expected_improvement);
                assert_eq!(selected.attempt, 1);
            }
            Step::Retry(_) => panic!("regression must be terminal"),
        }
        assert_eq!(state.decisions.len(), 1);
    }

    #[test]
    fn test_decision_carries_score_improvement() {
        let policy = PolicyConfig::default();
        let before = critical_layout();
        let after = clean_layout();
        let current = evaluated(1, &before, &after);
        let expected = i16::from(current.after.score) - i16::from(current.before.score);
        assert!(expected > 0);

        let (_, step) = step(LoopState::new(), current, &policy);
        match step {
            Step::Done { decision, .. } => {
                assert_eq!(decision.decision, Decision::Accept);
                assert_eq!(decision.improvement, expected);
            }
            Step::Retry(_) => panic!("expected a terminal step"),
        }
    }

    #[test]
    fn test_exhaust_without_attempts_is_none() {
        let policy = PolicyConfig::default();
        let state = LoopState::new()
            .record_failure(GenerationFailure::new("timeout"))
            .record_failure(GenerationFailure::new("timeout"));
        assert_eq!(state.attempt, 2);
        assert!(state.hash_history.is_empty());
        assert!(exhaust(&state, &policy).is_none());
    }
}
