//! Confidence Controller
//!
//! Bounded generate, validate, fix, re-validate, decide loop. The decision policy is a pure
//! transition over [`LoopState`]; [`ConfidenceController`] only drives it against a
//! [`CandidateSource`](crate::provider::CandidateSource) and emits telemetry.
//!
//! Per attempt:
//! 1. obtain a candidate (with feedback from the previous attempt from attempt 2 onward)
//! 2. validate, run the fix pipeline, validate again
//! 3. any violation present after the fix but absent before is a regression: FAIL
//! 4. no critical violation: ACCEPT (forced when the last attempt scores below the floor)
//! 5. critical and the post-fix hash repeated twice in a row: FAIL
//! 6. critical on the last attempt: FAIL; otherwise RETRY
//!
//! Confidence is a lookup, not an estimate: see [`PolicyConfig`](crate::config::PolicyConfig).

pub mod decision;
pub mod driver;
pub mod feedback;
pub mod state;

pub use decision::{ConfidenceDecision, Decision, StopReason};
pub use driver::{ConfidenceController, ControllerOutcome};
pub use feedback::QualityFeedback;
pub use state::{exhaust, step, AttemptFailure, EvaluatedAttempt, LoopState, Step};
