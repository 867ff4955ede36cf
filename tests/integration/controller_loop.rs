//! Confidence controller driven by scripted candidate sources.

use crate::integration::test_utils::duplicate_cta_page;
use pagewright::analysis::ViolationCode;
use pagewright::autofix::{PaletteStyler, SeededIds};
use pagewright::catalog::CategoryCatalog;
use pagewright::config::PolicyConfig;
use pagewright::controller::{ConfidenceController, Decision, StopReason};
use pagewright::layout::{Layout, Section, VisualContext};
use pagewright::provider::scripted::{ScriptedCandidates, ScriptedItem};
use pagewright::provider::GenerationContext;
use pagewright::telemetry::{EnvelopeKind, MemoryTelemetrySink};
use serde_json::json;

fn clean_page() -> Layout {
    Layout::new(vec![
        Section::new("hero", "hero_centered"),
        Section::new("features", "features"),
        Section::new("cta", "final_cta").with_context(VisualContext::Primary),
    ])
}

/// Default policy plus CTA_DUPLICATE as a blocking violation, which no fix stage repairs.
fn strict_policy() -> PolicyConfig {
    let mut policy = PolicyConfig::default();
    policy.critical_violations.push(ViolationCode::CtaDuplicate);
    policy
}

fn context() -> GenerationContext {
    GenerationContext::new(json!({ "brief": "landing page" }))
}

#[tokio::test]
async fn test_clean_candidate_is_accepted_first_time() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let sink = MemoryTelemetrySink::new();
    let source = ScriptedCandidates::from_layouts(vec![clean_page(), clean_page()]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .with_telemetry(&sink)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    assert!(outcome.accepted());
    assert_eq!(outcome.decision.stop_reason, StopReason::Accepted);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.selected_attempt, Some(1));
    assert!(outcome.layout.is_some());
    assert_eq!(source.remaining(), 1);
    assert_eq!(source.received_feedback(), vec![None]);

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, EnvelopeKind::Attempt);
    assert_eq!(records[1].kind, EnvelopeKind::Final);
    assert_eq!(records[1].decision, Decision::Accept);
}

#[tokio::test]
async fn test_cta_between_grids_is_repaired_and_accepted() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let page = Layout::new(vec![
        Section::new("hero", "hero_centered"),
        Section::new("grid_a", "grid_featured"),
        Section::new("cta", "final_cta").with_context(VisualContext::Primary),
        Section::new("grid_b", "grid_density"),
        Section::new("testimonials", "testimonials"),
        Section::new("faq", "faq"),
    ]);
    let source = ScriptedCandidates::from_layouts(vec![page]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    assert!(outcome.accepted());
    assert_eq!(outcome.decision.stop_reason, StopReason::Accepted);
    assert!(outcome.decision.regression.is_empty());
    assert!(outcome.decision.improvement > 0);
    assert!(outcome.autofix_rules.contains(&"GRID_PAIR_MERGED".to_string()));
}

#[tokio::test]
async fn test_repeated_critical_candidate_ends_in_oscillation() {
    let catalog = CategoryCatalog::default();
    let policy = strict_policy();
    let styler = PaletteStyler::default();
    let source = ScriptedCandidates::from_layouts(vec![
        duplicate_cta_page(),
        duplicate_cta_page(),
        duplicate_cta_page(),
    ]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    let decisions: Vec<Decision> = outcome.history.iter().map(|d| d.decision).collect();
    assert_eq!(decisions, vec![Decision::Retry, Decision::Retry, Decision::Fail]);
    assert_eq!(outcome.decision.stop_reason, StopReason::Oscillation);
    assert!(outcome.decision.is_oscillation);
    assert!(!outcome.decision.forced_accept);
    assert_eq!(outcome.decision.confidence, policy.confidence_critical);
    assert!(outcome.layout.is_some());
}

#[tokio::test]
async fn test_feedback_reaches_the_second_call() {
    let catalog = CategoryCatalog::default();
    let policy = strict_policy();
    let styler = PaletteStyler::default();
    let source = ScriptedCandidates::from_layouts(vec![duplicate_cta_page(), clean_page()]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    assert!(outcome.accepted());
    assert_eq!(outcome.selected_attempt, Some(2));

    let feedback = source.received_feedback();
    assert_eq!(feedback.len(), 2);
    assert!(feedback[0].is_none());
    let second = feedback[1].as_ref().unwrap();
    assert_eq!(second.attempt, 2);
    assert!(!second.final_attempt);
    assert!(second.issues.iter().any(|i| i.starts_with("VIOLATION ")));
    assert!(second.to_string().contains("Issues detected:"));
}

#[tokio::test]
async fn test_generation_failure_then_success() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let sink = MemoryTelemetrySink::new();
    let source = ScriptedCandidates::new(vec![
        ScriptedItem::Failure("upstream timeout".to_string()),
        ScriptedItem::from(clean_page()),
    ]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .with_telemetry(&sink)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    assert!(outcome.accepted());
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.selected_attempt, Some(2));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].attempt, 1);
    assert_eq!(source.received_feedback(), vec![None, None]);

    let kinds: Vec<EnvelopeKind> = sink.records().iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![EnvelopeKind::GenerationFailed, EnvelopeKind::Attempt, EnvelopeKind::Final]
    );
}

#[tokio::test]
async fn test_all_attempts_failing_yields_no_layout() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let source = ScriptedCandidates::new(Vec::new());

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    assert_eq!(outcome.decision.decision, Decision::Fail);
    assert_eq!(outcome.decision.stop_reason, StopReason::AllAttemptsFailed);
    assert_eq!(outcome.score, 0);
    assert!(outcome.layout.is_none());
    assert_eq!(outcome.failures.len(), 3);
    assert!(outcome.history.is_empty());
}

#[tokio::test]
async fn test_exhaustion_after_critical_attempt_fails() {
    let catalog = CategoryCatalog::default();
    let policy = strict_policy();
    let styler = PaletteStyler::default();
    let source = ScriptedCandidates::new(vec![
        ScriptedItem::from(duplicate_cta_page()),
        ScriptedItem::Failure("rate limited".to_string()),
        ScriptedItem::Failure("rate limited".to_string()),
    ]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    assert_eq!(outcome.decision.decision, Decision::Fail);
    assert_eq!(outcome.decision.stop_reason, StopReason::MaxAttemptsWithCritical);
    assert_eq!(outcome.selected_attempt, Some(1));
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome.layout.is_some());
}

#[tokio::test]
async fn test_single_attempt_below_floor_is_forced() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig {
        max_attempts: 1,
        forced_accept_floor: 25,
        ..Default::default()
    };
    let styler = PaletteStyler::default();
    let source = ScriptedCandidates::from_layouts(vec![clean_page()]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .run(&source, &context(), &mut SeededIds::new(1))
        .await;

    assert!(outcome.accepted());
    assert_eq!(outcome.decision.forced_accept, outcome.score < 25);
    let expected = if outcome.score < 25 {
        StopReason::ForcedAccept
    } else {
        StopReason::Accepted
    };
    assert_eq!(outcome.decision.stop_reason, expected);
}
