//! Decision logs written by a full controller run.

use pagewright::autofix::{PaletteStyler, SeededIds};
use pagewright::catalog::CategoryCatalog;
use pagewright::config::PolicyConfig;
use pagewright::controller::ConfidenceController;
use pagewright::layout::{Layout, Section, VisualContext};
use pagewright::provider::scripted::{ScriptedCandidates, ScriptedItem};
use pagewright::provider::GenerationContext;
use pagewright::telemetry::{DecisionEnvelope, JsonlTelemetrySink};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn misplaced_cta_page() -> Layout {
    Layout::new(vec![
        Section::new("hero", "hero_centered"),
        Section::new("cta", "final_cta"),
        Section::new("features", "features"),
        Section::new("pricing", "pricing").with_context(VisualContext::Dark),
    ])
}

#[tokio::test]
async fn test_jsonl_log_has_one_line_per_event() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs").join("decisions.jsonl");
    let sink = JsonlTelemetrySink::open(&path).unwrap();

    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let source = ScriptedCandidates::new(vec![
        ScriptedItem::Failure("connection reset".to_string()),
        ScriptedItem::from(misplaced_cta_page()),
    ]);

    let outcome = ConfidenceController::new(&catalog, &policy, &styler)
        .with_telemetry(&sink)
        .run(&source, &GenerationContext::new(json!({})), &mut SeededIds::new(9))
        .await;
    assert!(outcome.accepted());

    let raw = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 3);

    let failed: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(failed["kind"], "generation_failed");
    assert_eq!(failed["error"], "connection reset");

    let attempt: DecisionEnvelope = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(attempt.attempt, 2);
    assert!(attempt.autofix_applied);
    assert!(attempt.autofix_rules.iter().any(|r| r == "FINAL_CTA_MOVED"));
    assert!(attempt.autofix_rules.iter().any(|r| r == "FORCE_LIGHT"));
    assert!(attempt.score_before_fix.is_some());

    let last: Value = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(last["kind"], "final");
    assert_eq!(last["decision"], "ACCEPT");
    assert_eq!(last["stop_reason"], "ACCEPTED");
    assert!(last["ts"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_jsonl_sink_appends_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("decisions.jsonl");

    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();

    for _ in 0..2 {
        let sink = JsonlTelemetrySink::open(&path).unwrap();
        let source = ScriptedCandidates::from_layouts(vec![misplaced_cta_page()]);
        ConfidenceController::new(&catalog, &policy, &styler)
            .with_telemetry(&sink)
            .run(&source, &GenerationContext::new(json!({})), &mut SeededIds::new(9))
            .await;
    }

    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 4);
    for line in raw.lines() {
        let envelope: DecisionEnvelope = serde_json::from_str(line).unwrap();
        assert!(envelope.score <= 25);
    }
}
