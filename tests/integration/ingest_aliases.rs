//! Generated documents on disk, resolved through every attribute alias and then validated.

use pagewright::analysis::{Validator, ViolationCode};
use pagewright::catalog::CategoryCatalog;
use pagewright::config::PolicyConfig;
use pagewright::error::ApiError;
use pagewright::layout::{ingest, NarrativeRole, VisualContext};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_generated_document_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("candidate.json");
    let doc = json!({
        "patterns": [
            {
                "_pattern": "Hero_Split",
                "id": "top",
                "children": [{
                    "children": [{
                        "children": [
                            { "type": "heading", "attrs": { "text": "Ship faster" } },
                            { "type": "button", "attrs": { "text": "Book a demo" } }
                        ]
                    }]
                }]
            },
            { "pattern": "pricing", "attrs": { "_visual_context": "DARK" } },
            { "pattern": "testimonials", "attrs": { "narrative_role": "PROOF" } },
            {
                "attrs": { "_pattern": "final_cta", "visual_context": "PRIMARY" },
                "content": [{
                    "content": [{
                        "content": [{ "type": "button", "attrs": { "text": "Book a demo" } }]
                    }]
                }]
            }
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    let layout = ingest::from_path(&path).unwrap();
    assert_eq!(layout.patterns(), vec!["hero_split", "pricing", "testimonials", "final_cta"]);
    assert_eq!(layout.sections[0].id, "top");
    assert_eq!(layout.sections[1].id, "section_1");
    assert_eq!(layout.sections[0].first_button_text(), Some("Book a demo"));
    assert_eq!(layout.sections[1].visual_context, Some(VisualContext::Dark));
    assert_eq!(layout.sections[2].narrative_role, Some(NarrativeRole::Proof));
    assert_eq!(layout.sections[3].context(), VisualContext::Primary);

    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let report = Validator::new(&catalog, &policy).validate(&layout);
    assert!(report.has_violation(ViolationCode::DarkMisuse));
    assert!(report.has_violation(ViolationCode::CtaDuplicate));
    assert!(!report.has_violation(ViolationCode::MissingFinalCta));
}

#[test]
fn test_module_attribute_aliases_survive_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grid.json");
    let doc = json!([{
        "pattern": "grid_featured",
        "rows": [{
            "columns": [{
                "modules": [
                    { "type": "blurb", "attrs": { "icon": "bolt" } },
                    { "kind": "number_counter", "attrs": { "percent_sign": "%", "suffix": "x" } }
                ]
            }]
        }]
    }]);
    fs::write(&path, doc.to_string()).unwrap();

    let layout = ingest::from_path(&path).unwrap();
    let modules: Vec<_> = layout.sections[0].modules().collect();
    assert_eq!(modules.len(), 2);
    assert!(modules[0].is("blurb"));
    assert_eq!(modules[0].text_attr("font_icon"), Some("bolt"));
    // An explicit canonical value wins over its alias.
    assert_eq!(modules[1].text_attr("suffix"), Some("x"));
}

#[test]
fn test_malformed_file_is_an_ingest_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"patterns\": [").unwrap();

    match ingest::from_path(&path) {
        Err(ApiError::IngestError(msg)) => assert!(msg.contains("broken.json")),
        other => panic!("expected IngestError, got {:?}", other),
    }
    assert!(ingest::from_path(&dir.path().join("missing.json")).is_err());
}
