//! Shared test utilities for integration tests
//!
//! Layout builders used across scenarios, plus XDG isolation for configuration tests.

use pagewright::autofix::{AutoFix, FixOutcome, FixSignals, PaletteStyler, SeededIds};
use pagewright::analysis::{QualityReport, Validator};
use pagewright::catalog::CategoryCatalog;
use pagewright::config::PolicyConfig;
use pagewright::layout::{Column, Layout, Module, Row, Section, VisualContext};
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes environment mutation across tests in this binary.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with XDG_CONFIG_HOME and HOME pointed into `test_dir`, restoring both afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved_home = std::env::var("HOME").ok();
    let saved_xdg = std::env::var("XDG_CONFIG_HOME").ok();

    let home = test_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path());

    let result = f();

    match saved_home {
        Some(v) => std::env::set_var("HOME", v),
        None => std::env::remove_var("HOME"),
    }
    match saved_xdg {
        Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
    result
}

/// Section with a single button module.
pub fn with_button(section: Section, label: &str) -> Section {
    let button = Module::new(format!("{}_btn", section.id), "button").with_attr("text", label);
    let column = Column::new(format!("{}_col", section.id), vec![button]);
    let id = format!("{}_row", section.id);
    section.with_rows(vec![Row::new(id, vec![column])])
}

/// A complete, well-ordered page whose hero and final CTA share the same label.
pub fn duplicate_cta_page() -> Layout {
    Layout::new(vec![
        with_button(Section::new("hero", "hero_centered"), "Start Free Trial Now"),
        Section::new("features", "features"),
        Section::new("testimonials", "testimonials"),
        Section::new("trust", "trust_metrics"),
        Section::new("faq", "faq"),
        with_button(
            Section::new("cta", "final_cta").with_context(VisualContext::Primary),
            "start free trial now",
        ),
    ])
}

/// Validate, fix with default collaborators, validate again.
pub fn fix_and_report(
    layout: Layout,
    policy: &PolicyConfig,
) -> (QualityReport, FixOutcome, QualityReport) {
    let catalog = CategoryCatalog::default();
    let styler = PaletteStyler::default();
    let validator = Validator::new(&catalog, policy);

    let before = validator.validate(&layout);
    let signals = FixSignals::from_report(&before, policy);
    let outcome = AutoFix::new(&catalog, policy, &styler).run(layout, signals, &mut SeededIds::new(42));
    let after = validator
        .validate(&outcome.layout)
        .with_autofix_notices(&outcome.log);
    (before, outcome, after)
}
