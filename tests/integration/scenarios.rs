//! End-to-end repair scenarios: validate, fix, validate again.

use crate::integration::test_utils::{duplicate_cta_page, fix_and_report, with_button};
use pagewright::analysis::{Validator, ViolationCode, WarningCode};
use pagewright::analysis::metadata::{final_cta_text, hero_cta_text};
use pagewright::autofix::{AutoFix, FixSignals, PaletteStyler, SeededIds};
use pagewright::catalog::CategoryCatalog;
use pagewright::config::PolicyConfig;
use pagewright::layout::{Layout, NarrativeRole, Section, VisualContext};
use pagewright::narrative::{roles_of, validate, OrderIssue};

#[test]
fn test_long_page_with_misplaced_cta_and_dark_pricing() {
    let policy = PolicyConfig::default();
    let layout = Layout::new(vec![
        Section::new("hero", "hero_split"),
        Section::new("problem", "problem"),
        Section::new("features", "features"),
        Section::new("cta_early", "final_cta").with_context(VisualContext::Primary),
        Section::new("testimonials", "testimonials"),
        Section::new("pricing", "pricing").with_context(VisualContext::Dark),
        Section::new("trust", "trust_metrics"),
        Section::new("how", "how_it_works"),
        Section::new("faq", "faq"),
        Section::new("contact", "contact"),
        Section::new("cta_last", "final_cta_simple"),
    ]);

    let (before, outcome, after) = fix_and_report(layout, &policy);
    assert!(before.has_violation(ViolationCode::DarkMisuse));
    assert!(before.has_warning(WarningCode::LongPage));

    let sections = &outcome.layout.sections;
    let last = sections.last().unwrap();
    assert_eq!(last.id, "cta_last");
    assert_eq!(last.context(), VisualContext::Primary);

    let early = sections.iter().find(|s| s.id == "cta_early").unwrap();
    assert_eq!(early.context(), VisualContext::Light);
    let pricing = sections.iter().find(|s| s.id == "pricing").unwrap();
    assert_eq!(pricing.context(), VisualContext::Light);

    let primaries = sections
        .iter()
        .filter(|s| s.context() == VisualContext::Primary)
        .count();
    assert_eq!(primaries, 1);
    assert!(!after.has_violation(ViolationCode::DarkMisuse));
    assert!(!after.has_violation(ViolationCode::PrimaryCountInvalid));
    assert!(!after.has_critical(&policy));
}

#[test]
fn test_missing_final_cta_is_synthesized() {
    let policy = PolicyConfig::default();
    let layout = Layout::new(vec![
        Section::new("hero", "hero_centered"),
        Section::new("features", "features"),
        Section::new("testimonials", "testimonials"),
        Section::new("faq", "faq"),
    ]);

    let (before, outcome, after) = fix_and_report(layout, &policy);
    assert!(before.has_violation(ViolationCode::MissingFinalCta));
    assert!(outcome.log.has_rule("FINAL_CTA_SYNTHESIZED"));

    let last = outcome.layout.sections.last().unwrap();
    assert_eq!(last.pattern, "final_cta");
    assert_eq!(last.context(), VisualContext::Primary);
    assert!(last.first_button_text().is_some());
    assert!(!after.has_violation(ViolationCode::MissingFinalCta));
    assert!(!after.has_violation(ViolationCode::FinalCtaNotLast));
}

#[test]
fn test_synthesized_cta_label_differs_from_hero() {
    let policy = PolicyConfig::default();
    let layout = Layout::new(vec![
        with_button(Section::new("hero", "hero_centered"), "get started today"),
        Section::new("features", "features"),
    ]);

    let (_, outcome, after) = fix_and_report(layout, &policy);
    let last = outcome.layout.sections.last().unwrap();
    assert_eq!(last.first_button_text(), Some("Start Now"));
    assert!(!after.has_violation(ViolationCode::CtaDuplicate));
}

#[test]
fn test_duplicate_cta_is_reported_but_never_rewritten() {
    let policy = PolicyConfig::default();
    let catalog = CategoryCatalog::default();

    let (before, outcome, after) = fix_and_report(duplicate_cta_page(), &policy);
    assert!(before.has_violation(ViolationCode::CtaDuplicate));
    assert!(after.has_violation(ViolationCode::CtaDuplicate));

    let sections = &outcome.layout.sections;
    assert_eq!(
        hero_cta_text(sections, &catalog).as_deref(),
        Some("Start Free Trial Now")
    );
    assert_eq!(
        final_cta_text(sections, &catalog).as_deref(),
        Some("start free trial now")
    );
}

#[test]
fn test_bounded_narrative_correction_moves_resolution_after_promise() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let layout = Layout::new(vec![
        Section::new("hook", "hero"),
        Section::new("promise", "features"),
        Section::new("cta", "final_cta"),
        Section::new("proof", "testimonials"),
        Section::new("more", "benefits"),
    ]);
    let before = validate(&roles_of(&layout.sections, &catalog));
    assert!((40..60).contains(&before.score));

    let (fixed, log) = AutoFix::new(&catalog, &policy, &styler).run_stages(
        layout,
        FixSignals::default(),
        &mut SeededIds::new(3),
        18,
        18,
    );
    assert!(log.has_rule("NR_SWAP_CTA_PROMISE"));
    assert!(log.has_rule("NR_PLACEHOLDER_RELIEF"));

    let order = fixed.order();
    let promise = order.iter().position(|id| *id == "promise").unwrap();
    let cta = order.iter().position(|id| *id == "cta").unwrap();
    assert!(cta > promise);

    let after = validate(&roles_of(&fixed.sections, &catalog));
    assert!(!after.has_issue(OrderIssue::CtaBeforePromise));
    assert!(after.score > before.score);
}

#[test]
fn test_blocked_narrative_is_left_in_place() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let layout = Layout::new(vec![
        Section::new("a", "final_cta").with_role(NarrativeRole::Resolution),
        Section::new("b", "features").with_role(NarrativeRole::Promise),
        Section::new("c", "hero").with_role(NarrativeRole::Hook),
    ]);
    assert_eq!(validate(&roles_of(&layout.sections, &catalog)).score, 30);
    let order_before: Vec<String> = layout.order().iter().map(|s| s.to_string()).collect();

    let (fixed, log) = AutoFix::new(&catalog, &policy, &styler).run_stages(
        layout,
        FixSignals::default(),
        &mut SeededIds::new(3),
        18,
        18,
    );
    assert!(log.has_rule("NR_AUTOFIX_BLOCKED"));
    assert_eq!(log.applied_count(), 0);
    assert_eq!(fixed.order(), order_before);
}

#[test]
fn test_fixing_twice_applies_nothing_new() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let validator = Validator::new(&catalog, &policy);
    let layout = Layout::new(vec![
        Section::new("hero", "hero_split"),
        Section::new("cta", "final_cta"),
        Section::new("features", "features"),
        Section::new("pricing", "pricing").with_context(VisualContext::Dark),
        Section::new("trust", "trust_metrics"),
        Section::new("faq", "faq"),
    ]);

    let fixer = AutoFix::new(&catalog, &policy, &styler);
    let signals = FixSignals::from_report(&validator.validate(&layout), &policy);
    let first = fixer.run(layout, signals, &mut SeededIds::new(5));
    assert!(first.log.applied_count() > 0);
    let fixed = validator.validate(&first.layout);
    assert!(!fixed.has_critical(&policy));

    let signals = FixSignals::from_report(&fixed, &policy);
    let second = fixer.run(first.layout.clone(), signals, &mut SeededIds::new(5));
    assert_eq!(second.log.applied_count(), 0);
    assert_eq!(second.layout, first.layout);
}

#[test]
fn test_ten_sections_without_cta_merge_once_grown() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let validator = Validator::new(&catalog, &policy);
    let layout = Layout::new(vec![
        Section::new("hero", "hero_centered"),
        Section::new("problem", "problem"),
        Section::new("features", "features"),
        Section::new("features_more", "features"),
        Section::new("how", "how_it_works"),
        Section::new("testimonials", "testimonials"),
        Section::new("trust", "trust_metrics"),
        Section::new("pricing", "pricing"),
        Section::new("faq", "faq"),
        Section::new("contact", "contact"),
    ]);
    let before = validator.validate(&layout);
    assert!(!before.has_warning(WarningCode::LongPage));

    let fixer = AutoFix::new(&catalog, &policy, &styler);
    let first = fixer.run(
        layout,
        FixSignals::from_report(&before, &policy),
        &mut SeededIds::new(8),
    );
    assert!(first.log.has_rule("FINAL_CTA_SYNTHESIZED"));
    assert!(first.log.has_rule("SECTIONS_MERGED"));
    assert!(first.layout.len() <= policy.max_sections);

    let fixed = validator.validate(&first.layout);
    let second = fixer.run(
        first.layout.clone(),
        FixSignals::from_report(&fixed, &policy),
        &mut SeededIds::new(8),
    );
    assert!(second.log.applied_rules().is_empty());
    assert_eq!(second.layout, first.layout);
}

#[test]
fn test_moving_cta_between_grids_is_not_a_regression() {
    let policy = PolicyConfig::default();
    let layout = Layout::new(vec![
        Section::new("hero", "hero_centered"),
        Section::new("grid_a", "grid_featured"),
        Section::new("cta", "final_cta").with_context(VisualContext::Primary),
        Section::new("grid_b", "grid_density"),
        Section::new("testimonials", "testimonials"),
        Section::new("faq", "faq"),
    ]);

    let (before, outcome, after) = fix_and_report(layout, &policy);
    assert!(!before.has_violation(ViolationCode::GridSequence));
    assert!(after.introduced_since(&before).is_empty());
    assert!(outcome.log.has_rule("GRID_PAIR_MERGED"));
    assert_eq!(
        outcome.layout.order(),
        vec!["hero", "grid_a", "testimonials", "faq", "cta"]
    );
}
