//! Invariants that hold for any generated layout

use pagewright::analysis::scorer::TOTAL_MAX;
use pagewright::analysis::{QualityStatus, Validator, ViolationCode};
use pagewright::autofix::{AutoFix, FixSignals, PaletteStyler, SeededIds};
use pagewright::catalog::CategoryCatalog;
use pagewright::config::PolicyConfig;
use pagewright::layout::{layout_hash, Layout, Section, VisualContext};
use proptest::prelude::*;

const PATTERNS: [&str; 16] = [
    "hero_centered",
    "hero_split",
    "problem",
    "features",
    "grid_featured",
    "grid_density",
    "testimonials",
    "trust_metrics",
    "stats",
    "pricing",
    "faq",
    "how_it_works",
    "contact",
    "breathing_space",
    "final_cta",
    "final_cta_simple",
];

const CONTEXTS: [Option<VisualContext>; 4] = [
    None,
    Some(VisualContext::Light),
    Some(VisualContext::Dark),
    Some(VisualContext::Primary),
];

fn layout_strategy() -> impl Strategy<Value = Layout> {
    prop::collection::vec((0..PATTERNS.len(), 0..CONTEXTS.len()), 0..14).prop_map(|picks| {
        let sections = picks
            .into_iter()
            .enumerate()
            .map(|(i, (pattern, context))| {
                let mut section = Section::new(format!("s{}", i), PATTERNS[pattern]);
                section.visual_context = CONTEXTS[context];
                section
            })
            .collect();
        Layout::new(sections)
    })
}

/// Score never exceeds the maximum and the status band always matches the score
#[test]
fn test_score_and_status_are_consistent() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let validator = Validator::new(&catalog, &policy);
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&layout_strategy(), |layout| {
            let report = validator.validate(&layout);
            prop_assert!(report.score <= TOTAL_MAX);
            prop_assert_eq!(report.score, report.breakdown.total());
            prop_assert_eq!(report.status, QualityStatus::from_score(report.score));
            Ok(())
        })
        .unwrap();
}

/// After the context stages: DARK within budget, one PRIMARY, and it is the last final CTA
#[test]
fn test_context_stages_establish_postcondition() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let fixer = AutoFix::new(&catalog, &policy, &styler);
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&layout_strategy(), |layout| {
            let (fixed, _) =
                fixer.run_stages(layout, FixSignals::default(), &mut SeededIds::new(1), 1, 6);

            let dark = fixed
                .iter()
                .filter(|s| s.context() == VisualContext::Dark)
                .count();
            prop_assert!(dark <= policy.max_dark_sections);

            let primaries: Vec<usize> = fixed
                .iter()
                .enumerate()
                .filter(|(_, s)| s.context() == VisualContext::Primary)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(primaries, vec![fixed.len() - 1]);

            let last = &fixed.sections[fixed.len() - 1];
            prop_assert!(catalog.is_final_cta(&last.pattern));
            prop_assert!(fixed
                .iter()
                .all(|s| s.context() != VisualContext::Dark || !catalog.dark_is_misuse(&s.pattern)));
            Ok(())
        })
        .unwrap();
}

/// A second pass of the context stages applies nothing
#[test]
fn test_context_stages_are_idempotent() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let fixer = AutoFix::new(&catalog, &policy, &styler);
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&layout_strategy(), |layout| {
            let (once, _) =
                fixer.run_stages(layout, FixSignals::default(), &mut SeededIds::new(1), 1, 7);
            let (twice, log) = fixer.run_stages(
                once.clone(),
                FixSignals::default(),
                &mut SeededIds::new(2),
                1,
                7,
            );
            prop_assert_eq!(log.applied_count(), 0);
            prop_assert_eq!(twice, once);
            Ok(())
        })
        .unwrap();
}

/// The full pipeline never raises a violation the input did not already have
#[test]
fn test_pipeline_never_introduces_violations() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let validator = Validator::new(&catalog, &policy);
    let fixer = AutoFix::new(&catalog, &policy, &styler);
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&layout_strategy(), |layout| {
            let before = validator.validate(&layout);
            let signals = FixSignals::from_report(&before, &policy);
            let outcome = fixer.run(layout, signals, &mut SeededIds::new(1));
            let after = validator.validate(&outcome.layout);

            let introduced = after.introduced_since(&before);
            prop_assert!(
                introduced.is_empty(),
                "introduced {:?} in {:?}",
                introduced,
                outcome.layout.order()
            );
            prop_assert!(!after.has_violation(ViolationCode::DarkMisuse));
            Ok(())
        })
        .unwrap();
}

/// Re-running the whole pipeline on its own output, with signals read from that output,
/// applies nothing
#[test]
fn test_full_pipeline_is_idempotent() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let validator = Validator::new(&catalog, &policy);
    let fixer = AutoFix::new(&catalog, &policy, &styler);
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&layout_strategy(), |layout| {
            let signals = FixSignals::from_report(&validator.validate(&layout), &policy);
            let first = fixer.run(layout, signals, &mut SeededIds::new(6));

            let signals = FixSignals::from_report(&validator.validate(&first.layout), &policy);
            let second = fixer.run(first.layout.clone(), signals, &mut SeededIds::new(7));

            prop_assert_eq!(second.log.applied_rules(), Vec::<String>::new());
            prop_assert_eq!(second.layout, first.layout);
            Ok(())
        })
        .unwrap();
}

/// Same input and seed give the same repaired layout and hash
#[test]
fn test_repair_and_hash_are_deterministic() {
    let catalog = CategoryCatalog::default();
    let policy = PolicyConfig::default();
    let styler = PaletteStyler::default();
    let validator = Validator::new(&catalog, &policy);
    let fixer = AutoFix::new(&catalog, &policy, &styler);
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&layout_strategy(), |layout| {
            let signals = FixSignals::from_report(&validator.validate(&layout), &policy);
            let a = fixer.run(layout.clone(), signals, &mut SeededIds::new(4));
            let b = fixer.run(layout, signals, &mut SeededIds::new(4));

            prop_assert_eq!(&a.layout, &b.layout);
            prop_assert_eq!(layout_hash(&a.layout), layout_hash(&b.layout));
            prop_assert_eq!(a.log, b.log);
            Ok(())
        })
        .unwrap();
}
