//! Stages 1-7: visual context.
//!
//! Postcondition after stage 6: at most `max_dark_sections` DARK sections, none misused, and
//! exactly one PRIMARY section which is the final call-to-action.

use crate::analysis::metadata::{canonical_final_cta, fold_text, hero_cta_text};
use crate::autofix::pipeline::FixContext;
use crate::autofix::FixLog;
use crate::catalog::Category;
use crate::layout::{Column, Layout, Module, Row, Section, VisualContext};

pub const FINAL_CTA_PATTERN: &str = "final_cta";
const FINAL_CTA_HEADING: &str = "Ready to Get Started?";
const FINAL_CTA_TEXT: &str =
    "Take the next step and discover how we can help you achieve your goals.";
const FINAL_CTA_LABEL: &str = "Get Started Today";
const FINAL_CTA_FALLBACK_LABEL: &str = "Start Now";

/// 1. DARK on a section that may not be dark becomes LIGHT.
pub fn force_light(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    for (index, section) in layout.sections.iter_mut().enumerate() {
        if section.context() == VisualContext::Dark
            && ctx.catalog.dark_is_misuse(&section.pattern)
        {
            ctx.styler.apply(section, VisualContext::Light);
            section.tag("dark_misuse");
            log.applied(
                1,
                "FORCE_LIGHT",
                Some(index),
                format!("{} forced LIGHT", section.pattern),
            );
        }
    }
    (layout, log)
}

/// 2. Only the canonical final call-to-action may be PRIMARY.
pub fn primary_context(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let canonical = canonical_final_cta(&layout.sections, ctx.catalog);

    for (index, section) in layout.sections.iter_mut().enumerate() {
        let is_canonical = Some(index) == canonical;
        match section.context() {
            VisualContext::Primary if !is_canonical => {
                ctx.styler.apply(section, VisualContext::Light);
                section.tag("primary_misuse");
                log.applied(
                    2,
                    "PRIMARY_DEMOTED",
                    Some(index),
                    format!("{} demoted from PRIMARY to LIGHT", section.pattern),
                );
            }
            context if is_canonical && context != VisualContext::Primary => {
                ctx.styler.apply(section, VisualContext::Primary);
                section.tag("primary_promoted");
                log.applied(
                    2,
                    "PRIMARY_PROMOTED",
                    Some(index),
                    format!("{} promoted to PRIMARY", section.pattern),
                );
            }
            _ => {}
        }
    }
    (layout, log)
}

/// 3. Append a canonical final call-to-action when the page has none.
pub fn synthesize_final_cta(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    if layout.iter().any(|s| ctx.catalog.is_final_cta(&s.pattern)) {
        return (layout, log);
    }

    // The new label must differ from the hero's so the fix never introduces a duplicate.
    let label = match hero_cta_text(&layout.sections, ctx.catalog) {
        Some(hero) if fold_text(&hero) == fold_text(FINAL_CTA_LABEL) => FINAL_CTA_FALLBACK_LABEL,
        _ => FINAL_CTA_LABEL,
    };

    let ids = &mut *ctx.ids;
    let modules = vec![
        Module::new(ids.next_id("module"), "heading")
            .with_attr("text", FINAL_CTA_HEADING)
            .with_attr("level", "h2"),
        Module::new(ids.next_id("module"), "text").with_attr("content", FINAL_CTA_TEXT),
        Module::new(ids.next_id("module"), "button")
            .with_attr("text", label)
            .with_attr("link_url", "#contact"),
    ];
    let column = Column::new(ids.next_id("column"), modules);
    let row = Row::new(ids.next_id("row"), vec![column]);
    let mut section = Section::new(ids.next_id("section"), FINAL_CTA_PATTERN).with_rows(vec![row]);
    section.padding = Some(80);
    section.tag("final_cta_synthesized");
    ctx.styler.apply(&mut section, VisualContext::Primary);

    layout.sections.push(section);
    log.applied(
        3,
        "FINAL_CTA_SYNTHESIZED",
        Some(layout.len() - 1),
        format!("appended final call-to-action \"{}\"", label),
    );
    (layout, log)
}

/// 4. The canonical final call-to-action moves to the end.
///
/// Two grid sections left adjacent by the move are merged into the first of them.
pub fn final_cta_last(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let Some(index) = canonical_final_cta(&layout.sections, ctx.catalog) else {
        return (layout, log);
    };
    if index + 1 == layout.len() {
        return (layout, log);
    }

    let mut section = layout.sections.remove(index);
    let closed_grid_gap = index > 0
        && index < layout.len()
        && layout.sections[index - 1..=index]
            .iter()
            .all(|s| ctx.catalog.resolve_category(&s.pattern) == Category::Grid);
    if closed_grid_gap {
        let absorbed = layout.sections.remove(index);
        let target = &mut layout.sections[index - 1];
        target.rows.extend(absorbed.rows);
        target.tag("merged");
        log.applied(
            4,
            "GRID_PAIR_MERGED",
            Some(index - 1),
            format!("{} absorbed {}", target.id, absorbed.id),
        );
    }

    section.tag("final_cta_moved");
    layout.sections.push(section);
    log.applied(
        4,
        "FINAL_CTA_MOVED",
        Some(index),
        format!("final call-to-action moved from {} to the end", index),
    );
    (layout, log)
}

/// 5. Trust sections go DARK, in page order, up to the DARK budget.
pub fn trust_dark(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let budget = ctx.policy.max_dark_sections;
    let mut dark_trust = layout
        .iter()
        .filter(|s| ctx.catalog.is_trust(&s.pattern) && s.context() == VisualContext::Dark)
        .count();

    for (index, section) in layout.sections.iter_mut().enumerate() {
        if dark_trust >= budget {
            break;
        }
        if ctx.catalog.is_trust(&section.pattern)
            && ctx.catalog.is_dark_allowed(&section.pattern)
            && section.context() == VisualContext::Light
        {
            ctx.styler.apply(section, VisualContext::Dark);
            section.tag("trust_dark");
            dark_trust += 1;
            log.applied(
                5,
                "TRUST_DARK",
                Some(index),
                format!("{} set DARK", section.pattern),
            );
        }
    }
    (layout, log)
}

/// 6. Keep at most `max_dark_sections` DARK sections: trust first, then hero, then page order.
pub fn dark_budget(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let mut dark: Vec<(u8, usize)> = layout
        .iter()
        .enumerate()
        .filter(|(_, s)| s.context() == VisualContext::Dark)
        .map(|(i, s)| {
            let priority = match ctx.catalog.resolve_category(&s.pattern) {
                Category::TrustMetrics => 0,
                Category::Hero => 1,
                _ => 2,
            };
            (priority, i)
        })
        .collect();
    if dark.len() <= ctx.policy.max_dark_sections {
        return (layout, log);
    }

    dark.sort();
    for (_, index) in dark.into_iter().skip(ctx.policy.max_dark_sections) {
        let section = &mut layout.sections[index];
        ctx.styler.apply(section, VisualContext::Light);
        section.tag("dark_overflow");
        log.applied(
            6,
            "DARK_DEMOTED",
            Some(index),
            format!("{} demoted to LIGHT (DARK budget)", section.pattern),
        );
    }
    (layout, log)
}

/// 7. Alternate every second section of a LIGHT run of three or more.
///
/// Heroes count toward a run but keep their own background.
pub fn light_alternation(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for (index, section) in layout.iter().enumerate() {
        if section.is_light() {
            current.push(index);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    let default_light = ctx.styler.default_background(VisualContext::Light).to_string();
    let tint = ctx.styler.alternation_tint().to_string();

    for run in runs.into_iter().filter(|r| r.len() >= 3) {
        for index in run.into_iter().skip(1).step_by(2) {
            let section = &mut layout.sections[index];
            if ctx.catalog.is_hero(&section.pattern) {
                continue;
            }

            let background = &mut section.background;
            let own_color = background
                .color
                .as_deref()
                .map_or(false, |c| !c.is_empty() && c != default_light);
            if background.use_alt && background.kind.as_deref() == Some("color") && own_color {
                continue;
            }

            background.use_alt = true;
            background.kind = Some("color".to_string());
            if !own_color {
                background.color = Some(tint.clone());
            }
            section.tag("light_alternation");
            log.applied(
                7,
                "LIGHT_ALTERNATION",
                Some(index),
                format!("{} alternated background", section.pattern),
            );
        }
    }
    (layout, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metadata::extract;
    use crate::autofix::{PaletteStyler, SeededIds};
    use crate::catalog::CategoryCatalog;
    use crate::config::PolicyConfig;

    fn apply(
        stage: fn(Layout, FixLog, &mut FixContext<'_>) -> (Layout, FixLog),
        sections: Vec<Section>,
    ) -> (Layout, FixLog) {
        let catalog = CategoryCatalog::default();
        let policy = PolicyConfig::default();
        let styler = PaletteStyler::default();
        let mut ids = SeededIds::new(9);
        let mut ctx = FixContext::new(&catalog, &policy, &styler, &mut ids);
        stage(Layout::new(sections), FixLog::new(), &mut ctx)
    }

    #[test]
    fn test_force_light_on_misused_dark() {
        let (layout, log) = apply(
            force_light,
            vec![
                Section::new("a", "pricing").with_context(VisualContext::Dark),
                Section::new("b", "trust_metrics").with_context(VisualContext::Dark),
            ],
        );
        assert_eq!(layout.sections[0].context(), VisualContext::Light);
        assert_eq!(layout.sections[1].context(), VisualContext::Dark);
        assert_eq!(log.applied_count(), 1);
    }

    #[test]
    fn test_primary_goes_to_canonical_final_cta() {
        let (layout, log) = apply(
            primary_context,
            vec![
                Section::new("a", "hero").with_context(VisualContext::Primary),
                Section::new("b", "final_cta").with_context(VisualContext::Primary),
                Section::new("c", "features"),
                Section::new("d", "cta"),
            ],
        );
        let contexts: Vec<VisualContext> = layout.iter().map(Section::context).collect();
        assert_eq!(
            contexts,
            vec![
                VisualContext::Light,
                VisualContext::Light,
                VisualContext::Light,
                VisualContext::Primary
            ]
        );
        assert_eq!(log.applied_count(), 3);
    }

    #[test]
    fn test_synthesized_cta_avoids_hero_label() {
        let hero = Section::new("h", "hero").with_rows(vec![Row::new(
            "r",
            vec![Column::new(
                "c",
                vec![Module::new("b", "button").with_attr("text", "get started today")],
            )],
        )]);
        let (layout, log) = apply(synthesize_final_cta, vec![hero]);
        let cta = &layout.sections[1];
        assert_eq!(cta.pattern, FINAL_CTA_PATTERN);
        assert_eq!(cta.context(), VisualContext::Primary);
        assert_eq!(cta.padding, Some(80));
        assert_eq!(cta.first_button_text(), Some(FINAL_CTA_FALLBACK_LABEL));
        assert!(log.has_rule("FINAL_CTA_SYNTHESIZED"));

        let (again, log) = apply(synthesize_final_cta, layout.sections.clone());
        assert_eq!(again, layout);
        assert!(log.is_empty());
    }

    #[test]
    fn test_final_cta_moves_last() {
        let (layout, _) = apply(
            final_cta_last,
            vec![
                Section::new("a", "hero"),
                Section::new("b", "final_cta"),
                Section::new("c", "faq"),
            ],
        );
        assert_eq!(layout.order(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_final_cta_move_merges_grids_it_brings_together() {
        let grid = |id: &str, pattern: &str| {
            Section::new(id, pattern).with_rows(vec![Row::new(
                format!("{}-row", id),
                vec![Column::new(format!("{}-col", id), Vec::new())],
            )])
        };
        let (layout, log) = apply(
            final_cta_last,
            vec![
                Section::new("h", "hero_centered"),
                grid("g1", "grid_featured"),
                Section::new("cta", "final_cta").with_context(VisualContext::Primary),
                grid("g2", "grid_density"),
                Section::new("t", "testimonials"),
                Section::new("q", "faq"),
            ],
        );

        assert_eq!(layout.order(), vec!["h", "g1", "t", "q", "cta"]);
        let merged = &layout.sections[1];
        assert_eq!(merged.rows.len(), 2);
        assert!(merged.autofix_tags.contains(&"merged".to_string()));
        assert!(log.has_rule("GRID_PAIR_MERGED"));
        assert!(log.has_rule("FINAL_CTA_MOVED"));

        let catalog = CategoryCatalog::default();
        assert_eq!(extract(&layout.sections, &catalog).grid_pairs, 0);
    }

    #[test]
    fn test_final_cta_move_keeps_grids_already_apart() {
        let (layout, log) = apply(
            final_cta_last,
            vec![
                Section::new("g1", "grid_featured"),
                Section::new("cta", "final_cta"),
                Section::new("f", "features"),
                Section::new("g2", "grid_density"),
            ],
        );
        assert_eq!(layout.order(), vec!["g1", "f", "g2", "cta"]);
        assert!(!log.has_rule("GRID_PAIR_MERGED"));
    }

    #[test]
    fn test_dark_budget_prefers_trust_then_hero() {
        let (layout, log) = apply(
            dark_budget,
            vec![
                Section::new("a", "hero").with_context(VisualContext::Dark),
                Section::new("b", "about").with_context(VisualContext::Dark),
                Section::new("c", "trust_metrics").with_context(VisualContext::Dark),
            ],
        );
        let dark: Vec<&str> = layout
            .iter()
            .filter(|s| s.context() == VisualContext::Dark)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(dark, vec!["a", "c"]);
        assert_eq!(log.applied_count(), 1);
    }

    #[test]
    fn test_light_alternation_marks_odd_offsets() {
        let sections = vec![
            Section::new("a", "hero"),
            Section::new("b", "features"),
            Section::new("c", "benefits"),
            Section::new("d", "faq"),
            Section::new("e", "final_cta").with_context(VisualContext::Primary),
        ];
        let (layout, log) = apply(light_alternation, sections);
        let flagged: Vec<bool> = layout.iter().map(|s| s.background.use_alt).collect();
        assert_eq!(flagged, vec![false, true, false, true, false]);
        assert_eq!(layout.sections[1].background.color.as_deref(), Some("#f9fafb"));
        assert_eq!(log.applied_count(), 2);

        let (_, again) = apply(light_alternation, layout.sections.clone());
        assert!(again.is_empty());
    }
}
