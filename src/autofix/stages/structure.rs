//! Stages 8-9: content restructuring, gated on pre-fix warning signals.

use crate::analysis::metadata::has_crowded_column;
use crate::autofix::pipeline::FixContext;
use crate::autofix::FixLog;
use crate::catalog::{base_pattern, Category, CategoryCatalog};
use crate::layout::{Column, Layout, Section};
use crate::narrative;

/// 8. On a long page, merge adjacent sections of the same base pattern until the page fits.
///
/// A page is long when LONG_PAGE was raised before fixing or when earlier stages pushed it
/// past `max_sections`. Hero and final call-to-action sections are never merged.
pub fn merge_long_page(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    if !ctx.signals.long_page && layout.len() <= ctx.policy.max_sections {
        return (layout, log);
    }

    while layout.len() > ctx.policy.merge_target {
        let mergeable = (0..layout.len().saturating_sub(1)).find(|&index| {
            let (first, second) = (&layout.sections[index], &layout.sections[index + 1]);
            let category = ctx.catalog.resolve_category(&first.pattern);
            !matches!(category, Category::Hero | Category::FinalCta)
                && base_pattern(&first.pattern) == base_pattern(&second.pattern)
                && keeps_narrative_score(&layout.sections, index + 1, ctx.catalog)
        });
        let Some(index) = mergeable else {
            break;
        };

        let absorbed = layout.sections.remove(index + 1);
        let target = &mut layout.sections[index];
        target.rows.extend(absorbed.rows);
        target.tag("merged");
        log.applied(
            8,
            "SECTIONS_MERGED",
            Some(index),
            format!("{} absorbed {}", target.id, absorbed.id),
        );
    }
    (layout, log)
}

/// Removing the section at `index` must not lower the narrative score.
fn keeps_narrative_score(sections: &[Section], index: usize, catalog: &CategoryCatalog) -> bool {
    let score =
        |sections: &[Section]| narrative::validate(&narrative::roles_of(sections, catalog)).score;
    let mut without = sections.to_vec();
    without.remove(index);
    score(&without) >= score(sections)
}

/// 9. Split crowded single-column rows of grid-like sections into two columns.
pub fn split_dense_grids(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    if !ctx.signals.low_density {
        return (layout, log);
    }

    for (index, section) in layout.sections.iter_mut().enumerate() {
        let category = ctx.catalog.resolve_category(&section.pattern);
        if !category.is_grid_like() || !has_crowded_column(section) {
            continue;
        }

        let mut split_rows = 0;
        for row in &mut section.rows {
            if row.columns.len() != 1 || row.columns[0].modules.len() <= 2 {
                continue;
            }
            let column = &mut row.columns[0];
            let keep = (column.modules.len() + 1) / 2;
            let moved = column.modules.split_off(keep);
            column.width = Some("1_2".to_string());

            let mut second = Column::new(ctx.ids.next_id("column"), moved);
            second.width = Some("1_2".to_string());
            row.columns.push(second);
            row.columns_layout = Some("1_2,1_2".to_string());
            split_rows += 1;
        }

        section.tag("grid_split");
        log.applied(
            9,
            "GRID_SPLIT",
            Some(index),
            format!("{} split {} row(s) into two columns", section.pattern, split_rows),
        );
    }
    (layout, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofix::pipeline::FixSignals;
    use crate::autofix::{PaletteStyler, SeededIds};
    use crate::catalog::CategoryCatalog;
    use crate::config::PolicyConfig;
    use crate::layout::{Module, Row};

    #[test]
    fn test_merge_requires_long_page_signal() {
        let catalog = CategoryCatalog::default();
        let policy = PolicyConfig {
            merge_target: 3,
            ..Default::default()
        };
        let styler = PaletteStyler::default();
        let mut ids = SeededIds::new(0);
        let sections = vec![
            Section::new("a", "hero"),
            Section::new("b", "features"),
            Section::new("c", "features_v2"),
            Section::new("d", "faq"),
            Section::new("e", "final_cta"),
        ];

        let mut ctx = FixContext::new(&catalog, &policy, &styler, &mut ids);
        let (same, log) = merge_long_page(Layout::new(sections.clone()), FixLog::new(), &mut ctx);
        assert_eq!(same.len(), 5);
        assert!(log.is_empty());

        ctx.signals = FixSignals {
            long_page: true,
            ..Default::default()
        };
        let (merged, log) = merge_long_page(Layout::new(sections), FixLog::new(), &mut ctx);
        assert_eq!(merged.order(), vec!["a", "b", "d", "e"]);
        assert_eq!(log.applied_count(), 1);
    }

    #[test]
    fn test_merge_runs_when_page_grew_past_max_sections() {
        let catalog = CategoryCatalog::default();
        let policy = PolicyConfig::default();
        let styler = PaletteStyler::default();
        let mut ids = SeededIds::new(0);
        let mut sections = vec![Section::new("h", "hero")];
        sections.extend((0..9).map(|i| Section::new(format!("s{}", i), format!("block_{}", i))));
        sections[4] = Section::new("s3", "features");
        sections[5] = Section::new("s4", "features");
        sections.push(Section::new("cta", "final_cta"));
        assert_eq!(sections.len(), 11);

        let mut ctx = FixContext::new(&catalog, &policy, &styler, &mut ids);
        assert!(!ctx.signals.long_page);
        let (merged, log) = merge_long_page(Layout::new(sections), FixLog::new(), &mut ctx);

        assert_eq!(merged.len(), policy.merge_target);
        assert!(!merged.order().contains(&"s4"));
        assert!(log.has_rule("SECTIONS_MERGED"));

        let (again, log) = merge_long_page(merged.clone(), FixLog::new(), &mut ctx);
        assert_eq!(again, merged);
        assert!(log.is_empty());
    }

    #[test]
    fn test_merge_skips_pairs_that_cost_narrative_score() {
        let catalog = CategoryCatalog::default();
        let policy = PolicyConfig {
            merge_target: 3,
            ..Default::default()
        };
        let styler = PaletteStyler::default();
        let mut ids = SeededIds::new(0);
        let sections = vec![
            Section::new("f1", "features"),
            Section::new("f2", "features"),
            Section::new("t1", "testimonials"),
            Section::new("t2", "testimonials"),
            Section::new("cta", "final_cta"),
        ];

        let mut ctx = FixContext::new(&catalog, &policy, &styler, &mut ids);
        ctx.signals.long_page = true;
        let (merged, log) = merge_long_page(Layout::new(sections), FixLog::new(), &mut ctx);

        // Two PROOF sections earn a bonus the hookless page needs.
        assert_eq!(merged.order(), vec!["f1", "t1", "t2", "cta"]);
        assert_eq!(log.applied_count(), 1);
    }

    #[test]
    fn test_split_crowded_grid_row() {
        let catalog = CategoryCatalog::default();
        let policy = PolicyConfig::default();
        let styler = PaletteStyler::default();
        let mut ids = SeededIds::new(0);
        let modules = (0..5)
            .map(|i| Module::new(format!("m{}", i), "blurb"))
            .collect();
        let grid = Section::new("g", "grid_featured")
            .with_rows(vec![Row::new("r", vec![Column::new("c", modules)])]);

        let mut ctx = FixContext::new(&catalog, &policy, &styler, &mut ids);
        ctx.signals.low_density = true;
        let (layout, log) = split_dense_grids(Layout::new(vec![grid]), FixLog::new(), &mut ctx);

        let row = &layout.sections[0].rows[0];
        assert_eq!(row.columns.len(), 2);
        assert_eq!(row.columns[0].modules.len(), 3);
        assert_eq!(row.columns[1].modules.len(), 2);
        assert_eq!(row.columns_layout.as_deref(), Some("1_2,1_2"));
        assert!(log.has_rule("GRID_SPLIT"));

        let (_, again) = split_dense_grids(layout, FixLog::new(), &mut ctx);
        assert!(again.is_empty());
    }
}
