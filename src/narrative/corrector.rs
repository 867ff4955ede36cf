//! Narrative auto-correction.
//!
//! The narrative score picks a band. Preserve and Blocked only record a notice. BoundedFix
//! allows short swaps (RESOLUTION/PROMISE, PROOF/PROMISE) and placeholder insertion for a
//! missing PROOF or RELIEF. PROBLEM needs real copy and is never synthesized.
//!
//! Every mutation is checked first: it must not add an adjacent grid pair and must not lower
//! the narrative score.

use super::validator::{roles_of, validate, NarrativeBand, OrderIssue, RolePositions};
use crate::autofix::{FixContext, FixLog, IdSource};
use crate::catalog::{Category, CategoryCatalog};
use crate::layout::{
    Column, Layout, Module, NarrativeRole, Row, Section, Spacing, TypographyEmphasis,
    VisualContext, VisualIntent, VisualScale,
};
use tracing::debug;

pub const PLACEHOLDER_PROOF_PATTERN: &str = "trust_metrics_simple";
pub const PLACEHOLDER_RELIEF_PATTERN: &str = "breathing_space";

const STAGE: u8 = 18;
const TAG: &str = "narrative_autofix";

/// Build a fully profiled placeholder section for `role`.
///
/// Only PROOF and RELIEF have placeholders; other roles get `None`.
pub fn placeholder_section(
    role: NarrativeRole,
    catalog: &CategoryCatalog,
    ids: &mut dyn IdSource,
) -> Option<Section> {
    let (pattern, padding, spacing, modules) = match role {
        NarrativeRole::Proof => (
            PLACEHOLDER_PROOF_PATTERN,
            60,
            Spacing::Lg,
            vec![
                Module::new(ids.next_id("module"), "heading")
                    .with_attr("text", "Trusted by Industry Leaders")
                    .with_attr("level", "h2"),
                Module::new(ids.next_id("module"), "text").with_attr(
                    "content",
                    "Our solutions are trusted by thousands of satisfied customers worldwide.",
                ),
            ],
        ),
        NarrativeRole::Relief => (
            PLACEHOLDER_RELIEF_PATTERN,
            40,
            Spacing::Md,
            vec![Module::new(ids.next_id("module"), "text")
                .with_attr("content", "Take your time. We're here when you're ready.")],
        ),
        _ => return None,
    };

    let intent = catalog.intent_for(pattern);
    let scale = match intent {
        VisualIntent::Dominant => VisualScale::Lg,
        VisualIntent::Soft => VisualScale::Sm,
        VisualIntent::Emphasis | VisualIntent::Neutral => VisualScale::Md,
    };
    let emotion = catalog.emotion_for(pattern);

    let column = Column::new(ids.next_id("column"), modules);
    let row = Row::new(ids.next_id("row"), vec![column]);
    let mut section = Section::new(ids.next_id("section"), pattern)
        .with_context(VisualContext::Light)
        .with_role(role)
        .with_rows(vec![row]);
    section.visual_intent = Some(intent);
    section.visual_density = Some(catalog.density_for(pattern));
    section.visual_scale = Some(scale);
    section.typography_scale = Some(scale);
    section.typography_emphasis = Some(match intent {
        VisualIntent::Dominant | VisualIntent::Emphasis => TypographyEmphasis::Strong,
        VisualIntent::Soft => TypographyEmphasis::Soft,
        VisualIntent::Neutral => TypographyEmphasis::Normal,
    });
    section.emotional_tone = Some(emotion.tone);
    section.attention_level = Some(emotion.attention);
    section.before_spacing = Some(spacing);
    section.after_spacing = Some(spacing);
    section.padding = Some(padding);
    section.placeholder = true;
    section.tag(TAG);
    Some(section)
}

/// Stage 18: banded narrative correction.
pub fn correct(mut layout: Layout, mut log: FixLog, ctx: &mut FixContext<'_>) -> (Layout, FixLog) {
    let validation = validate(&roles_of(&layout.sections, ctx.catalog));
    let band = validation.band(
        ctx.policy.narrative_preserve_threshold,
        ctx.policy.narrative_blocked_threshold,
    );

    match band {
        NarrativeBand::Preserve => {
            log.notice(
                STAGE,
                "NR_SCORE_OK",
                None,
                format!(
                    "narrative score {} preserved ({})",
                    validation.score, validation.signature
                ),
            );
        }
        NarrativeBand::Blocked => {
            log.notice(
                STAGE,
                "NR_AUTOFIX_BLOCKED",
                None,
                format!(
                    "narrative score {} below {}; flagged only",
                    validation.score, ctx.policy.narrative_blocked_threshold
                ),
            );
        }
        NarrativeBand::BoundedFix => {
            debug!(
                score = validation.score,
                signature = %validation.signature,
                "bounded narrative fix"
            );
            swap_cta_promise(&mut layout, &mut log, ctx);
            swap_proof_promise(&mut layout, &mut log, ctx);
            insert_placeholder(&mut layout, &mut log, ctx, NarrativeRole::Proof);
            insert_placeholder(&mut layout, &mut log, ctx, NarrativeRole::Relief);

            let roles = roles_of(&layout.sections, ctx.catalog);
            if !RolePositions::from_roles(&roles).has(NarrativeRole::Problem) {
                log.notice(
                    STAGE,
                    "NR_PROBLEM_NOT_AUTO",
                    None,
                    "missing PROBLEM needs real content; not synthesized",
                );
            }
        }
    }

    (layout, log)
}

fn swap_cta_promise(layout: &mut Layout, log: &mut FixLog, ctx: &FixContext<'_>) {
    let roles = roles_of(&layout.sections, ctx.catalog);
    if !validate(&roles).has_issue(OrderIssue::CtaBeforePromise) {
        return;
    }
    let positions = RolePositions::from_roles(&roles);
    if let (Some(resolution), Some(promise)) = (
        positions.first(NarrativeRole::Resolution),
        positions.last(NarrativeRole::Promise),
    ) {
        try_swap(layout, log, ctx, resolution, promise, "NR_SWAP_CTA_PROMISE");
    }
}

fn swap_proof_promise(layout: &mut Layout, log: &mut FixLog, ctx: &FixContext<'_>) {
    let roles = roles_of(&layout.sections, ctx.catalog);
    let positions = RolePositions::from_roles(&roles);
    if let (Some(proof), Some(promise)) = (
        positions.first(NarrativeRole::Proof),
        positions.first(NarrativeRole::Promise),
    ) {
        if promise > proof {
            try_swap(layout, log, ctx, proof, promise, "NR_SWAP_PROOF_PROMISE");
        }
    }
}

fn try_swap(
    layout: &mut Layout,
    log: &mut FixLog,
    ctx: &FixContext<'_>,
    a: usize,
    b: usize,
    rule: &str,
) {
    let distance = a.abs_diff(b);
    if distance > ctx.policy.narrative_swap_distance {
        log.notice(
            STAGE,
            "NR_SWAP_BLOCKED",
            Some(a),
            format!(
                "{} distance {} exceeds {}",
                rule, distance, ctx.policy.narrative_swap_distance
            ),
        );
        return;
    }

    let mut candidate = layout.sections.clone();
    candidate.swap(a, b);
    if !is_safe(&layout.sections, &candidate, ctx.catalog) {
        log.notice(
            STAGE,
            "NR_SWAP_BLOCKED",
            Some(a),
            format!("{} would add grid adjacency or lower the narrative", rule),
        );
        return;
    }

    candidate[a].tag(TAG);
    candidate[b].tag(TAG);
    layout.sections = candidate;
    log.applied(
        STAGE,
        rule,
        Some(b),
        format!("swapped sections {} and {}", a, b),
    );
}

fn insert_placeholder(
    layout: &mut Layout,
    log: &mut FixLog,
    ctx: &mut FixContext<'_>,
    role: NarrativeRole,
) {
    let roles = roles_of(&layout.sections, ctx.catalog);
    let positions = RolePositions::from_roles(&roles);
    if positions.has(role) {
        return;
    }

    let at = match role {
        NarrativeRole::Proof => positions
            .last(NarrativeRole::Promise)
            .map(|i| i + 1)
            .or_else(|| positions.first(NarrativeRole::Details))
            .or_else(|| positions.first(NarrativeRole::Resolution)),
        NarrativeRole::Relief => positions.last(NarrativeRole::Resolution),
        _ => None,
    };
    let Some(at) = at else {
        log.notice(
            STAGE,
            "NR_PLACEHOLDER_BLOCKED",
            None,
            format!("no safe position for a {} placeholder", role),
        );
        return;
    };
    let Some(mut placeholder) = placeholder_section(role, ctx.catalog, &mut *ctx.ids) else {
        return;
    };
    ctx.styler.apply(&mut placeholder, VisualContext::Light);

    let mut candidate = layout.sections.clone();
    candidate.insert(at, placeholder);
    if !is_safe(&layout.sections, &candidate, ctx.catalog) {
        log.notice(
            STAGE,
            "NR_PLACEHOLDER_BLOCKED",
            Some(at),
            format!("{} placeholder would lower the narrative", role),
        );
        return;
    }

    layout.sections = candidate;
    let rule = match role {
        NarrativeRole::Proof => "NR_PLACEHOLDER_PROOF",
        _ => "NR_PLACEHOLDER_RELIEF",
    };
    log.applied(
        STAGE,
        rule,
        Some(at),
        format!("inserted {} placeholder at {}", role, at),
    );
}

fn is_safe(before: &[Section], after: &[Section], catalog: &CategoryCatalog) -> bool {
    let score_before = validate(&roles_of(before, catalog)).score;
    let score_after = validate(&roles_of(after, catalog)).score;
    grid_pairs(after, catalog) <= grid_pairs(before, catalog) && score_after >= score_before
}

fn grid_pairs(sections: &[Section], catalog: &CategoryCatalog) -> usize {
    sections
        .windows(2)
        .filter(|w| {
            catalog.resolve_category(&w[0].pattern) == Category::Grid
                && catalog.resolve_category(&w[1].pattern) == Category::Grid
        })
        .count()
}
