//! Stages 10-16: deterministic attribute assignment from the catalog tables.
//!
//! Intent (10) and role (16) always follow the tables. Density, scale, typography and emotion
//! only fill absent values. Rhythm spacing (12) raises spacing to a minimum and never lowers
//! an explicit value.

use crate::analysis::metadata::canonical_final_cta;
use crate::autofix::pipeline::FixContext;
use crate::autofix::FixLog;
use crate::catalog::{base_pattern, Category};
use crate::layout::{
    AttentionLevel, Layout, Section, Spacing, TypographyEmphasis, VisualDensity, VisualIntent,
    VisualScale,
};

/// 10. Visual intent from the intent table.
pub fn assign_intent(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    for (index, section) in layout.sections.iter_mut().enumerate() {
        let intent = ctx.catalog.intent_for(&section.pattern);
        if section.visual_intent != Some(intent) {
            section.visual_intent = Some(intent);
            log.applied(
                10,
                "VISUAL_INTENT",
                Some(index),
                format!("{} -> {}", section.pattern, intent),
            );
        }
    }
    (layout, log)
}

/// 11. Visual density where absent.
pub fn assign_density(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    for (index, section) in layout.sections.iter_mut().enumerate() {
        if section.visual_density.is_none() {
            let density = ctx.catalog.density_for(&section.pattern);
            section.visual_density = Some(density);
            log.applied(
                11,
                "VISUAL_DENSITY",
                Some(index),
                format!("{} -> {}", section.pattern, density),
            );
        }
    }
    (layout, log)
}

/// 12. Climax spacing around the final call-to-action and DOMINANT sections, a break before
/// a second consecutive DENSE section, and breathing room around SPARSE sections.
pub fn rhythm_spacing(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let densities: Vec<VisualDensity> = layout.iter().map(Section::density).collect();

    for (index, section) in layout.sections.iter_mut().enumerate() {
        let mut before = None;
        let mut after = None;

        if ctx.catalog.is_final_cta(&section.pattern) {
            before = Some(Spacing::Xxl);
            after = Some(Spacing::Xxl);
        } else if section.visual_intent == Some(VisualIntent::Dominant) {
            before = Some(Spacing::Xl);
        }
        if index > 0
            && densities[index] == VisualDensity::Dense
            && densities[index - 1] == VisualDensity::Dense
        {
            before = max_spacing(before, Spacing::Xl);
        }
        if densities[index] == VisualDensity::Sparse {
            before = max_spacing(before, Spacing::Md);
            after = max_spacing(after, Spacing::Md);
        }

        let raised_before = raise(&mut section.before_spacing, before);
        let raised_after = raise(&mut section.after_spacing, after);
        if raised_before || raised_after {
            log.applied(
                12,
                "RHYTHM_SPACING",
                Some(index),
                format!(
                    "{} spacing {}/{}",
                    section.pattern,
                    section.before_spacing.map_or("-", |s| s.as_str()),
                    section.after_spacing.map_or("-", |s| s.as_str())
                ),
            );
        }
    }
    (layout, log)
}

fn max_spacing(current: Option<Spacing>, floor: Spacing) -> Option<Spacing> {
    match current {
        Some(spacing) if spacing.rank() >= floor.rank() => Some(spacing),
        _ => Some(floor),
    }
}

/// Raise `slot` to at least `floor`. Returns whether it changed.
fn raise(slot: &mut Option<Spacing>, floor: Option<Spacing>) -> bool {
    let Some(floor) = floor else {
        return false;
    };
    match slot {
        Some(current) if current.rank() >= floor.rank() => false,
        _ => {
            *slot = Some(floor);
            true
        }
    }
}

/// 13. Visual scale where absent.
///
/// Hero: XL when it is the only DOMINANT section, is followed by a trust section, or is a
/// split hero; otherwise LG on pages over 8 sections, XL up to 6, LG in between. Final CTA:
/// XL when the pre-fix score or confidence is high or the page has more than 9 sections.
pub fn assign_scale(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let total = layout.len();
    let dominant = layout
        .iter()
        .filter(|s| s.visual_intent == Some(VisualIntent::Dominant))
        .count();
    let categories: Vec<Category> = layout
        .iter()
        .map(|s| ctx.catalog.resolve_category(&s.pattern))
        .collect();
    let final_cta = canonical_final_cta(&layout.sections, ctx.catalog);
    let signals = ctx.signals;
    let policy = ctx.policy;

    for (index, section) in layout.sections.iter_mut().enumerate() {
        if section.visual_scale.is_some() {
            continue;
        }

        let scale = match categories[index] {
            Category::Hero => {
                let trust_follows = categories.get(index + 1) == Some(&Category::TrustMetrics);
                let split = base_pattern(&section.pattern).contains("split");
                if dominant == 1 || trust_follows || split {
                    VisualScale::Xl
                } else if total > 8 {
                    VisualScale::Lg
                } else if total <= 6 {
                    VisualScale::Xl
                } else {
                    VisualScale::Lg
                }
            }
            Category::FinalCta => {
                if signals.prior_score >= policy.cta_xl_score
                    || signals.prior_confidence >= policy.cta_xl_confidence
                    || total > 9
                {
                    VisualScale::Xl
                } else {
                    VisualScale::Lg
                }
            }
            _ if section.visual_intent == Some(VisualIntent::Emphasis)
                && final_cta == Some(index + 1) =>
            {
                VisualScale::Lg
            }
            _ => match section.visual_intent.unwrap_or(VisualIntent::Neutral) {
                VisualIntent::Dominant => VisualScale::Lg,
                VisualIntent::Emphasis | VisualIntent::Neutral => VisualScale::Md,
                VisualIntent::Soft => VisualScale::Sm,
            },
        };

        section.visual_scale = Some(scale);
        log.applied(13, "VISUAL_SCALE", Some(index), format!("{} -> {}", section.pattern, scale));
    }
    (layout, log)
}

/// 14. Typography scale mirrors visual scale; emphasis follows intent.
pub fn assign_typography(
    mut layout: Layout,
    mut log: FixLog,
    _ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    for (index, section) in layout.sections.iter_mut().enumerate() {
        let mut changed = false;
        if section.typography_scale.is_none() {
            section.typography_scale = Some(section.scale());
            changed = true;
        }
        if section.typography_emphasis.is_none() {
            section.typography_emphasis = Some(match section.visual_intent {
                Some(VisualIntent::Dominant) | Some(VisualIntent::Emphasis) => {
                    TypographyEmphasis::Strong
                }
                Some(VisualIntent::Soft) => TypographyEmphasis::Soft,
                _ => TypographyEmphasis::Normal,
            });
            changed = true;
        }
        if changed {
            log.applied(
                14,
                "TYPOGRAPHY",
                Some(index),
                format!("{} typography set", section.pattern),
            );
        }
    }
    (layout, log)
}

/// 15. Emotional tone and attention where absent; a third consecutive HIGH drops to MEDIUM.
pub fn assign_emotion(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let mut high_streak = 0;
    for (index, section) in layout.sections.iter_mut().enumerate() {
        let profile = ctx.catalog.emotion_for(&section.pattern);
        if section.emotional_tone.is_none() || section.attention_level.is_none() {
            section.emotional_tone.get_or_insert(profile.tone);
            section.attention_level.get_or_insert(profile.attention);
            log.applied(
                15,
                "EMOTIONAL_PROFILE",
                Some(index),
                format!("{} -> {}/{}", section.pattern, section.tone(), section.attention()),
            );
        }

        if section.attention() == AttentionLevel::High {
            high_streak += 1;
            if high_streak > 2 {
                section.attention_level = Some(AttentionLevel::Medium);
                high_streak = 0;
                log.applied(
                    15,
                    "ATTENTION_CAPPED",
                    Some(index),
                    format!("{} attention capped to medium", section.pattern),
                );
            }
        } else {
            high_streak = 0;
        }
    }
    (layout, log)
}

/// 16. Narrative role from the role table.
pub fn assign_role(
    mut layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    for (index, section) in layout.sections.iter_mut().enumerate() {
        let role = ctx.catalog.role_for(&section.pattern);
        if section.narrative_role != Some(role) {
            section.narrative_role = Some(role);
            log.applied(
                16,
                "NARRATIVE_ROLE",
                Some(index),
                format!("{} -> {}", section.pattern, role),
            );
        }
    }
    (layout, log)
}
