//! Soft rules. Advisory only; two of them (LONG_PAGE, GRID_DENSITY_LOW) double as the
//! signals that enable the merge and split stages.

use super::metadata::LayoutMetrics;
use crate::autofix::FixLog;
use crate::catalog::CategoryCatalog;
use crate::config::PolicyConfig;
use crate::layout::{
    EmotionalTone, NarrativeRole, Section, Spacing, VisualDensity, VisualIntent, VisualScale,
};
use crate::narrative::OrderIssue;
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum WarningCode {
        ShortPage => "SHORT_PAGE",
        LongPage => "LONG_PAGE",
        NoBreathingSpace => "NO_BREATHING_SPACE",
        LightMonotony => "LIGHT_MONOTONY",
        AltBgIncomplete => "ALT_BG_INCOMPLETE",
        ViConflict => "VI_CONFLICT",
        HeroNotDominant => "HERO_NOT_DOMINANT",
        DenseChain => "DENSE_CHAIN",
        NoClimax => "NO_CLIMAX",
        SparseTooTight => "SPARSE_TOO_TIGHT",
        HeroUnderScaled => "HERO_UNDER_SCALED",
        CtaNotClimax => "CTA_NOT_CLIMAX",
        MultiXl => "MULTI_XL",
        HeroTypoTooWeak => "HERO_TYPO_TOO_WEAK",
        CtaTypoNotClimax => "CTA_TYPO_NOT_CLIMAX",
        AttentionOverload => "ATTENTION_OVERLOAD",
        NoTrustSection => "NO_TRUST_SECTION",
        NoCalmSection => "NO_CALM_SECTION",
        UrgencyTooEarly => "URGENCY_TOO_EARLY",
        FlatFlow => "FLAT_FLOW",
        NoProof => "NO_PROOF",
        NoHook => "NO_HOOK",
        NoPromise => "NO_PROMISE",
        CtaBeforePromise => "CTA_BEFORE_PROMISE",
        ProofBeforePromise => "PROOF_BEFORE_PROMISE",
        BrokenStoryFlow => "BROKEN_STORY_FLOW",
        GridDensityLow => "GRID_DENSITY_LOW",
        NarrativePlaceholderUsed => "NARRATIVE_PLACEHOLDER_USED",
        NarrativeSwapApplied => "NARRATIVE_SWAP_APPLIED",
        NarrativeAutofixBlocked => "NARRATIVE_AUTOFIX_BLOCKED",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: WarningCode,
    pub detail: String,
}

impl Warning {
    pub(crate) fn new(code: WarningCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// Urgency must not appear before this share of the page.
const URGENCY_MIN_PERCENT: usize = 60;

pub fn detect(
    sections: &[Section],
    metrics: &LayoutMetrics,
    catalog: &CategoryCatalog,
    policy: &PolicyConfig,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let total = metrics.total;
    let mut push = |code: WarningCode, detail: String| warnings.push(Warning::new(code, detail));

    if total < policy.min_sections {
        push(
            WarningCode::ShortPage,
            format!(
                "only {} sections (recommended {}-{})",
                total, policy.min_sections, policy.max_sections
            ),
        );
    }
    if total > policy.max_sections {
        push(
            WarningCode::LongPage,
            format!(
                "{} sections (recommended {}-{})",
                total, policy.min_sections, policy.max_sections
            ),
        );
    }
    if total > 7 && metrics.breathing_count == 0 {
        push(
            WarningCode::NoBreathingSpace,
            "long page without a breathing space".to_string(),
        );
    }
    if metrics.max_light_streak > 3 {
        push(
            WarningCode::LightMonotony,
            format!("{} consecutive LIGHT sections", metrics.max_light_streak),
        );
    }

    let incomplete: Vec<String> = sections
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            s.background.use_alt
                && (s.background.kind.as_deref() != Some("color")
                    || s.background.color.as_deref().map_or(true, str::is_empty))
        })
        .map(|(i, s)| format!("#{} {}", i, s.pattern))
        .collect();
    if !incomplete.is_empty() {
        push(
            WarningCode::AltBgIncomplete,
            format!("alternation without a colour background: {}", incomplete.join(", ")),
        );
    }

    let dominant = metrics.intent_count(VisualIntent::Dominant);
    if dominant > 2 {
        push(
            WarningCode::ViConflict,
            format!("{} DOMINANT sections (max 2)", dominant),
        );
    }
    for (index, section) in sections.iter().enumerate() {
        if catalog.is_hero(&section.pattern)
            && section.visual_intent != Some(VisualIntent::Dominant)
        {
            let intent = section.visual_intent.map_or("no", |i| i.as_str());
            push(
                WarningCode::HeroNotDominant,
                format!("hero #{} has {} intent", index, intent),
            );
        }
    }

    if metrics.max_dense_streak > 2 {
        push(
            WarningCode::DenseChain,
            format!("{} consecutive DENSE sections", metrics.max_dense_streak),
        );
    }
    let has_climax = sections.iter().any(|s| {
        catalog.is_final_cta(&s.pattern)
            && s.before_spacing.map_or(false, |b| b.rank() >= Spacing::Xl.rank())
    });
    if total >= 5 && !has_climax {
        push(
            WarningCode::NoClimax,
            "final CTA lacks xl/2xl climax spacing".to_string(),
        );
    }
    if let Some((index, section)) = sections.iter().enumerate().find(|(_, s)| {
        s.density() == VisualDensity::Sparse
            && (rank_of(s.before_spacing) < Spacing::Md.rank()
                || rank_of(s.after_spacing) < Spacing::Md.rank())
    }) {
        push(
            WarningCode::SparseTooTight,
            format!("SPARSE section #{} ({}) needs at least md spacing", index, section.pattern),
        );
    }

    if let Some(scale) = metrics.hero_scale.filter(|s| !s.is_climax()) {
        push(
            WarningCode::HeroUnderScaled,
            format!("hero scale {} (should be LG or XL)", scale),
        );
    }
    if let Some(scale) = metrics.cta_scale.filter(|s| !s.is_climax()) {
        push(
            WarningCode::CtaNotClimax,
            format!("final CTA scale {} (should be LG or XL)", scale),
        );
    }
    let xl = metrics.scale_count(VisualScale::Xl);
    if xl > 2 {
        push(WarningCode::MultiXl, format!("{} XL sections (max 2)", xl));
    }
    if let Some(scale) = metrics.hero_typography.filter(|s| !s.is_climax()) {
        push(
            WarningCode::HeroTypoTooWeak,
            format!("hero typography {} (should be LG or XL)", scale),
        );
    }
    if let Some(scale) = metrics.cta_typography.filter(|s| !s.is_climax()) {
        push(
            WarningCode::CtaTypoNotClimax,
            format!("final CTA typography {} (should be LG or XL)", scale),
        );
    }

    if metrics.max_high_streak > 2 {
        push(
            WarningCode::AttentionOverload,
            format!("{} consecutive HIGH attention sections", metrics.max_high_streak),
        );
    }
    if total >= 5 && !metrics.has_tone(EmotionalTone::Trust) {
        push(
            WarningCode::NoTrustSection,
            "no trust-building section".to_string(),
        );
    }
    if total >= 7 && !metrics.has_tone(EmotionalTone::Calm) {
        push(
            WarningCode::NoCalmSection,
            "no calm section for rhythm".to_string(),
        );
    }
    if let Some(index) = metrics.first_urgency {
        let percent = index * 100 / total.max(1);
        if percent < URGENCY_MIN_PERCENT {
            push(
                WarningCode::UrgencyTooEarly,
                format!("urgency at {}% (should be past {}%)", percent, URGENCY_MIN_PERCENT),
            );
        }
    }
    if total >= 5 && metrics.tones.len() <= 1 {
        push(
            WarningCode::FlatFlow,
            "every section has the same emotional tone".to_string(),
        );
    }

    let narrative = &metrics.narrative;
    if narrative.is_missing(NarrativeRole::Proof) {
        push(WarningCode::NoProof, "no social proof section".to_string());
    }
    if narrative.is_missing(NarrativeRole::Hook) {
        push(WarningCode::NoHook, "no attention-grabbing hook".to_string());
    }
    if narrative.is_missing(NarrativeRole::Promise) {
        push(WarningCode::NoPromise, "no value proposition".to_string());
    }
    if narrative.has_issue(OrderIssue::CtaBeforePromise) {
        push(
            WarningCode::CtaBeforePromise,
            "CTA appears before showing value".to_string(),
        );
    }
    if narrative.has_issue(OrderIssue::ProofBeforePromise) {
        push(
            WarningCode::ProofBeforePromise,
            "proof shown before the offer is explained".to_string(),
        );
    }
    if narrative.score < policy.narrative_blocked_threshold {
        push(
            WarningCode::BrokenStoryFlow,
            format!("narrative score {}/100", narrative.score),
        );
        push(
            WarningCode::NarrativeAutofixBlocked,
            "score too low for safe auto-correction".to_string(),
        );
    }

    if !metrics.low_density_grids.is_empty() {
        let at: Vec<String> = metrics
            .low_density_grids
            .iter()
            .map(|i| format!("#{}", i))
            .collect();
        push(
            WarningCode::GridDensityLow,
            format!("single-column grids with more than 2 items: {}", at.join(", ")),
        );
    }

    warnings
}

/// Notices derived from what narrative correction did in this run.
pub fn autofix_notices(log: &FixLog) -> Vec<Warning> {
    let placeholders = log
        .applied_records()
        .filter(|r| r.rule.starts_with("NR_PLACEHOLDER_") && r.rule != "NR_PLACEHOLDER_BLOCKED")
        .count();
    let swaps = log
        .applied_records()
        .filter(|r| r.rule.starts_with("NR_SWAP_") && r.rule != "NR_SWAP_BLOCKED")
        .count();

    let mut notices = Vec::new();
    if placeholders > 0 {
        notices.push(Warning::new(
            WarningCode::NarrativePlaceholderUsed,
            format!("{} placeholder section(s) inserted", placeholders),
        ));
    }
    if swaps > 0 {
        notices.push(Warning::new(
            WarningCode::NarrativeSwapApplied,
            format!("{} section swap(s) performed", swaps),
        ));
    }
    notices
}

fn rank_of(spacing: Option<Spacing>) -> u8 {
    spacing.map_or(0, |s| s.rank())
}
