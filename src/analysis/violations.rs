//! Hard rules. Any critical violation blocks ACCEPT.

use super::metadata::LayoutMetrics;
use crate::config::PolicyConfig;
use crate::narrative::OrderIssue;
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum ViolationCode {
        MissingFinalCta => "MISSING_FINAL_CTA",
        FinalCtaNotLast => "FINAL_CTA_NOT_LAST",
        PrimaryCountInvalid => "PRIMARY_COUNT_INVALID",
        PrimaryMisuse => "PRIMARY_MISUSE",
        DarkOverflow => "DARK_OVERFLOW",
        DarkMisuse => "DARK_MISUSE",
        GridSequence => "GRID_SEQUENCE",
        CtaDuplicate => "CTA_DUPLICATE",
        CtaBeforePromise => "CTA_BEFORE_PROMISE",
        BrokenStoryFlow => "BROKEN_STORY_FLOW",
        NarrativeAutofixBlocked => "NARRATIVE_AUTOFIX_BLOCKED",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: ViolationCode,
    pub detail: String,
}

impl Violation {
    fn new(code: ViolationCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

pub fn detect(metrics: &LayoutMetrics, policy: &PolicyConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    match metrics.final_cta_index {
        None => violations.push(Violation::new(
            ViolationCode::MissingFinalCta,
            "no final call-to-action section",
        )),
        Some(index) if index + 1 != metrics.total => violations.push(Violation::new(
            ViolationCode::FinalCtaNotLast,
            format!(
                "final call-to-action at position {} of {}",
                index + 1,
                metrics.total
            ),
        )),
        Some(_) => {}
    }

    if metrics.primary_count != 1 {
        violations.push(Violation::new(
            ViolationCode::PrimaryCountInvalid,
            format!("{} PRIMARY sections (expected exactly 1)", metrics.primary_count),
        ));
    }
    if !metrics.primary_misuse.is_empty() {
        violations.push(Violation::new(
            ViolationCode::PrimaryMisuse,
            format!("PRIMARY outside final CTA: {}", metrics.primary_misuse.join(", ")),
        ));
    }

    if metrics.dark_count > policy.max_dark_sections {
        violations.push(Violation::new(
            ViolationCode::DarkOverflow,
            format!(
                "{} DARK sections (max {})",
                metrics.dark_count, policy.max_dark_sections
            ),
        ));
    }
    if !metrics.dark_misuse.is_empty() {
        violations.push(Violation::new(
            ViolationCode::DarkMisuse,
            format!("DARK on light-only patterns: {}", metrics.dark_misuse.join(", ")),
        ));
    }

    if metrics.grid_pairs > 0 {
        violations.push(Violation::new(
            ViolationCode::GridSequence,
            format!("{} consecutive grid pair(s)", metrics.grid_pairs),
        ));
    }

    if metrics.cta_duplicate() {
        violations.push(Violation::new(
            ViolationCode::CtaDuplicate,
            format!(
                "hero and final CTA share the label \"{}\"",
                metrics.hero_cta.as_deref().unwrap_or_default()
            ),
        ));
    }

    let narrative = &metrics.narrative;
    if narrative.has_issue(OrderIssue::CtaBeforePromise) {
        violations.push(Violation::new(
            ViolationCode::CtaBeforePromise,
            "conversion CTA appears before the value proposition",
        ));
    }
    if narrative.score < policy.narrative_blocked_threshold {
        violations.push(Violation::new(
            ViolationCode::BrokenStoryFlow,
            format!("narrative score {}/100", narrative.score),
        ));
        violations.push(Violation::new(
            ViolationCode::NarrativeAutofixBlocked,
            "narrative score too low for safe auto-correction",
        ));
    }

    violations
}
