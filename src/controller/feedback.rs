//! Retry feedback handed to the candidate source from the second attempt onward.

use crate::analysis::{QualityReport, ViolationCode, WarningCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured feedback plus its rendered text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFeedback {
    /// The attempt this feedback is for (2 or later)
    pub attempt: u32,
    pub final_attempt: bool,
    pub previous_score: u8,
    pub issues: Vec<String>,
    pub corrections: Vec<String>,
    pub do_not_repeat: Vec<String>,
}

impl QualityFeedback {
    /// Build feedback from the previous attempt's post-fix report. `None` for the first attempt.
    pub fn from_report(report: &QualityReport, attempt: u32, max_attempts: u32) -> Option<Self> {
        if attempt < 2 {
            return None;
        }

        let mut issues: Vec<String> = report
            .violations
            .iter()
            .map(|v| humanize(violation_message(v.code), &v.detail))
            .map(|line| format!("VIOLATION {}", line))
            .collect();
        issues.extend(
            report
                .warnings
                .iter()
                .map(|w| humanize(warning_message(w.code), &w.detail))
                .map(|line| format!("WARNING {}", line)),
        );

        let mut corrections = Vec::new();
        let mut do_not_repeat = Vec::new();
        for violation in &report.violations {
            if let Some(text) = correction(violation.code) {
                push_unique(&mut corrections, text);
            }
            if let Some(text) = avoidance(violation.code) {
                push_unique(&mut do_not_repeat, text);
            }
        }
        let metrics = &report.metrics;
        if metrics.breathing_count == 0 && metrics.total > 7 {
            push_unique(
                &mut corrections,
                "Long pages require at least one breathing_space section between dense content.",
            );
        }

        Some(Self {
            attempt,
            final_attempt: attempt >= max_attempts,
            previous_score: report.score,
            issues,
            corrections,
            do_not_repeat,
        })
    }

    pub fn header(&self) -> String {
        if self.final_attempt {
            format!("QUALITY FEEDBACK (FINAL ATTEMPT {})", self.attempt)
        } else {
            format!("QUALITY FEEDBACK (ATTEMPT {})", self.attempt)
        }
    }
}

impl fmt::Display for QualityFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "{}", self.header())?;
        writeln!(f)?;
        writeln!(f, "Issues detected:")?;
        write_list(f, &self.issues, "None detected")?;
        writeln!(f)?;
        writeln!(f, "Mandatory corrections:")?;
        write_list(f, &self.corrections, "Follow all Golden Rules")?;
        writeln!(f)?;
        writeln!(f, "Do NOT repeat:")?;
        write_list(f, &self.do_not_repeat, "All previous mistakes")?;
        write!(f, "---")?;
        if self.final_attempt {
            write!(
                f,
                "\n\nTHIS IS YOUR LAST ATTEMPT. FOLLOW ALL RULES STRICTLY."
            )?;
        }
        Ok(())
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[String], empty: &str) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "- {}", empty);
    }
    for item in items {
        writeln!(f, "- {}", item)?;
    }
    Ok(())
}

fn push_unique(list: &mut Vec<String>, text: &str) {
    if !list.iter().any(|existing| existing == text) {
        list.push(text.to_string());
    }
}

fn humanize(message: &str, detail: &str) -> String {
    if detail.is_empty() {
        message.to_string()
    } else {
        format!("{}: {}", message, detail)
    }
}

fn violation_message(code: ViolationCode) -> &'static str {
    match code {
        ViolationCode::MissingFinalCta => "No final_cta section found",
        ViolationCode::FinalCtaNotLast => "final_cta is not the last section",
        ViolationCode::PrimaryCountInvalid => "Wrong number of PRIMARY sections",
        ViolationCode::PrimaryMisuse => "PRIMARY used in wrong section",
        ViolationCode::DarkOverflow => "Too many DARK sections",
        ViolationCode::DarkMisuse => "DARK used in a section type that must stay LIGHT",
        ViolationCode::GridSequence => "Two grid sections placed consecutively",
        ViolationCode::CtaDuplicate => "Hero and Final CTA are identical",
        ViolationCode::CtaBeforePromise => "Call to action appears before the promise",
        ViolationCode::BrokenStoryFlow => "Story flow is broken",
        ViolationCode::NarrativeAutofixBlocked => "Narrative too broken to repair automatically",
    }
}

fn warning_message(code: WarningCode) -> &'static str {
    match code {
        WarningCode::ShortPage => "Page has too few sections",
        WarningCode::LongPage => "Page has too many sections",
        WarningCode::NoBreathingSpace => "No breathing_space sections in long page",
        WarningCode::LightMonotony => "Too many consecutive LIGHT sections without contrast",
        other => other.as_str(),
    }
}

fn correction(code: ViolationCode) -> Option<&'static str> {
    let text = match code {
        ViolationCode::MissingFinalCta => {
            "Final CTA section is MANDATORY and MUST be the last section on the page."
        }
        ViolationCode::FinalCtaNotLast => {
            "Move final_cta to be the LAST section. No sections after final_cta."
        }
        ViolationCode::PrimaryCountInvalid => {
            "Only ONE section can have PRIMARY visual_context, and it MUST be final_cta."
        }
        ViolationCode::PrimaryMisuse => {
            "PRIMARY visual_context is ONLY allowed for final_cta. Use LIGHT or DARK for other sections."
        }
        ViolationCode::DarkOverflow => {
            "Maximum 2 DARK sections allowed. Reduce DARK sections to trust_metrics and optionally hero."
        }
        ViolationCode::DarkMisuse => {
            "DARK visual_context is forbidden for content grids (features, testimonials, pricing, team). Use LIGHT."
        }
        ViolationCode::GridSequence => {
            "Never place two grid patterns consecutively. Insert breathing_space or zigzag_narrative between grids."
        }
        ViolationCode::CtaDuplicate => {
            "Hero CTA and Final CTA must be DIFFERENT. Hero = low commitment, Final = high commitment."
        }
        _ => return None,
    };
    Some(text)
}

fn avoidance(code: ViolationCode) -> Option<&'static str> {
    let text = match code {
        ViolationCode::MissingFinalCta => "Omitting final_cta section",
        ViolationCode::FinalCtaNotLast => "Placing sections after final_cta",
        ViolationCode::PrimaryCountInvalid | ViolationCode::PrimaryMisuse => {
            "Using PRIMARY for sections other than final_cta"
        }
        ViolationCode::DarkOverflow | ViolationCode::DarkMisuse => {
            "Using DARK for content grids or exceeding 2 DARK sections"
        }
        ViolationCode::GridSequence => "Placing grid sections back-to-back",
        ViolationCode::CtaDuplicate => "Using identical CTA text in hero and final_cta",
        _ => return None,
    };
    Some(text)
}
