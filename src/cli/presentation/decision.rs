//! Controller outcome presentation for `run`.

use super::report::status_label;
use crate::controller::{ControllerOutcome, Decision};
use crate::error::ApiError;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_outcome_text(outcome: &ControllerOutcome) -> String {
    let decision = &outcome.decision;
    let verdict = match decision.decision {
        Decision::Accept => decision.decision.as_str().green().bold().to_string(),
        Decision::Retry => decision.decision.as_str().yellow().to_string(),
        Decision::Fail => decision.decision.as_str().red().bold().to_string(),
    };
    let mut out = format!(
        "Decision: {} ({})\nScore: {}/25 ({})\nConfidence: {:.2}\nAttempts: {}\n",
        verdict,
        decision.stop_reason,
        outcome.score,
        status_label(outcome.status),
        decision.confidence,
        outcome.attempts
    );
    if decision.forced_accept {
        out.push_str(&format!("{}\n", "Forced accept: score below floor".yellow()));
    }
    if let Some(attempt) = outcome.selected_attempt {
        out.push_str(&format!("Selected attempt: {}\n", attempt));
    }
    if !outcome.autofix_rules.is_empty() {
        out.push_str(&format!("Autofix: {}\n", outcome.autofix_rules.join(", ")));
    }

    if !outcome.history.is_empty() {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec![
            "Attempt",
            "Decision",
            "Reason",
            "Confidence",
            "Critical",
            "Oscillation",
        ]);
        for step in &outcome.history {
            table.add_row(vec![
                step.attempt.to_string(),
                step.decision.to_string(),
                step.stop_reason.to_string(),
                format!("{:.2}", step.confidence),
                step.has_critical.to_string(),
                step.is_oscillation.to_string(),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    for failure in &outcome.failures {
        out.push_str(&format!(
            "Attempt {} failed: {}\n",
            failure.attempt,
            failure.failure.reason.red()
        ));
    }
    out.trim_end().to_string()
}

/// The decision envelope followed by the full outcome.
pub fn format_outcome_json(outcome: &ControllerOutcome) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "envelope": outcome.envelope(),
        "outcome": outcome,
    }))?)
}
