//! Report presentation for `check` and `fix`.

use crate::analysis::{QualityReport, QualityStatus};
use crate::autofix::{FixKind, FixLog};
use crate::error::ApiError;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

/// One checked file: a report, or the reason it could not be read.
#[derive(Debug, Serialize)]
pub struct CheckedFile {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<QualityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub(super) fn status_label(status: QualityStatus) -> String {
    match status {
        QualityStatus::Excellent | QualityStatus::Good => status.as_str().green().to_string(),
        QualityStatus::Acceptable => status.as_str().yellow().to_string(),
        QualityStatus::Reject => status.as_str().red().to_string(),
    }
}

fn score_table(rows: &[(String, &QualityReport)]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec![
        "Layout",
        "Score",
        "Status",
        "Rhythm",
        "Hierarchy",
        "Contrast",
        "Content",
        "Conversion",
        "Violations",
        "Warnings",
    ]);
    for (name, report) in rows {
        let b = &report.breakdown;
        table.add_row(vec![
            name.clone(),
            format!("{}/25", report.score),
            report.status.to_string(),
            b.rhythm.to_string(),
            b.hierarchy.to_string(),
            b.contrast.to_string(),
            b.content.to_string(),
            b.conversion.to_string(),
            report.violations.len().to_string(),
            report.warnings.len().to_string(),
        ]);
    }
    table
}

fn push_findings(out: &mut String, report: &QualityReport) {
    for violation in &report.violations {
        out.push_str(&format!("  {} {}", violation.code.as_str().red(), violation.detail));
        out.push('\n');
    }
    for warning in &report.warnings {
        out.push_str(&format!("  {} {}", warning.code.as_str().yellow(), warning.detail));
        out.push('\n');
    }
}

pub fn format_check_text(files: &[CheckedFile]) -> String {
    if files.is_empty() {
        return "No layout files found.".to_string();
    }
    let rows: Vec<(String, &QualityReport)> = files
        .iter()
        .filter_map(|f| f.report.as_ref().map(|r| (f.path.display().to_string(), r)))
        .collect();

    let mut out = String::new();
    if !rows.is_empty() {
        out.push_str(&score_table(&rows).to_string());
        out.push('\n');
    }
    for file in files {
        match (&file.report, &file.error) {
            (Some(report), _) if !(report.violations.is_empty() && report.warnings.is_empty()) => {
                out.push_str(&format!(
                    "\n{} ({})\n",
                    file.path.display().bold(),
                    status_label(report.status)
                ));
                push_findings(&mut out, report);
            }
            (None, Some(error)) => {
                out.push_str(&format!("\n{} {}\n", file.path.display().bold(), error.red()));
            }
            _ => {}
        }
    }
    out.trim_end().to_string()
}

pub fn format_check_json(files: &[CheckedFile]) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&json!({
        "files": files,
        "total": files.len(),
    }))?)
}

pub fn format_fix_text(before: &QualityReport, after: &QualityReport, log: &FixLog) -> String {
    let mut out = format!(
        "Score: {} -> {} ({})\n",
        before.score,
        after.score,
        status_label(after.status)
    );

    let applied: Vec<_> = log.applied_records().collect();
    if applied.is_empty() {
        out.push_str("No fixes applied.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Stage", "Rule", "Section", "Change"]);
        for record in &applied {
            let target = record
                .target
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                record.stage.to_string(),
                record.rule.clone(),
                target,
                record.description.clone(),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    let notices: Vec<_> = log
        .records()
        .iter()
        .filter(|r| r.kind == FixKind::Notice)
        .collect();
    if !notices.is_empty() {
        out.push_str("\nNotes:\n");
        for record in notices {
            out.push_str(&format!(
                "  {} {}\n",
                record.rule.as_str().dimmed(),
                record.description
            ));
        }
    }

    if !(after.violations.is_empty() && after.warnings.is_empty()) {
        out.push_str("\nRemaining findings:\n");
        push_findings(&mut out, after);
    }
    out.trim_end().to_string()
}

pub fn format_fix_json(
    before: &QualityReport,
    after: &QualityReport,
    log: &FixLog,
) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&json!({
        "score_before_fix": before.score,
        "score": after.score,
        "status": after.status,
        "fixes": log.records(),
        "violations": after.violations,
        "warnings": after.warnings,
    }))?)
}
