//! Quality report assembled from one validation pass.

use super::metadata::LayoutMetrics;
use super::scorer::{QualityStatus, ScoreBreakdown};
use super::violations::{Violation, ViolationCode};
use super::warnings::{self, Warning, WarningCode};
use crate::autofix::FixLog;
use crate::config::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub score: u8,
    pub status: QualityStatus,
    pub breakdown: ScoreBreakdown,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Warning>,
    pub metrics: LayoutMetrics,
}

impl QualityReport {
    pub fn new(
        breakdown: ScoreBreakdown,
        violations: Vec<Violation>,
        warnings: Vec<Warning>,
        metrics: LayoutMetrics,
    ) -> Self {
        let score = breakdown.total();
        Self {
            score,
            status: QualityStatus::from_score(score),
            breakdown,
            violations,
            warnings,
            metrics,
        }
    }

    /// Append the narrative-correction notices for a fix run.
    pub fn with_autofix_notices(mut self, log: &FixLog) -> Self {
        self.warnings.extend(warnings::autofix_notices(log));
        self
    }

    pub fn violation_codes(&self) -> BTreeSet<ViolationCode> {
        self.violations.iter().map(|v| v.code).collect()
    }

    pub fn warning_codes(&self) -> BTreeSet<WarningCode> {
        self.warnings.iter().map(|w| w.code).collect()
    }

    pub fn has_violation(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    pub fn critical_codes(&self, policy: &PolicyConfig) -> Vec<ViolationCode> {
        self.violation_codes()
            .into_iter()
            .filter(|c| policy.is_critical(*c))
            .collect()
    }

    pub fn has_critical(&self, policy: &PolicyConfig) -> bool {
        self.violations.iter().any(|v| policy.is_critical(v.code))
    }

    /// Codes present here but absent from `before`.
    pub fn introduced_since(&self, before: &QualityReport) -> Vec<ViolationCode> {
        let prior = before.violation_codes();
        self.violation_codes()
            .into_iter()
            .filter(|c| !prior.contains(c))
            .collect()
    }
}
