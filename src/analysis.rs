//! Layout Analysis
//!
//! Pure validation of a layout against the house style guide:
//!
//! - [`metadata`]: single-pass aggregate statistics
//! - [`violations`]: hard rules, some of which are critical and block acceptance
//! - [`warnings`]: soft advisory rules
//! - [`scorer`]: five 0-5 axes and the status band
//!
//! [`Validator::validate`] runs all of them and returns a [`QualityReport`].

pub mod metadata;
pub mod report;
pub mod scorer;
pub mod violations;
pub mod warnings;

pub use metadata::LayoutMetrics;
pub use report::QualityReport;
pub use scorer::{QualityStatus, ScoreBreakdown};
pub use violations::{Violation, ViolationCode};
pub use warnings::{Warning, WarningCode};

use crate::catalog::CategoryCatalog;
use crate::config::PolicyConfig;
use crate::layout::Layout;

/// Runs extraction, detection and scoring with a fixed catalog and policy.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    catalog: &'a CategoryCatalog,
    policy: &'a PolicyConfig,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a CategoryCatalog, policy: &'a PolicyConfig) -> Self {
        Self { catalog, policy }
    }

    pub fn validate(&self, layout: &Layout) -> QualityReport {
        let sections = &layout.sections;
        let metrics = metadata::extract(sections, self.catalog);
        let violations = violations::detect(&metrics, self.policy);
        let warnings = warnings::detect(sections, &metrics, self.catalog, self.policy);
        let breakdown = scorer::score(sections, &metrics, self.catalog);
        QualityReport::new(breakdown, violations, warnings, metrics)
    }
}
