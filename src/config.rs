//! Configuration System
//!
//! Layered configuration for the quality gate: policy constants, catalog additions,
//! telemetry, candidate source, and logging. Sources merge in order of increasing
//! precedence: built-in defaults, the global user file, workspace files, then
//! `PAGEWRIGHT__*` environment variables. Tests included.

use crate::analysis::ViolationCode;
use crate::catalog::{CatalogOverrides, CategoryCatalog};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod paths;
mod sources;

pub use facade::ConfigLoader;
pub use paths::global_config_path;

/// Hard cap on candidate attempts per run, whatever the configuration says.
pub const ATTEMPT_HARD_CAP: u32 = 3;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagewrightConfig {
    /// Decision and rule thresholds
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Exact-entry additions to the category tables
    #[serde(default)]
    pub catalog: CatalogOverrides,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Remote candidate source (used by `pagewright run --remote`)
    #[serde(default)]
    pub source: CandidateSourceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Named policy constants. Defaults are the house policy; none are inferred at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Confidence when no critical violation remains
    #[serde(default = "default_confidence_clean")]
    pub confidence_clean: f64,

    /// Confidence while a critical violation remains
    #[serde(default = "default_confidence_critical")]
    pub confidence_critical: f64,

    /// Confidence forced on an autofix regression
    #[serde(default)]
    pub confidence_regression: f64,

    /// Scores below this at the final attempt are accepted as "forced"
    #[serde(default = "default_forced_accept_floor")]
    pub forced_accept_floor: u8,

    /// Pre-fix score at which the final call-to-action scales to XL
    #[serde(default = "default_cta_xl_score")]
    pub cta_xl_score: u8,

    /// Pre-fix confidence at which the final call-to-action scales to XL
    #[serde(default = "default_cta_xl_confidence")]
    pub cta_xl_confidence: f64,

    #[serde(default = "default_narrative_preserve_threshold")]
    pub narrative_preserve_threshold: u8,

    #[serde(default = "default_narrative_blocked_threshold")]
    pub narrative_blocked_threshold: u8,

    /// Maximum index distance for a narrative swap
    #[serde(default = "default_narrative_swap_distance")]
    pub narrative_swap_distance: usize,

    #[serde(default = "default_max_dark_sections")]
    pub max_dark_sections: usize,

    #[serde(default = "default_min_sections")]
    pub min_sections: usize,

    #[serde(default = "default_max_sections")]
    pub max_sections: usize,

    /// Section count the long-page merge stage aims for
    #[serde(default = "default_max_sections")]
    pub merge_target: usize,

    /// Violations that block ACCEPT
    #[serde(default = "default_critical_violations")]
    pub critical_violations: Vec<ViolationCode>,
}

fn default_max_attempts() -> u32 {
    ATTEMPT_HARD_CAP
}

fn default_confidence_clean() -> f64 {
    0.9
}

fn default_confidence_critical() -> f64 {
    0.5
}

fn default_forced_accept_floor() -> u8 {
    11
}

fn default_cta_xl_score() -> u8 {
    18
}

fn default_cta_xl_confidence() -> f64 {
    0.7
}

fn default_narrative_preserve_threshold() -> u8 {
    60
}

fn default_narrative_blocked_threshold() -> u8 {
    40
}

fn default_narrative_swap_distance() -> usize {
    2
}

fn default_max_dark_sections() -> usize {
    2
}

fn default_min_sections() -> usize {
    6
}

fn default_max_sections() -> usize {
    10
}

pub(crate) fn default_critical_violations() -> Vec<ViolationCode> {
    vec![
        ViolationCode::MissingFinalCta,
        ViolationCode::FinalCtaNotLast,
        ViolationCode::PrimaryCountInvalid,
        ViolationCode::PrimaryMisuse,
        ViolationCode::DarkMisuse,
    ]
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            confidence_clean: default_confidence_clean(),
            confidence_critical: default_confidence_critical(),
            confidence_regression: 0.0,
            forced_accept_floor: default_forced_accept_floor(),
            cta_xl_score: default_cta_xl_score(),
            cta_xl_confidence: default_cta_xl_confidence(),
            narrative_preserve_threshold: default_narrative_preserve_threshold(),
            narrative_blocked_threshold: default_narrative_blocked_threshold(),
            narrative_swap_distance: default_narrative_swap_distance(),
            max_dark_sections: default_max_dark_sections(),
            min_sections: default_min_sections(),
            max_sections: default_max_sections(),
            merge_target: default_max_sections(),
            critical_violations: default_critical_violations(),
        }
    }
}

impl PolicyConfig {
    pub fn is_critical(&self, code: ViolationCode) -> bool {
        self.critical_violations.contains(&code)
    }

    /// Attempts actually run: configured value, never above the hard cap.
    pub fn attempt_limit(&self) -> u32 {
        self.max_attempts.clamp(1, ATTEMPT_HARD_CAP)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.max_attempts > ATTEMPT_HARD_CAP {
            return Err(format!(
                "max_attempts must be between 1 and {}, got {}",
                ATTEMPT_HARD_CAP, self.max_attempts
            ));
        }
        for (name, value) in [
            ("confidence_clean", self.confidence_clean),
            ("confidence_critical", self.confidence_critical),
            ("confidence_regression", self.confidence_regression),
            ("cta_xl_confidence", self.cta_xl_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        if self.narrative_blocked_threshold > self.narrative_preserve_threshold
            || self.narrative_preserve_threshold > 100
        {
            return Err(format!(
                "narrative thresholds must satisfy blocked <= preserve <= 100, got {} / {}",
                self.narrative_blocked_threshold, self.narrative_preserve_threshold
            ));
        }
        if self.forced_accept_floor > 25 || self.cta_xl_score > 25 {
            return Err("score thresholds must be within [0, 25]".to_string());
        }
        if self.min_sections > self.max_sections {
            return Err(format!(
                "min_sections ({}) exceeds max_sections ({})",
                self.min_sections, self.max_sections
            ));
        }
        if self.merge_target == 0 {
            return Err("merge_target must be positive".to_string());
        }
        Ok(())
    }
}

/// Decision telemetry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON-lines decision log; decisions go to tracing when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// HTTP candidate source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSourceConfig {
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for CandidateSourceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Policy(String),
    Source(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Policy(msg) => write!(f, "Policy: {}", msg),
            ValidationError::Source(msg) => write!(f, "Source: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl PagewrightConfig {
    /// Category tables with configured additions applied.
    pub fn catalog(&self) -> CategoryCatalog {
        CategoryCatalog::default().with_overrides(&self.catalog)
    }

    /// Validate the whole configuration, collecting every error.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(msg) = self.policy.validate() {
            errors.push(ValidationError::Policy(msg));
        }

        if let Some(endpoint) = &self.source.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                errors.push(ValidationError::Source(format!(
                    "endpoint must be an http(s) URL, got {}",
                    endpoint
                )));
            }
        }
        if self.source.timeout_secs == 0 {
            errors.push(ValidationError::Source(
                "timeout_secs must be positive".to_string(),
            ));
        }

        if !["json", "text"].contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "format must be 'json' or 'text', got {}",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
