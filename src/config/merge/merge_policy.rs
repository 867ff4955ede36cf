//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace earlier ones key by key; lists (such as
//! `policy.critical_violations`) are replaced whole, never concatenated.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    let critical: Vec<String> = crate::config::default_critical_violations()
        .iter()
        .map(|code| code.as_str().to_string())
        .collect();

    Config::builder()
        .set_default("policy.max_attempts", 3)?
        .set_default("policy.confidence_clean", 0.9)?
        .set_default("policy.confidence_critical", 0.5)?
        .set_default("policy.confidence_regression", 0.0)?
        .set_default("policy.forced_accept_floor", 11)?
        .set_default("policy.narrative_preserve_threshold", 60)?
        .set_default("policy.narrative_blocked_threshold", 40)?
        .set_default("policy.critical_violations", critical)?
        .set_default("telemetry.enabled", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")
}
