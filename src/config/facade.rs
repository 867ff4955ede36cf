//! Config loader facade: assembles sources, deserializes, validates.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::PagewrightConfig;
use crate::error::ApiError;
use config::{Environment, File};
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest last): defaults, global file, workspace `config/config.toml`,
    /// workspace `config/{PAGEWRIGHT_ENV}.toml`, `PAGEWRIGHT__SECTION__KEY` environment.
    pub fn load(workspace_root: &Path) -> Result<PagewrightConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(Self::environment());

        let config: PagewrightConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load a single explicit file over the defaults (environment still applies).
    pub fn load_from_file(path: &Path) -> Result<PagewrightConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let config: PagewrightConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    fn environment() -> Environment {
        Environment::with_prefix("PAGEWRIGHT")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn validated(config: PagewrightConfig) -> Result<PagewrightConfig, ApiError> {
        if let Err(errors) = config.validate() {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::ConfigError(joined));
        }
        debug!(
            max_attempts = config.policy.max_attempts,
            telemetry = config.telemetry.enabled,
            "configuration loaded"
        );
        Ok(config)
    }
}
