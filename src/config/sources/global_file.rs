//! Global config file source: $XDG_CONFIG_HOME/pagewright/config.toml or the platform config dir

use crate::config::paths::global_config_path;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use tracing::debug;

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.exists() {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        } else {
            debug!(
                config_path = %path.display(),
                "no global configuration file; using built-in defaults"
            );
        }
    }
    Ok(builder)
}
