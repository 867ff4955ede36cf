//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::analysis::Validator;
use crate::autofix::{AutoFix, FixSignals, PaletteStyler, SeededIds};
use crate::catalog::CategoryCatalog;
use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{
    format_check_json, format_check_text, format_fix_json, format_fix_text, format_outcome_json,
    format_outcome_text, CheckedFile,
};
use crate::config::{ConfigLoader, PagewrightConfig};
use crate::controller::ConfidenceController;
use crate::error::ApiError;
use crate::layout::{ingest, Layout};
use crate::provider::{
    CandidateSource, GenerationContext, HttpCandidateSource, ScriptedCandidates, ScriptedItem,
};
use crate::telemetry::{JsonlTelemetrySink, TelemetrySink, TracingTelemetrySink};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Runtime context for CLI execution: workspace, effective configuration and collaborators.
pub struct RunContext {
    workspace_root: PathBuf,
    config: PagewrightConfig,
    catalog: CategoryCatalog,
    styler: PaletteStyler,
    telemetry: Option<Box<dyn TelemetrySink>>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: PagewrightConfig) -> Self {
        let catalog = config.catalog();
        let telemetry = open_telemetry(&workspace_root, &config);
        Self {
            workspace_root,
            config,
            catalog,
            styler: PaletteStyler::default(),
            telemetry,
        }
    }

    pub fn config(&self) -> &PagewrightConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        debug!(command = command.name(), "executing command");
        match command {
            Commands::Check { path, format } => self.handle_check(path, format),
            Commands::Fix {
                file,
                seed,
                output,
                format,
            } => self.handle_fix(file, *seed, output.as_deref(), format),
            Commands::Run {
                files,
                seed,
                remote,
                brief,
                output,
                format,
            } => self.handle_run(files, *seed, *remote, brief.as_deref(), output.as_deref(), format),
            Commands::Config {
                command: ConfigCommands::Show,
            } => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    fn handle_check(&self, path: &Path, format: &str) -> Result<String, ApiError> {
        let root = self.resolve(path);
        let files: Vec<PathBuf> = if root.is_dir() {
            WalkDir::new(&root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        warn!(error = %err, "skipping unreadable entry");
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
                .collect()
        } else if root.is_file() {
            vec![root]
        } else {
            return Err(ApiError::IngestError(format!(
                "No such file or directory: {}",
                root.display()
            )));
        };

        let validator = Validator::new(&self.catalog, &self.config.policy);
        let checked: Vec<CheckedFile> = files
            .into_iter()
            .map(|path| match ingest::from_path(&path) {
                Ok(layout) => CheckedFile {
                    report: Some(validator.validate(&layout)),
                    error: None,
                    path,
                },
                Err(err) => CheckedFile {
                    report: None,
                    error: Some(err.to_string()),
                    path,
                },
            })
            .collect();

        if format == "json" {
            format_check_json(&checked)
        } else {
            Ok(format_check_text(&checked))
        }
    }

    fn handle_fix(
        &self,
        file: &Path,
        seed: u64,
        output: Option<&Path>,
        format: &str,
    ) -> Result<String, ApiError> {
        let layout = ingest::from_path(&self.resolve(file))?;
        let policy = &self.config.policy;
        let validator = Validator::new(&self.catalog, policy);

        let before = validator.validate(&layout);
        let signals = FixSignals::from_report(&before, policy);
        let fixed = AutoFix::new(&self.catalog, policy, &self.styler).run(
            layout,
            signals,
            &mut SeededIds::new(seed),
        );
        let after = validator
            .validate(&fixed.layout)
            .with_autofix_notices(&fixed.log);

        if let Some(output) = output {
            write_layout(&self.resolve(output), &fixed.layout)?;
        }
        if format == "json" {
            format_fix_json(&before, &after, &fixed.log)
        } else {
            Ok(format_fix_text(&before, &after, &fixed.log))
        }
    }

    fn handle_run(
        &self,
        files: &[PathBuf],
        seed: u64,
        remote: bool,
        brief: Option<&str>,
        output: Option<&Path>,
        format: &str,
    ) -> Result<String, ApiError> {
        let source: Box<dyn CandidateSource> = if remote {
            Box::new(HttpCandidateSource::from_config(&self.config.source)?)
        } else {
            if files.is_empty() {
                return Err(ApiError::IngestError(
                    "run needs at least one layout file, or --remote".to_string(),
                ));
            }
            let items = files.iter().map(|file| match ingest::from_path(&self.resolve(file)) {
                Ok(layout) => ScriptedItem::Layout(layout),
                Err(err) => ScriptedItem::Failure(err.to_string()),
            });
            Box::new(ScriptedCandidates::new(items))
        };

        let request: Value = match brief {
            Some(raw) => serde_json::from_str(raw)?,
            None => Value::Null,
        };
        let context = GenerationContext::new(request);

        let mut controller =
            ConfidenceController::new(&self.catalog, &self.config.policy, &self.styler);
        if let Some(sink) = self.telemetry.as_deref() {
            controller = controller.with_telemetry(sink);
        }

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::ProviderError(format!("Failed to create runtime: {}", e)))?;
        let mut ids = SeededIds::new(seed);
        let outcome = rt.block_on(controller.run(source.as_ref(), &context, &mut ids));

        if let (Some(output), Some(layout)) = (output, outcome.layout.as_ref()) {
            write_layout(&self.resolve(output), layout)?;
        }
        if format == "json" {
            format_outcome_json(&outcome)
        } else {
            Ok(format_outcome_text(&outcome))
        }
    }
}

fn write_layout(path: &Path, layout: &Layout) -> Result<(), ApiError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(layout)?)?;
    Ok(())
}

/// Configured sink; a JSON-lines file that cannot be opened degrades to tracing.
fn open_telemetry(workspace_root: &Path, config: &PagewrightConfig) -> Option<Box<dyn TelemetrySink>> {
    if !config.telemetry.enabled {
        return None;
    }
    match &config.telemetry.log_file {
        Some(file) => {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                workspace_root.join(file)
            };
            match JsonlTelemetrySink::open(&path) {
                Ok(sink) => Some(Box::new(sink)),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "decision log unavailable");
                    Some(Box::new(TracingTelemetrySink))
                }
            }
        }
        None => Some(Box::new(TracingTelemetrySink)),
    }
}
