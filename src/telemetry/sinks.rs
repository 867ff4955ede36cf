//! Telemetry sinks. Each is append-only; failures surface as `ApiError::TelemetryError` and
//! are swallowed by [`super::record_best_effort`].

use super::events::DecisionEnvelope;
use crate::error::ApiError;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait TelemetrySink: Send + Sync {
    fn record(&self, envelope: &DecisionEnvelope) -> Result<(), ApiError>;
}

/// Appends one JSON object per line.
pub struct JsonlTelemetrySink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlTelemetrySink {
    pub fn open(path: &Path) -> Result<Self, ApiError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySink for JsonlTelemetrySink {
    fn record(&self, envelope: &DecisionEnvelope) -> Result<(), ApiError> {
        let mut line = serde_json::to_string(envelope)?;
        line.push('\n');
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| {
                ApiError::TelemetryError(format!("{}: {}", self.path.display(), e))
            })
    }
}

/// Keeps envelopes in memory.
#[derive(Default)]
pub struct MemoryTelemetrySink {
    records: Mutex<Vec<DecisionEnvelope>>,
}

impl MemoryTelemetrySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<DecisionEnvelope> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl TelemetrySink for MemoryTelemetrySink {
    fn record(&self, envelope: &DecisionEnvelope) -> Result<(), ApiError> {
        self.records.lock().push(envelope.clone());
        Ok(())
    }
}

/// Emits each envelope as a structured `info!` event on the `pagewright::decision` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn record(&self, envelope: &DecisionEnvelope) -> Result<(), ApiError> {
        info!(
            target: "pagewright::decision",
            kind = ?envelope.kind,
            attempt = envelope.attempt,
            score = envelope.score,
            status = %envelope.status,
            decision = %envelope.decision,
            stop_reason = %envelope.stop_reason,
            confidence = envelope.confidence,
            forced_accept = envelope.forced_accept,
            is_oscillation = envelope.is_oscillation,
            autofix_rules = envelope.autofix_rules.len(),
            "decision"
        );
        Ok(())
    }
}
