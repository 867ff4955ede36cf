//! Best-effort emission.

use super::events::DecisionEnvelope;
use super::sinks::TelemetrySink;
use tracing::warn;

/// Record an envelope; a sink failure is logged and dropped.
pub fn record_best_effort(sink: Option<&dyn TelemetrySink>, envelope: &DecisionEnvelope) {
    let Some(sink) = sink else {
        return;
    };
    if let Err(err) = sink.record(envelope) {
        warn!(
            attempt = envelope.attempt,
            kind = ?envelope.kind,
            error = %err,
            "failed to record decision telemetry"
        );
    }
}
