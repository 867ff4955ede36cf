//! Decision telemetry: one envelope per attempt and per terminal decision, written to an
//! append-only sink. Emission is best-effort and never feeds back into the decision path.

pub mod emission;
pub mod events;
pub mod sinks;

pub use emission::record_best_effort;
pub use events::{DecisionEnvelope, EnvelopeKind};
pub use sinks::{JsonlTelemetrySink, MemoryTelemetrySink, TelemetrySink, TracingTelemetrySink};
