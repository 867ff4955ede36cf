//! The eighteen fix stages, grouped by concern.
//!
//! Every stage has the same shape, `(Layout, FixLog, &mut FixContext) -> (Layout, FixLog)`,
//! and records a [`FixRecord`](super::FixRecord) only when it changes something (or, for
//! the narrative stages, when it has something to report).

pub mod context;
pub mod narrative;
pub mod structure;
pub mod visual;
