//! AutoFix Pipeline
//!
//! Eighteen ordered repair stages folded over a layout. Each stage is a plain function
//! `(Layout, FixLog, &mut FixContext) -> (Layout, FixLog)`: the fix log is threaded through
//! explicitly and all randomness comes from the injected [`IdSource`].
//!
//! Stage order matters. Context repairs (1-7) establish the DARK/PRIMARY invariants, the
//! structural stages (8-9) reshape content only when the pre-fix report asked for it, the
//! attribute stages (10-16) fill in visual and narrative attributes, and the narrative stages
//! (17-18) report and repair the story arc.

pub mod ids;
pub mod log;
pub mod pipeline;
pub mod stages;
pub mod styler;

pub use ids::{IdSource, SeededIds};
pub use log::{FixKind, FixLog, FixRecord};
pub use pipeline::{AutoFix, FixContext, FixOutcome, FixSignals, Stage, StageFn, STAGES};
pub use styler::{ContextStyler, PaletteStyler};
