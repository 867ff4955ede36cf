//! CLI presentation: text and json formatters per command family.

mod decision;
mod report;

pub use decision::{format_outcome_json, format_outcome_text};
pub use report::{
    format_check_json, format_check_text, format_fix_json, format_fix_text, CheckedFile,
};
