//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; a single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{
    format_check_json, format_check_text, format_fix_json, format_fix_text, format_outcome_json,
    format_outcome_text, CheckedFile,
};
pub use route::RunContext;
