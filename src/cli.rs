//! CLI domain: parse, route, help, output, and presentation only.
//! No engine logic; a single route table dispatches to the hasher and verifier.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, CommandOutput, EXIT_FAILURE, EXIT_PROBLEMS};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_hash_summary, format_pending, format_status, format_verification, ManifestStatus,
};
pub use route::RunContext;
