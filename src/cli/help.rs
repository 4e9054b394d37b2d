//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log fields (e.g. "hash", "verify").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Hash { dry_run: true, .. } => "hash.dry_run",
        Commands::Hash { .. } => "hash",
        Commands::Verify { .. } => "verify",
        Commands::Status { .. } => "status",
    }
}
