//! CLI output: error mapping and exit codes.

use crate::error::{EngineError, StoreError};

/// Exit code when the run completed but found problems.
pub const EXIT_PROBLEMS: i32 = 2;

/// Exit code when the run aborted.
pub const EXIT_FAILURE: i32 = 1;

/// Map engine errors to a string for CLI output.
pub fn map_error(e: &EngineError) -> String {
    match e {
        EngineError::Store(StoreError::AppendIncomplete { path, .. }) => format!(
            "{}\nThe last line of {} may be incomplete; remove it before the next run.",
            e,
            path.display()
        ),
        EngineError::Store(_) => format!("{}\nThe manifest was left unchanged.", e),
        _ => e.to_string(),
    }
}

/// Result of a successful command: text for stdout plus whether problems were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub problems_found: bool,
}

impl CommandOutput {
    pub fn exit_code(&self) -> i32 {
        if self.problems_found {
            EXIT_PROBLEMS
        } else {
            0
        }
    }
}
