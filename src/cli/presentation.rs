//! CLI presentation: text and json formatters per command.

mod hash;
mod status;
mod verify;

pub use hash::{format_hash_summary, format_pending};
pub use status::{format_status, ManifestStatus};
pub use verify::format_verification;
