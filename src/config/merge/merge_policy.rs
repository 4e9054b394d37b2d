//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Environment variable prefix, e.g. `HASHKEEP_COLLECTION__WORKERS=4`.
pub const ENV_PREFIX: &str = "HASHKEEP";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("collection.root", "downloads")?
        .set_default("collection.manifest", "md5s.txt")?
        .set_default("collection.report", "mismatches.txt")?
        .set_default("collection.workers", 1_i64)
}

/// Environment overrides, applied after every file source.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
