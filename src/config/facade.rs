//! Configuration loading facade: one entry point over all sources.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::HashkeepConfig;
use config::{ConfigError, File};
use std::path::Path;

/// Loads [`HashkeepConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`HASHKEEP_COLLECTION__ROOT`, ...)
    /// 2. `<workspace>/hashkeep.toml`
    /// 3. Global config file
    /// 4. Defaults
    pub fn load(workspace_root: &Path) -> Result<HashkeepConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        builder
            .add_source(merge_policy::environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an explicit file, skipping the global and
    /// workspace files. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<HashkeepConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(merge_policy::environment())
            .build()?
            .try_deserialize()
    }
}
