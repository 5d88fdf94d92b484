//! MergeService: orchestrates sources and deserializes to FlowConfig.

use crate::config::sources::{environment, workspace_file};
use crate::config::FlowConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for a workspace.
    /// Precedence: defaults (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<FlowConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<FlowConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = FlowConfig::default();
        Config::builder()
            .set_default("default_extension", defaults.default_extension)?
            .set_default("logging.level", defaults.logging.level)
    }
}
