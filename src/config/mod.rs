//! Configuration
//!
//! Layered settings for the workflow runner: built-in defaults, an optional
//! `refchain.toml` in the workspace root, then `REFCHAIN__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

use crate::logging::LoggingConfig;
use crate::reference::DEFAULT_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use facade::ConfigLoader;

/// File name looked up in the workspace root
pub const WORKSPACE_CONFIG_FILE: &str = "refchain.toml";

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// Effective runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Directory for persisted refs; `None` keeps everything in memory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Extension for synthesized file names
    #[serde(default = "default_extension")]
    pub default_extension: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FlowConfig {
    /// Output directory resolved against `workspace_root` when relative.
    pub fn resolve_output_dir(&self, workspace_root: &Path) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                workspace_root.join(dir)
            }
        })
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_extension: default_extension(),
            logging: LoggingConfig::default(),
        }
    }
}
