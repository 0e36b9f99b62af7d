//! TOML configuration file support.
//!
//! Defaults for the export and follow commands can be kept in a file instead
//! of being repeated on every invocation:
//!
//! ```toml
//! # specfile.toml
//! [export]
//! format = "csv"
//! append = true
//!
//! [follow]
//! interval_ms = 500
//! max_polls = 0
//! ```
//!
//! Command-line flags override values from the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use specfile::export::ExportFormat;

/// Root configuration structure for specfile.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Export command settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Follow command settings.
    #[serde(default)]
    pub follow: FollowConfig,
}

/// Configuration for the export command.
#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    /// Output layout (spec, tabs or csv).
    pub format: Option<ExportFormat>,

    /// Append to the output file instead of replacing it.
    pub append: Option<bool>,
}

/// Configuration for the follow command.
#[derive(Debug, Default, Deserialize)]
pub struct FollowConfig {
    /// Polling interval in milliseconds.
    pub interval_ms: Option<u64>,

    /// Number of polls before stopping; 0 polls forever.
    pub max_polls: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
