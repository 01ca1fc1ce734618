//! TOML configuration file support for power users.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # mztab.toml
//! [validation]
//! level = "warn"
//! max_errors = 500
//! progress_interval = 50000
//!
//! [batch]
//! threads = 8
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mztab::config::ValidatorConfig;
use mztab::error::Level;

/// Root configuration structure for mztab.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Batch settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Configuration for validating a single file.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationConfig {
    /// Minimum severity to report.
    pub level: Option<Level>,

    /// Error list capacity.
    pub max_errors: Option<usize>,

    /// Lines between progress log messages.
    pub progress_interval: Option<usize>,
}

/// Configuration for validating many files.
#[derive(Debug, Default, Deserialize)]
pub struct BatchConfig {
    /// Number of worker threads.
    pub threads: Option<usize>,
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

    /// Apply the file settings on top of `base`.
    pub fn apply(&self, mut base: ValidatorConfig) -> ValidatorConfig {
        if let Some(level) = self.validation.level {
            base.level = level;
        }
        if let Some(max_errors) = self.validation.max_errors {
            base.max_errors = max_errors;
        }
        if let Some(interval) = self.validation.progress_interval {
            base.progress_interval = interval;
        }
        base
    }
}
