//! Validator settings.

use serde::{Deserialize, Serialize};

use crate::error::{Level, DEFAULT_MAX_ERRORS};

/// Settings of a single validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Minimum severity retained in the error list
    pub level: Level,

    /// Capacity of the error list; validation stops once it is exceeded
    pub max_errors: usize,

    /// Log a progress line every N input lines (0 disables)
    pub progress_interval: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            max_errors: DEFAULT_MAX_ERRORS,
            progress_interval: 10_000,
        }
    }
}

impl ValidatorConfig {
    /// Only retain errors, dropping warnings and informational remarks
    pub fn errors_only() -> Self {
        Self {
            level: Level::Error,
            ..Default::default()
        }
    }

    /// Set the minimum retained severity
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the error list capacity
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}
