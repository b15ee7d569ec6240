// Threshold configuration for jank classification
//
// Built once before any surface is attached and shared read-only afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default warning threshold: one frame at 60 Hz
pub const DEFAULT_WARNING_LEVEL_MS: f64 = 17.0;
/// Default error threshold: two frames at 60 Hz
pub const DEFAULT_ERROR_LEVEL_MS: f64 = 34.0;

/// Errors raised while building or loading a [`ThresholdConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number of milliseconds, got {value}")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse threshold config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How a janky frame's severity is chosen
///
/// The listener this crate replaces gated the ERROR branch on the
/// `show_warnings` flag and used `show_errors` for the WARN fallback, never
/// consulting `warning_level_ms` for the choice. [`SeverityPolicy::Legacy`]
/// reproduces that; [`SeverityPolicy::TwoTier`] is the behaviour the field
/// names describe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeverityPolicy {
    /// `total > error_level_ms` is an error, anything else past the warning
    /// threshold is a warning; each tier is gated by its own flag
    #[default]
    TwoTier,
    /// `show_warnings && total > error_level_ms` is an error, otherwise
    /// `show_errors` yields a warning
    Legacy,
}

/// Immutable thresholds shared by every tracked surface
///
/// # Example
/// ```
/// use framejank::config::ThresholdConfig;
///
/// let config = ThresholdConfig {
///     warning_level_ms: 8.0,
///     ..ThresholdConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// A frame is janky when its total duration is strictly above this
    pub warning_level_ms: f64,
    /// Secondary threshold; see [`SeverityPolicy`] for how it is used
    pub error_level_ms: f64,
    /// Enables warning-severity dispatch
    pub show_warnings: bool,
    /// Enables error-severity dispatch
    pub show_errors: bool,
    pub severity_policy: SeverityPolicy,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            warning_level_ms: DEFAULT_WARNING_LEVEL_MS,
            error_level_ms: DEFAULT_ERROR_LEVEL_MS,
            show_warnings: true,
            show_errors: true,
            severity_policy: SeverityPolicy::default(),
        }
    }
}

impl ThresholdConfig {
    /// Report every frame with a non-zero duration
    ///
    /// Both thresholds at zero, as used when profiling a single screen.
    pub fn report_all() -> Self {
        Self {
            warning_level_ms: 0.0,
            error_level_ms: 0.0,
            ..Self::default()
        }
    }

    /// Load and validate a config from a TOML file
    ///
    /// # Example TOML
    /// ```toml
    /// warning_level_ms = 17.0
    /// error_level_ms = 34.0
    /// show_warnings = true
    /// show_errors = true
    /// severity_policy = "two-tier"
    /// ```
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from TOML text; missing keys use defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("warning_level_ms", self.warning_level_ms)?;
        check_threshold("error_level_ms", self.error_level_ms)?;
        Ok(())
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { field, value })
    }
}
