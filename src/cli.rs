//! CLI argument parsing for framejank

use crate::config::{SeverityPolicy, ThresholdConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for janky-frame diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Log lines tagged FrameMetrics on stderr (default)
    Text,
    /// One JSON object per janky frame on stdout
    Json,
}

/// Severity policy as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Error above --error-level-ms, warning between the two thresholds
    TwoTier,
    /// Compatibility mode: --no-warnings silences errors, --no-errors silences warnings
    Legacy,
}

impl From<PolicyArg> for SeverityPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::TwoTier => SeverityPolicy::TwoTier,
            PolicyArg::Legacy => SeverityPolicy::Legacy,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "framejank")]
#[command(version)]
#[command(about = "Replay frame-timing streams and report janky frames", long_about = None)]
pub struct Cli {
    /// JSON-lines event stream to replay ("-" for stdin)
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,

    /// TOML threshold configuration; flags override its values
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Frames with a total duration above this are janky
    #[arg(long = "warning-level-ms", value_name = "MS")]
    pub warning_level_ms: Option<f64>,

    /// Secondary threshold selecting error severity
    #[arg(long = "error-level-ms", value_name = "MS")]
    pub error_level_ms: Option<f64>,

    /// Suppress warning-severity diagnostics
    #[arg(long = "no-warnings")]
    pub no_warnings: bool,

    /// Suppress error-severity diagnostics
    #[arg(long = "no-errors")]
    pub no_errors: bool,

    /// How severity is chosen for janky frames
    #[arg(long = "severity-policy", value_enum, value_name = "POLICY")]
    pub severity_policy: Option<PolicyArg>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print a per-surface summary table after the replay
    #[arg(short = 'c', long = "summary")]
    pub summary: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Overlay command-line flags on a base configuration
    pub fn apply_overrides(&self, mut config: ThresholdConfig) -> ThresholdConfig {
        if let Some(ms) = self.warning_level_ms {
            config.warning_level_ms = ms;
        }
        if let Some(ms) = self.error_level_ms {
            config.error_level_ms = ms;
        }
        if self.no_warnings {
            config.show_warnings = false;
        }
        if self.no_errors {
            config.show_errors = false;
        }
        if let Some(policy) = self.severity_policy {
            config.severity_policy = policy.into();
        }
        config
    }
}
