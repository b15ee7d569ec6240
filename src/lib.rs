//! framejank - Frame-jank classification and reporting
//!
//! This library tracks per-surface frame timing samples, classifies each
//! frame against warning/error thresholds and reports janky frames through a
//! pluggable diagnostic sink.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod frame;
pub mod lifecycle;
pub mod record;
pub mod replay;
pub mod sink;

pub use classifier::{FrameVerdict, JankClassifier, SurfaceHandle, SurfaceSnapshot};
pub use config::{SeverityPolicy, ThresholdConfig};
pub use frame::FrameSample;
pub use record::{DiagnosticRecord, Severity};
