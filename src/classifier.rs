//! Jank classifier and reporter
//!
//! Tracks per-surface frame counters and decides, for every delivered frame,
//! whether it is janky and at which severity it is reported.
//!
//! # Concurrency
//!
//! The registry (`handle -> surface`) sits behind one `RwLock`; each surface
//! has its own `Mutex`. [`JankClassifier::on_frame`] holds the registry lock
//! only long enough to clone the surface `Arc`, so frames for different
//! surfaces are processed in parallel while frames for one surface are
//! serialized.

use crate::config::{ConfigError, SeverityPolicy, ThresholdConfig};
use crate::frame::FrameSample;
use crate::record::{janky_percent, DiagnosticRecord, Severity};
use crate::sink::{DiagnosticSink, TracingSink};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors for classifier operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("Surface name must not be empty")]
    EmptySurfaceName,
}

/// Opaque identity of one attached surface instance
///
/// Every `attach` returns a fresh handle, so two live instances of the same
/// screen type never share counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(u64);

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Counters for one attached surface
#[derive(Debug, Clone)]
pub struct TrackedSurface {
    name: String,
    all_frames: u64,
    janky_frames: u64,
    dropped_reports: u64,
}

impl TrackedSurface {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            all_frames: 0,
            janky_frames: 0,
            dropped_reports: 0,
        }
    }

    fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            name: self.name.clone(),
            all_frames: self.all_frames,
            janky_frames: self.janky_frames,
            dropped_reports: self.dropped_reports,
        }
    }
}

/// Point-in-time copy of a surface's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceSnapshot {
    pub name: String,
    pub all_frames: u64,
    pub janky_frames: u64,
    /// Sum of the platform's dropped-report counts delivered with samples
    pub dropped_reports: u64,
}

impl SurfaceSnapshot {
    pub fn janky_percent(&self) -> f64 {
        janky_percent(self.janky_frames, self.all_frames)
    }
}

/// Outcome of delivering one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict {
    /// Surface not attached; nothing was counted
    Dropped,
    /// Counted, within the warning threshold
    Smooth,
    /// Counted as janky; `severity` is `None` when nothing was dispatched
    Janky { severity: Option<Severity> },
}

impl FrameVerdict {
    pub fn is_janky(&self) -> bool {
        matches!(self, FrameVerdict::Janky { .. })
    }
}

/// Pick the severity for a frame already known to be past the warning level
pub fn select_severity(config: &ThresholdConfig, total_ms: f64) -> Option<Severity> {
    match config.severity_policy {
        SeverityPolicy::TwoTier => {
            if total_ms > config.error_level_ms {
                config.show_errors.then_some(Severity::Error)
            } else {
                config.show_warnings.then_some(Severity::Warning)
            }
        }
        SeverityPolicy::Legacy => {
            if config.show_warnings && total_ms > config.error_level_ms {
                Some(Severity::Error)
            } else if config.show_errors {
                Some(Severity::Warning)
            } else {
                None
            }
        }
    }
}

/// Classifies frames per surface and dispatches diagnostics for janky ones
pub struct JankClassifier {
    config: ThresholdConfig,
    sink: Arc<dyn DiagnosticSink>,
    surfaces: RwLock<HashMap<SurfaceHandle, Arc<Mutex<TrackedSurface>>>>,
    next_handle: AtomicU64,
}

impl fmt::Debug for JankClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JankClassifier")
            .field("config", &self.config)
            .field("tracked", &self.tracked_count())
            .finish()
    }
}

impl JankClassifier {
    /// Create a classifier that logs through `tracing`
    pub fn new(config: ThresholdConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create a classifier with a custom diagnostic sink
    ///
    /// # Errors
    /// Rejects thresholds that are negative or not finite; a NaN warning
    /// level would otherwise classify every frame as janky.
    pub fn with_sink(
        config: ThresholdConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sink,
            surfaces: RwLock::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Start tracking a surface with both counters at zero
    pub fn attach(&self, name: &str) -> Result<SurfaceHandle, ClassifierError> {
        if name.is_empty() {
            return Err(ClassifierError::EmptySurfaceName);
        }

        let handle = SurfaceHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.surfaces
            .write()
            .insert(handle, Arc::new(Mutex::new(TrackedSurface::new(name))));
        tracing::debug!(%handle, surface = name, "attached");
        Ok(handle)
    }

    /// Stop tracking a surface, returning its final counters
    ///
    /// Unknown or already-detached handles are a no-op.
    pub fn detach(&self, handle: SurfaceHandle) -> Option<SurfaceSnapshot> {
        let surface = self.surfaces.write().remove(&handle)?;
        let snapshot = surface.lock().snapshot();
        tracing::debug!(
            %handle,
            surface = %snapshot.name,
            all_frames = snapshot.all_frames,
            janky_frames = snapshot.janky_frames,
            "detached"
        );
        Some(snapshot)
    }

    /// Current counters of an attached surface
    pub fn snapshot(&self, handle: SurfaceHandle) -> Option<SurfaceSnapshot> {
        let surface = self.surfaces.read().get(&handle).cloned()?;
        let snapshot = surface.lock().snapshot();
        Some(snapshot)
    }

    /// Number of attached surfaces
    pub fn tracked_count(&self) -> usize {
        self.surfaces.read().len()
    }

    /// Count one frame and report it if janky
    pub fn on_frame(&self, handle: SurfaceHandle, sample: &FrameSample) -> FrameVerdict {
        // Read lock is released at the end of this statement
        let Some(surface) = self.surfaces.read().get(&handle).cloned() else {
            tracing::trace!(%handle, "frame for unattached surface dropped");
            return FrameVerdict::Dropped;
        };

        let mut surface = surface.lock();
        surface.all_frames += 1;
        surface.dropped_reports += u64::from(sample.dropped_since_last);

        let total_ms = sample.total_ms();
        if total_ms <= self.config.warning_level_ms {
            tracing::trace!(%handle, total_ms, "smooth frame");
            return FrameVerdict::Smooth;
        }

        surface.janky_frames += 1;
        let severity = select_severity(&self.config, total_ms);
        if let Some(severity) = severity {
            let record = DiagnosticRecord::new(
                &surface.name,
                sample.breakdown(),
                surface.janky_frames,
                surface.all_frames,
            );
            self.sink.dispatch(severity, &record);
        }

        FrameVerdict::Janky { severity }
    }
}
