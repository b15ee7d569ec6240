//! Diagnostic records emitted for janky frames

use crate::frame::FrameBreakdown;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log tag every diagnostic is emitted under
pub const LOG_TAG: &str = "FrameMetrics";

/// Severity a janky frame is reported at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Report for one janky frame
///
/// Built, formatted and dispatched in one step; the classifier keeps no copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Readable surface name (e.g. the activity's simple class name)
    pub surface: String,
    #[serde(flatten)]
    pub breakdown: FrameBreakdown,
    /// Janky frames on this surface so far, including this one
    pub janky_frames: u64,
    /// All frames on this surface so far, including this one
    pub all_frames: u64,
    /// `janky_frames / all_frames * 100`
    pub janky_percent: f64,
}

impl DiagnosticRecord {
    pub fn new(
        surface: &str,
        breakdown: FrameBreakdown,
        janky_frames: u64,
        all_frames: u64,
    ) -> Self {
        Self {
            surface: surface.to_string(),
            breakdown,
            janky_frames,
            all_frames,
            janky_percent: janky_percent(janky_frames, all_frames),
        }
    }
}

/// Percentage of janky frames; zero when no frames have been seen
pub fn janky_percent(janky_frames: u64, all_frames: u64) -> f64 {
    if all_frames == 0 {
        return 0.0;
    }
    janky_frames as f64 * 100.0 / all_frames as f64
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.breakdown;
        writeln!(
            f,
            "Janky frame detected on {} with total duration: {:.2}ms",
            self.surface, b.total_ms
        )?;
        writeln!(
            f,
            "Activity : {}  input: {:.2}ms  animation: {:.2}ms  Layout/measure: {:.2}ms  \
             draw:{:.2}ms  sync :{:.2}ms  gpuCommand:{:.2}ms  swapBuffer :{:.2}ms  \
             total:{:.2}ms  jankyFrames :{}  allFrames :{}",
            self.surface,
            b.input_ms,
            b.animation_ms,
            b.layout_ms,
            b.draw_ms,
            b.sync_ms,
            b.gpu_command_ms,
            b.swap_buffers_ms,
            b.total_ms,
            self.janky_frames,
            self.all_frames
        )?;
        write!(
            f,
            "Janky frames: {}/{}({:.2}%)",
            self.janky_frames, self.all_frames, self.janky_percent
        )
    }
}
