//! Per-frame timing samples and their millisecond breakdown
//!
//! A [`FrameSample`] is what the platform hands over for one rendered frame:
//! raw nanosecond durations per pipeline stage. [`FrameBreakdown`] is the same
//! data converted to milliseconds, plus the derived residual cost.

use serde::{Deserialize, Serialize};

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Convert a raw nanosecond duration to milliseconds
///
/// Equivalent to `ns * 1e-6`, but divides so that whole milliseconds
/// convert exactly (17_000_000 ns is exactly 17.0 ms).
pub fn nanos_to_ms(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_MILLI
}

/// Raw timing snapshot for a single rendered frame
///
/// All durations are nanoseconds as supplied by the platform. `total` is
/// not required to equal the sum of the stage durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSample {
    /// Total frame duration (ns)
    pub total: u64,
    /// Input handling (ns)
    pub input: u64,
    /// Animation callbacks (ns)
    pub animation: u64,
    /// Layout and measure (ns)
    pub layout: u64,
    /// Draw / record (ns)
    pub draw: u64,
    /// Sync to the render thread (ns)
    pub sync: u64,
    /// GPU command issue (ns)
    pub gpu_command: u64,
    /// Buffer swap (ns)
    pub swap_buffers: u64,
    /// Frames the platform dropped before delivering this one
    pub dropped_since_last: u32,
}

impl FrameSample {
    /// Sample with only a total duration, all stages zero
    pub fn with_total(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Total duration in milliseconds
    pub fn total_ms(&self) -> f64 {
        nanos_to_ms(self.total)
    }

    /// Convert every stage to milliseconds
    pub fn breakdown(&self) -> FrameBreakdown {
        let total_ms = self.total_ms();
        let layout_ms = nanos_to_ms(self.layout);
        let draw_ms = nanos_to_ms(self.draw);
        let gpu_command_ms = nanos_to_ms(self.gpu_command);

        FrameBreakdown {
            total_ms,
            input_ms: nanos_to_ms(self.input),
            animation_ms: nanos_to_ms(self.animation),
            layout_ms,
            draw_ms,
            sync_ms: nanos_to_ms(self.sync),
            gpu_command_ms,
            swap_buffers_ms: nanos_to_ms(self.swap_buffers),
            // Not clamped: a negative residual means the platform's stage
            // accounting overlaps and is reported as-is.
            other_ms: total_ms - layout_ms - draw_ms - gpu_command_ms,
        }
    }
}

/// Millisecond view of a [`FrameSample`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameBreakdown {
    pub total_ms: f64,
    pub input_ms: f64,
    pub animation_ms: f64,
    pub layout_ms: f64,
    pub draw_ms: f64,
    pub sync_ms: f64,
    pub gpu_command_ms: f64,
    pub swap_buffers_ms: f64,
    /// `total - layout - draw - gpu_command`, may be negative
    pub other_ms: f64,
}
