//! Replay recorded frame-timing streams through the classifier
//!
//! Input is JSON lines, one event per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! {"event":"active","surface":"main-1","name":"MainActivity"}
//! {"event":"frame","surface":"main-1","total":20000000,"layout":5000000}
//! {"event":"inactive","surface":"main-1"}
//! ```
//!
//! Frame durations are nanoseconds; missing fields are zero. `name` defaults
//! to the surface key. Unrecognized fields are rejected so a misspelled
//! duration never silently reads as zero.

use crate::classifier::{FrameVerdict, SurfaceSnapshot};
use crate::frame::FrameSample;
use crate::lifecycle::SurfaceLifecycle;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::BufRead;

/// One line of a replay stream
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEvent")]
pub enum ReplayEvent {
    /// Surface became visible
    Active {
        surface: String,
        name: Option<String>,
    },
    /// Surface went away
    Inactive { surface: String },
    /// One rendered frame
    Frame {
        surface: String,
        sample: FrameSample,
    },
}

/// Wire shape of [`ReplayEvent`]; `deny_unknown_fields` does not combine with
/// `flatten`, so leftover keys are collected and rejected on conversion
#[derive(Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum RawEvent {
    Active {
        surface: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(flatten)]
        unknown: Map<String, Value>,
    },
    Inactive {
        surface: String,
        #[serde(flatten)]
        unknown: Map<String, Value>,
    },
    Frame {
        surface: String,
        #[serde(flatten)]
        sample: FrameSample,
        #[serde(flatten)]
        unknown: Map<String, Value>,
    },
}

impl TryFrom<RawEvent> for ReplayEvent {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let (event, kind, unknown) = match raw {
            RawEvent::Active {
                surface,
                name,
                unknown,
            } => (ReplayEvent::Active { surface, name }, "active", unknown),
            RawEvent::Inactive { surface, unknown } => {
                (ReplayEvent::Inactive { surface }, "inactive", unknown)
            }
            RawEvent::Frame {
                surface,
                sample,
                unknown,
            } => (ReplayEvent::Frame { surface, sample }, "frame", unknown),
        };

        if unknown.is_empty() {
            return Ok(event);
        }
        let fields: Vec<&str> = unknown.keys().map(String::as_str).collect();
        Err(format!("unknown field(s) in {} event: {}", kind, fields.join(", ")))
    }
}

/// Parse one line; `Ok(None)` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Result<Option<ReplayEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let event = serde_json::from_str(trimmed)?;
    Ok(Some(event))
}

/// Totals gathered while replaying a stream
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplaySummary {
    /// Events applied (comments and blank lines excluded)
    pub events: u64,
    /// Frame events seen, including dropped ones
    pub frames: u64,
    /// Frame events for surfaces that were not active
    pub dropped_frames: u64,
    /// Janky frames across all surfaces
    pub janky_frames: u64,
    /// Final counters per surface instance, in deactivation order
    pub surfaces: Vec<(String, SurfaceSnapshot)>,
}

impl ReplaySummary {
    /// Per-surface summary table, strace `-c` style
    pub fn format_table(&self) -> String {
        if self.surfaces.is_empty() {
            return "No surfaces tracked.\n".to_string();
        }

        let mut out = String::new();
        out.push_str("janky%     frames     janky   dropped surface\n");
        out.push_str("------ ---------- --------- --------- ----------------\n");

        let mut all_frames = 0;
        let mut janky_frames = 0;
        let mut dropped = 0;
        for (_, snapshot) in &self.surfaces {
            all_frames += snapshot.all_frames;
            janky_frames += snapshot.janky_frames;
            dropped += snapshot.dropped_reports;
            out.push_str(&format!(
                "{:6.2} {:>10} {:>9} {:>9} {}\n",
                snapshot.janky_percent(),
                snapshot.all_frames,
                snapshot.janky_frames,
                snapshot.dropped_reports,
                snapshot.name
            ));
        }

        out.push_str("------ ---------- --------- --------- ----------------\n");
        out.push_str(&format!(
            "{:6.2} {:>10} {:>9} {:>9} total\n",
            crate::record::janky_percent(janky_frames, all_frames),
            all_frames,
            janky_frames,
            dropped
        ));
        out
    }
}

/// Apply a single event to the lifecycle adapter
pub fn apply_event(
    lifecycle: &SurfaceLifecycle,
    event: ReplayEvent,
    summary: &mut ReplaySummary,
) -> Result<()> {
    summary.events += 1;
    match event {
        ReplayEvent::Active { surface, name } => {
            let name = name.unwrap_or_else(|| surface.clone());
            lifecycle
                .surface_became_active(&surface, &name)
                .with_context(|| format!("Cannot activate surface '{}'", surface))?;
        }
        ReplayEvent::Inactive { surface } => {
            if let Some(snapshot) = lifecycle.surface_became_inactive(&surface) {
                summary.surfaces.push((surface, snapshot));
            }
        }
        ReplayEvent::Frame { surface, sample } => {
            summary.frames += 1;
            match lifecycle.frame(&surface, &sample) {
                FrameVerdict::Dropped => summary.dropped_frames += 1,
                FrameVerdict::Smooth => {}
                FrameVerdict::Janky { .. } => summary.janky_frames += 1,
            }
        }
    }
    Ok(())
}

/// Replay every event from `reader`, then deactivate surfaces still active
///
/// # Errors
/// Fails on I/O errors, on a line that is not a valid event (the error names
/// the line number), and on an activation with an empty name.
pub fn replay<R: BufRead>(lifecycle: &SurfaceLifecycle, reader: R) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let Some(event) =
            parse_line(&line).with_context(|| format!("Invalid event on line {}", line_no))?
        else {
            continue;
        };
        apply_event(lifecycle, event, &mut summary)
            .with_context(|| format!("Failed to apply event on line {}", line_no))?;
    }

    let remaining = lifecycle.deactivate_all();
    if !remaining.is_empty() {
        tracing::debug!(
            count = remaining.len(),
            "deactivating surfaces still active at end of input"
        );
    }
    summary.surfaces.extend(remaining);

    Ok(summary)
}
