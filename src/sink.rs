//! Destinations for diagnostic records
//!
//! The classifier hands every dispatched record to a [`DiagnosticSink`].
//! [`TracingSink`] is the default and mirrors a platform log call tagged
//! `FrameMetrics`.

use crate::record::{DiagnosticRecord, Severity};
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;

/// Receives records for janky frames
///
/// Called from whichever thread delivers frames, so implementations must be
/// thread-safe. Dispatch never fails from the classifier's point of view.
pub trait DiagnosticSink: Send + Sync {
    fn dispatch(&self, severity: Severity, record: &DiagnosticRecord);
}

/// Logs records through `tracing` with target `FrameMetrics`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn dispatch(&self, severity: Severity, record: &DiagnosticRecord) {
        // `target:` must be a literal, pinned to LOG_TAG by the tests below
        match severity {
            Severity::Warning => tracing::warn!(target: "FrameMetrics", "{}", record),
            Severity::Error => tracing::error!(target: "FrameMetrics", "{}", record),
        }
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    severity: Severity,
    #[serde(flatten)]
    record: &'a DiagnosticRecord,
}

/// Writes one JSON object per record to any writer
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> DiagnosticSink for JsonLinesSink<W> {
    fn dispatch(&self, severity: Severity, record: &DiagnosticRecord) {
        let line = JsonLine { severity, record };
        let mut writer = self.writer.lock();
        let result = serde_json::to_writer(&mut *writer, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to write diagnostic for {}: {}", record.surface, e);
        }
    }
}

/// Keeps every dispatched record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Severity, DiagnosticRecord)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything dispatched so far, in dispatch order
    pub fn records(&self) -> Vec<(Severity, DiagnosticRecord)> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn dispatch(&self, severity: Severity, record: &DiagnosticRecord) {
        self.records.lock().push((severity, record.clone()));
    }
}
