//! Host lifecycle adapter
//!
//! Maps a host's "surface became active / inactive" events onto
//! [`JankClassifier::attach`] and [`JankClassifier::detach`]. Hosts identify
//! surfaces by their own instance keys (window tokens, activity ids); the
//! adapter owns the key to handle mapping so the classifier never sees them.

use crate::classifier::{
    ClassifierError, FrameVerdict, JankClassifier, SurfaceHandle, SurfaceSnapshot,
};
use crate::frame::FrameSample;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Lifecycle glue between a host and a shared [`JankClassifier`]
#[derive(Debug)]
pub struct SurfaceLifecycle {
    classifier: Arc<JankClassifier>,
    active: RwLock<HashMap<String, SurfaceHandle>>,
}

impl SurfaceLifecycle {
    pub fn new(classifier: Arc<JankClassifier>) -> Self {
        Self {
            classifier,
            active: RwLock::new(HashMap::new()),
        }
    }

    pub fn classifier(&self) -> &Arc<JankClassifier> {
        &self.classifier
    }

    /// Surface became visible; start tracking it under `instance_key`
    ///
    /// Re-activating a key that is still active restarts its counters.
    pub fn surface_became_active(
        &self,
        instance_key: &str,
        name: &str,
    ) -> Result<SurfaceHandle, ClassifierError> {
        let handle = self.classifier.attach(name)?;
        let previous = self.active.write().insert(instance_key.to_string(), handle);
        if let Some(previous) = previous {
            tracing::debug!(instance_key, "re-activated, counters reset");
            self.classifier.detach(previous);
        }
        Ok(handle)
    }

    /// Surface went away; returns its final counters if it was active
    pub fn surface_became_inactive(&self, instance_key: &str) -> Option<SurfaceSnapshot> {
        let handle = self.active.write().remove(instance_key)?;
        self.classifier.detach(handle)
    }

    /// Route a frame sample to the surface registered under `instance_key`
    pub fn frame(&self, instance_key: &str, sample: &FrameSample) -> FrameVerdict {
        let handle = self.active.read().get(instance_key).copied();
        match handle {
            Some(handle) => self.classifier.on_frame(handle, sample),
            None => FrameVerdict::Dropped,
        }
    }

    /// Counters of an active surface
    pub fn snapshot(&self, instance_key: &str) -> Option<SurfaceSnapshot> {
        let handle = self.active.read().get(instance_key).copied()?;
        self.classifier.snapshot(handle)
    }

    /// Instance keys currently active, sorted
    pub fn active_surfaces(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.active.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Deactivate everything, returning final counters keyed by instance
    pub fn deactivate_all(&self) -> Vec<(String, SurfaceSnapshot)> {
        let drained: Vec<(String, SurfaceHandle)> = self.active.write().drain().collect();
        let mut snapshots: Vec<(String, SurfaceSnapshot)> = drained
            .into_iter()
            .filter_map(|(key, handle)| self.classifier.detach(handle).map(|s| (key, s)))
            .collect();
        snapshots.sort_by(|a, b| a.0.cmp(&b.0));
        snapshots
    }
}
