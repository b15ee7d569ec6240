#![no_main]

use framejank::classifier::JankClassifier;
use framejank::config::ThresholdConfig;
use framejank::lifecycle::SurfaceLifecycle;
use framejank::replay;
use framejank::sink::MemorySink;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    // Arbitrary event streams must never panic, only fail to parse
    let sink = Arc::new(MemorySink::new());
    let Ok(classifier) = JankClassifier::with_sink(ThresholdConfig::report_all(), sink) else {
        return;
    };
    let lifecycle = SurfaceLifecycle::new(Arc::new(classifier));
    if let Ok(summary) = replay::replay(&lifecycle, data) {
        for (_, snapshot) in &summary.surfaces {
            assert!(snapshot.janky_frames <= snapshot.all_frames);
        }
    }
});
