//! Classifier behaviour across surfaces and threads

use framejank::classifier::{FrameVerdict, JankClassifier};
use framejank::config::{SeverityPolicy, ThresholdConfig};
use framejank::frame::FrameSample;
use framejank::record::Severity;
use framejank::sink::MemorySink;
use std::sync::Arc;
use std::thread;

const MS: u64 = 1_000_000;

fn classifier(config: ThresholdConfig) -> (Arc<JankClassifier>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let classifier = Arc::new(JankClassifier::with_sink(config, sink.clone()).unwrap());
    (classifier, sink)
}

#[test]
fn test_unit_conversion_boundary() {
    let (classifier, sink) = classifier(ThresholdConfig::default());
    let handle = classifier.attach("MainActivity").unwrap();

    assert_eq!(
        classifier.on_frame(handle, &FrameSample::with_total(17_000_000)),
        FrameVerdict::Smooth
    );
    assert_eq!(
        classifier.on_frame(handle, &FrameSample::with_total(18_000_000)),
        FrameVerdict::Janky {
            severity: Some(Severity::Warning)
        }
    );
    assert_eq!(sink.records()[0].1.breakdown.total_ms, 18.0);
}

#[test]
fn test_record_carries_full_breakdown() {
    let (classifier, sink) = classifier(ThresholdConfig::default());
    let handle = classifier.attach("MainActivity").unwrap();

    let sample = FrameSample {
        total: 20 * MS,
        input: MS,
        animation: MS,
        layout: 5 * MS,
        draw: 3 * MS,
        sync: 2 * MS,
        gpu_command: 4 * MS,
        swap_buffers: MS,
        dropped_since_last: 0,
    };
    classifier.on_frame(handle, &sample);

    let (_, record) = sink.records().remove(0);
    assert_eq!(record.breakdown.other_ms, 8.0);
    assert_eq!(record.breakdown.sync_ms, 2.0);

    let text = record.to_string();
    assert!(
        text.starts_with("Janky frame detected on MainActivity with total duration: 20.00ms\n")
    );
    assert!(text.contains("Layout/measure: 5.00ms  draw:3.00ms  sync :2.00ms  gpuCommand:4.00ms"));
    assert!(text.ends_with("Janky frames: 1/1(100.00%)"));
}

#[test]
fn test_legacy_policy_end_to_end() {
    let config = ThresholdConfig {
        show_warnings: false,
        severity_policy: SeverityPolicy::Legacy,
        ..ThresholdConfig::default()
    };
    let (classifier, sink) = classifier(config);
    let handle = classifier.attach("MainActivity").unwrap();

    // Past the error level, but show_warnings=false disables the error branch
    classifier.on_frame(handle, &FrameSample::with_total(50 * MS));
    assert_eq!(sink.records()[0].0, Severity::Warning);
}

#[test]
fn test_concurrent_surfaces_are_isolated() {
    let (classifier, sink) = classifier(ThresholdConfig::default());
    let surfaces: Vec<_> = (0..8)
        .map(|i| classifier.attach(&format!("Activity{}", i)).unwrap())
        .collect();

    thread::scope(|scope| {
        for (i, &handle) in surfaces.iter().enumerate() {
            let classifier = &classifier;
            scope.spawn(move || {
                for frame in 0..1_000u64 {
                    // Surface i has i+1 janky frames in every 10
                    let total = if frame % 10 <= i as u64 { 40 * MS } else { 5 * MS };
                    classifier.on_frame(handle, &FrameSample::with_total(total));
                }
            });
        }
    });

    let mut expected_records = 0;
    for (i, &handle) in surfaces.iter().enumerate() {
        let snapshot = classifier.snapshot(handle).unwrap();
        let expected_janky = 100 * (i as u64 + 1);
        assert_eq!(snapshot.all_frames, 1_000);
        assert_eq!(snapshot.janky_frames, expected_janky);
        assert_eq!(snapshot.name, format!("Activity{}", i));
        expected_records += expected_janky as usize;
    }
    assert_eq!(sink.len(), expected_records);
}

#[test]
fn test_attach_detach_while_frames_flow() {
    let (classifier, _) = classifier(ThresholdConfig::default());
    let steady = classifier.attach("Steady").unwrap();

    thread::scope(|scope| {
        let frames = Arc::clone(&classifier);
        scope.spawn(move || {
            for _ in 0..2_000 {
                frames.on_frame(steady, &FrameSample::with_total(20 * MS));
            }
        });

        let churn = Arc::clone(&classifier);
        scope.spawn(move || {
            for _ in 0..200 {
                let handle = churn.attach("Transient").unwrap();
                churn.on_frame(handle, &FrameSample::with_total(MS));
                let snapshot = churn.detach(handle).unwrap();
                assert_eq!(snapshot.all_frames, 1);
            }
        });
    });

    let snapshot = classifier.detach(steady).unwrap();
    assert_eq!(snapshot.all_frames, 2_000);
    assert_eq!(snapshot.janky_frames, 2_000);
    assert_eq!(classifier.tracked_count(), 0);
}

#[test]
fn test_classifier_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<JankClassifier>();
    assert_send_sync::<framejank::lifecycle::SurfaceLifecycle>();
}
