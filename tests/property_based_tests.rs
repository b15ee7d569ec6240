//! Property-based tests for classifier invariants

use framejank::classifier::{FrameVerdict, JankClassifier};
use framejank::config::{SeverityPolicy, ThresholdConfig};
use framejank::frame::FrameSample;
use framejank::sink::MemorySink;
use proptest::prelude::*;
use std::sync::Arc;

fn arb_sample() -> impl Strategy<Value = FrameSample> {
    (
        0u64..100_000_000,
        0u64..20_000_000,
        0u64..20_000_000,
        0u64..20_000_000,
        0u64..20_000_000,
    )
        .prop_map(|(total, layout, draw, gpu_command, sync)| FrameSample {
            total,
            layout,
            draw,
            gpu_command,
            sync,
            ..FrameSample::default()
        })
}

fn arb_config() -> impl Strategy<Value = ThresholdConfig> {
    (
        0.0f64..50.0,
        0.0f64..80.0,
        any::<bool>(),
        any::<bool>(),
        prop_oneof![Just(SeverityPolicy::TwoTier), Just(SeverityPolicy::Legacy)],
    )
        .prop_map(
            |(warning_level_ms, error_level_ms, show_warnings, show_errors, severity_policy)| {
                ThresholdConfig {
                    warning_level_ms,
                    error_level_ms,
                    show_warnings,
                    show_errors,
                    severity_policy,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_janky_never_exceeds_all(
        config in arb_config(),
        samples in prop::collection::vec(arb_sample(), 0..200),
    ) {
        let sink = Arc::new(MemorySink::new());
        let classifier = JankClassifier::with_sink(config, sink.clone()).unwrap();
        let handle = classifier.attach("PropActivity").unwrap();

        for sample in &samples {
            classifier.on_frame(handle, sample);
            let snapshot = classifier.snapshot(handle).unwrap();
            prop_assert!(snapshot.janky_frames <= snapshot.all_frames);
        }

        let snapshot = classifier.snapshot(handle).unwrap();
        prop_assert_eq!(snapshot.all_frames, samples.len() as u64);
        prop_assert!(sink.len() as u64 <= snapshot.janky_frames);
    }

    #[test]
    fn prop_janky_iff_above_warning(config in arb_config(), sample in arb_sample()) {
        let warning = config.warning_level_ms;
        let classifier = JankClassifier::with_sink(config, Arc::new(MemorySink::new())).unwrap();
        let handle = classifier.attach("PropActivity").unwrap();

        let verdict = classifier.on_frame(handle, &sample);
        prop_assert_eq!(verdict.is_janky(), sample.total_ms() > warning);
    }

    #[test]
    fn prop_silent_config_never_dispatches(
        samples in prop::collection::vec(arb_sample(), 1..50),
        policy in prop_oneof![Just(SeverityPolicy::TwoTier), Just(SeverityPolicy::Legacy)],
    ) {
        let config = ThresholdConfig {
            warning_level_ms: 0.0,
            show_warnings: false,
            show_errors: false,
            severity_policy: policy,
            ..ThresholdConfig::default()
        };
        let sink = Arc::new(MemorySink::new());
        let classifier = JankClassifier::with_sink(config, sink.clone()).unwrap();
        let handle = classifier.attach("PropActivity").unwrap();

        for sample in &samples {
            let verdict = classifier.on_frame(handle, sample);
            let has_severity = matches!(verdict, FrameVerdict::Janky { severity: Some(_) });
            prop_assert!(!has_severity);
        }
        prop_assert!(sink.is_empty());
    }

    #[test]
    fn prop_residual_is_unclamped(sample in arb_sample()) {
        let b = sample.breakdown();
        let expected = b.total_ms - b.layout_ms - b.draw_ms - b.gpu_command_ms;
        prop_assert_eq!(b.other_ms, expected);
    }

    #[test]
    fn prop_detached_surface_drops_everything(
        samples in prop::collection::vec(arb_sample(), 1..20),
    ) {
        let sink = Arc::new(MemorySink::new());
        let classifier =
            JankClassifier::with_sink(ThresholdConfig::report_all(), sink.clone()).unwrap();
        let handle = classifier.attach("PropActivity").unwrap();
        classifier.detach(handle);

        for sample in &samples {
            prop_assert_eq!(classifier.on_frame(handle, sample), FrameVerdict::Dropped);
        }
        prop_assert!(sink.is_empty());
        prop_assert!(classifier.snapshot(handle).is_none());
    }
}
