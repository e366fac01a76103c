use respiration_monitor::prelude::*;
use respiration_monitor::{IndeterminateReason, InsufficientReason};

use crate::common::TestSignalBuilder;

#[test]
fn test_short_series_is_insufficient() {
    for duration in [0.0, 1.0, 3.8] {
        let series = TestSignalBuilder::new().duration(duration).build();
        assert!(series.len() < 20);
        let result = estimate(&series, &EstimatorConfig::default());
        assert!(
            matches!(
                result,
                EstimationResult::InsufficientData { reason: InsufficientReason::TooFewSamples { .. } }
            ),
            "{result:?}"
        );
    }
}

#[test]
fn test_flat_series_is_insufficient_at_any_length() {
    for duration in [5.0, 60.0, 200.0] {
        let series = TestSignalBuilder::new().amplitude(0.0).duration(duration).build();
        let config = EstimatorConfig { warmup_secs: 0.0, ..EstimatorConfig::default() };
        assert_eq!(estimate(&series, &config).label(), "insufficient_data");
    }
}

#[test]
fn test_breathing_periods_within_fifteen_percent() {
    for (period, seed) in [(6.0, 1), (6.5, 2), (7.0, 3), (7.5, 4), (8.0, 5)] {
        let series = TestSignalBuilder::new()
            .period(period)
            .amplitude(2.0)
            .noise(0.1)
            .seed(seed)
            .build();
        let expected = 60.0 / period;
        match estimate(&series, &EstimatorConfig::default()) {
            EstimationResult::Rate { bpm } => {
                assert!((bpm - expected).abs() <= 0.15 * expected, "period {period}: {bpm}")
            },
            other => panic!("period {period}: {other:?}"),
        }
    }
}

#[test]
fn test_faster_breathing_is_tracked() {
    // 3.5 s cycle, 10 Hz, longer session
    let series = TestSignalBuilder::new()
        .sample_rate(10.0)
        .duration(90.0)
        .period(3.5)
        .noise(0.03)
        .build();
    let analysis = analyze(&series, &EstimatorConfig::default());
    let bpm = analysis.result.bpm().unwrap();
    assert!((bpm - 60.0 / 3.5).abs() < 1.0, "{bpm}");
    assert_eq!(analysis.sample_rate_hz.map(f64::round), Some(10.0));
}

#[test]
fn test_four_cycles_are_not_enough() {
    // Warm-up leaves 20 s..46 s: peaks at 25.5, 31.5, 37.5 and 43.5
    let series = TestSignalBuilder::new().duration(46.0).build();
    let config = EstimatorConfig { min_analysis_secs: 20.0, ..EstimatorConfig::default() };
    let analysis = analyze(&series, &config);
    assert_eq!(analysis.retained_samples, 130);
    assert_eq!(analysis.peak_indices.len(), 4);
    assert!(matches!(
        analysis.result,
        EstimationResult::Indeterminate { reason: IndeterminateReason::TooFewPeaks { peaks: 4, .. } }
    ));
}

#[test]
fn test_verdicts_are_never_numeric_zero() {
    let short = TestSignalBuilder::new().duration(2.0).build();
    let result = estimate(&short, &EstimatorConfig::default());
    assert_eq!(result.bpm(), None);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("bpm").is_none());
}
