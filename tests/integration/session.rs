use std::time::Duration;

use respiration_monitor::error::AcquisitionError;
use respiration_monitor::prelude::*;
use respiration_monitor::source::{BrightnessExtractor, ExtractingSource};

use crate::common::{ScriptedSource, SyntheticCamera, TestSignalBuilder};

async fn run_for(secs: f64) {
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}

#[tokio::test(start_paused = true)]
async fn test_full_session_yields_rate() {
    let signal = TestSignalBuilder::new().period(6.0).noise(0.05).seed(21);
    let source = ScriptedSource::from_values(signal.generator());
    let counters = source.counters();

    let mut session = Session::new(MonitorConfig::default(), Box::new(source), None).unwrap();
    session.start().await.unwrap();
    run_for(60.1).await;

    let result = session.stop().await.unwrap();
    let bpm = result.bpm().unwrap_or_else(|| panic!("{result:?}"));
    assert!((bpm - 10.0).abs() <= 1.5, "{bpm}");

    assert_eq!(counters.acquired(), 1);
    assert_eq!(counters.released(), 1);
    assert_eq!(counters.reads(), 301);
    assert_eq!(session.query_handle().sample_count(), 301);
}

#[tokio::test(start_paused = true)]
async fn test_buffer_keeps_most_recent_samples() {
    let config = MonitorConfig::from_json_str(r#"{ "acquisition": { "max_points": 50 } }"#).unwrap();
    let source = ScriptedSource::from_values(|n| n as f64);
    let mut session = Session::new(config, Box::new(source), None).unwrap();
    let query = session.query_handle();

    session.start().await.unwrap();
    run_for(20.1).await;
    let series = query.series();
    session.stop().await.unwrap();

    // 101 samples taken, the oldest 51 evicted
    assert_eq!(series.len(), 50);
    let values = series.values();
    assert_eq!(values.first(), Some(&51.0));
    assert_eq!(values.last(), Some(&100.0));
    assert!(series.samples().windows(2).all(|w| w[0].t < w[1].t));
}

#[tokio::test(start_paused = true)]
async fn test_double_start_and_idle_stop() {
    let source = ScriptedSource::from_values(|_| 1.0);
    let counters = source.counters();
    let mut session = Session::new(MonitorConfig::default(), Box::new(source), None).unwrap();

    assert!(matches!(session.stop().await, Err(Error::NotMonitoring)));
    assert_eq!(counters.released(), 0);

    session.start().await.unwrap();
    run_for(1.0).await;
    assert!(matches!(session.start().await, Err(Error::AlreadyMonitoring)));
    assert_eq!(counters.acquired(), 1);
    assert_eq!(session.state(), SessionState::Monitoring);

    session.stop().await.unwrap();
    assert!(matches!(session.stop().await, Err(Error::NotMonitoring)));

    // Releasing again after stop is a no-op
    session.release().await.unwrap();
    session.release().await.unwrap();
    assert_eq!(counters.released(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_source_fails_start() {
    let mut session = Session::new(MonitorConfig::default(), Box::new(ScriptedSource::unavailable()), None).unwrap();
    assert!(matches!(session.start().await, Err(Error::SourceUnavailable(_))));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.query_handle().session_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_read_failures_are_retried_and_counted() {
    // Every read between 10 and 15 fails: two backoffs' worth of failures
    let source = ScriptedSource::new(|n| {
        if (10..16).contains(&n) {
            Err(AcquisitionError::FrameUnavailable)
        } else {
            Ok(n as f64)
        }
    });
    let mut session = Session::new(MonitorConfig::default(), Box::new(source), None).unwrap();
    let query = session.query_handle();

    session.start().await.unwrap();
    run_for(10.0).await;
    session.stop().await.unwrap();

    let stats = query.stats();
    assert_eq!(stats.read_failures, 6);
    assert_eq!(stats.backoffs, 2);
    assert_eq!(stats.samples as usize, query.sample_count());
    assert!(query.series().values().contains(&16.0));
}

#[tokio::test(start_paused = true)]
async fn test_brightness_camera_end_to_end() {
    // 5 s cycle at 5 Hz is 25 frames per breath
    let camera = SyntheticCamera::new(25.0);
    let source = ExtractingSource::new(camera, BrightnessExtractor::new());
    let mut session = Session::new(MonitorConfig::brightness(), Box::new(source), None).unwrap();

    session.start().await.unwrap();
    run_for(60.1).await;
    let bpm = session.stop().await.unwrap().bpm().unwrap();
    assert!((bpm - 12.0).abs() <= 1.8, "{bpm}");
}
