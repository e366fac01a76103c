use std::time::Duration;

use respiration_monitor::prelude::*;
use respiration_monitor::source::{read_sample_log, CsvSampleLog};

use crate::common::{ScriptedSource, SharedLog, TestSignalBuilder};

#[tokio::test(start_paused = true)]
async fn test_logged_session_replays_to_same_verdict() {
    let log = SharedLog::new();
    let signal = TestSignalBuilder::new().period(6.5).noise(0.05).seed(99);
    let source = ScriptedSource::from_values(signal.generator());
    let sink: Box<dyn SampleSink> = Box::new(CsvSampleLog::new(log.clone()));

    let mut session = Session::new(MonitorConfig::default(), Box::new(source), Some(sink)).unwrap();
    session.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(60_100)).await;
    let live = session.stop().await.unwrap();
    assert_eq!(log.lines(), 301);

    let replayed = read_sample_log(log.contents().as_slice()).unwrap();
    assert_eq!(replayed.len(), 301);
    let offline = estimate(&replayed, &session.config().estimator);

    let (live, offline) = (live.bpm().unwrap(), offline.bpm().unwrap());
    assert!((live - offline).abs() < 0.1, "{live} vs {offline}");
}

#[tokio::test(start_paused = true)]
async fn test_sink_survives_across_sessions() {
    let log = SharedLog::new();
    let sink: Box<dyn SampleSink> = Box::new(CsvSampleLog::new(log.clone()));
    let source = ScriptedSource::from_values(|n| n as f64);
    let mut session = Session::new(MonitorConfig::default(), Box::new(source), Some(sink)).unwrap();

    for _ in 0..2 {
        session.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(410)).await;
        session.stop().await.unwrap();
    }

    // Three samples per session, timestamps restart at zero
    let series = read_sample_log(log.contents().as_slice()).unwrap();
    assert_eq!(series.timestamps(), vec![0.0, 0.2, 0.4, 0.0, 0.2, 0.4]);
    assert_eq!(series.values(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
}
