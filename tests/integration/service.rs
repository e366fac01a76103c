use std::time::Duration;

use respiration_monitor::prelude::*;
use respiration_monitor::service::RateStatus;

use crate::common::{ScriptedSource, TestSignalBuilder};

fn breathing_service(period: f64) -> MonitorService {
    let signal = TestSignalBuilder::new().period(period).noise(0.05);
    let source = ScriptedSource::from_values(signal.generator());
    MonitorService::new(MonitorConfig::default(), Box::new(source), None).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_service_reports_rate_after_stop() {
    let service = breathing_service(7.5);
    assert!(service.start().await.success);

    tokio::time::sleep(Duration::from_millis(30_100)).await;
    let live = service.snapshot();
    assert!(live.monitoring);
    assert_eq!(live.status, RateStatus::Pending);
    assert_eq!(live.rate, None);
    assert_eq!(live.count, 151);

    tokio::time::sleep(Duration::from_secs(30)).await;
    let stopped = service.stop().await;
    assert!(stopped.success);
    let rate = stopped.respiration_rate.unwrap();
    assert!((rate - 8.0).abs() <= 1.2, "{rate}");

    let done = service.snapshot();
    assert_eq!(done.status, RateStatus::Rate);
    assert_eq!(done.rate, Some(rate));
    assert_eq!(done.count, 301);
}

#[tokio::test(start_paused = true)]
async fn test_polling_does_not_wait_for_stop() {
    let service = breathing_service(6.0);
    service.start().await;
    tokio::time::sleep(Duration::from_millis(5_100)).await;

    // Poll while a stop is holding the session lock
    let (stopped, polled) = futures::join!(service.stop(), async {
        tokio::task::yield_now().await;
        service.snapshot()
    });
    assert!(stopped.success);
    assert_eq!(polled.count, 26);
    assert_eq!(stopped.result.map(|r| r.label()), Some("insufficient_data"));
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_source_reports_failure() {
    let service = MonitorService::new(MonitorConfig::default(), Box::new(ScriptedSource::unavailable()), None).unwrap();
    assert!(!service.start().await.success);
    assert!(!service.stop().await.success);

    let data = service.data();
    assert!(!data.monitoring);
    assert_eq!(data.count, 0);
    assert!(data.values.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_trait_object_boundary() {
    let monitor: Box<dyn RespirationMonitoring> = Box::new(breathing_service(6.0));
    assert!(monitor.start().await.success);
    tokio::time::sleep(Duration::from_millis(1_010)).await;

    let data = monitor.data().await;
    assert_eq!(data.count, 6);
    assert_eq!(data.timestamps.len(), data.values.len());
    assert_eq!(data.stats.samples, 6);

    let stopped = monitor.stop().await;
    assert!(stopped.success);
    assert_eq!(stopped.respiration_rate, None);
    assert_eq!(monitor.snapshot().await.status, RateStatus::InsufficientData);
}
