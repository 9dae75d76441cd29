//! End-to-end scenarios through `AppBuilder` with in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use reviewbot_core::app::{GuardState, IterationOutcome};
use reviewbot_core::domain::{Messages, Watermark};
use reviewbot_core::impls::{RecordingNotifier, ScriptedFetcher};
use reviewbot_core::ports::FixedClock;
use reviewbot_core::{AppBuilder, Driver};
use serde_json::json;

const START: i64 = 1_700_000_000;

fn driver(fetcher: &Arc<ScriptedFetcher>, notifier: &Arc<RecordingNotifier>) -> Driver {
    let now = Utc.timestamp_opt(START, 0).unwrap();
    AppBuilder::new("https://example.test/api/user_api/homework_statuses/", "token")
        .fetcher(fetcher.clone())
        .notifier(notifier.clone())
        .clock(Arc::new(FixedClock::new(now)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn approved_submission_is_announced() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let notifier = Arc::new(RecordingNotifier::new());
    fetcher.push_json(json!({
        "homeworks": [{"homework_name": "t", "status": "approved"}],
        "current_date": 1000
    }));

    let mut driver = driver(&fetcher, &notifier);
    assert_eq!(driver.watermark(), Watermark::new(START));

    let step = driver.step().await;
    assert_eq!(step.iteration.outcome, IterationOutcome::Delivered);
    assert_eq!(driver.watermark(), Watermark::new(1000));
    assert_eq!(step.delay, Duration::from_secs(300));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("t"));
    assert!(sent[0].contains(&Messages::default().approved));
}

#[tokio::test]
async fn remote_error_is_reported_once_and_retried_fast() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let notifier = Arc::new(RecordingNotifier::new());
    fetcher.push_json(json!({"error": "bad token"}));

    let mut driver = driver(&fetcher, &notifier);
    let step = driver.step().await;

    assert_eq!(step.iteration.outcome, IterationOutcome::FailureNotified);
    assert_eq!(driver.watermark(), Watermark::new(START));
    assert_eq!(step.delay, Duration::from_secs(5));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("bad token"));
}

#[tokio::test]
async fn transport_timeout_is_reported() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let notifier = Arc::new(RecordingNotifier::new());
    fetcher.push_transport_failure("request timed out");

    let mut driver = driver(&fetcher, &notifier);
    let step = driver.step().await;

    assert_eq!(step.iteration.outcome, IterationOutcome::FailureNotified);
    assert_eq!(driver.watermark(), Watermark::new(START));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("transport failure"));
    assert!(sent[0].contains("request timed out"));
}

#[tokio::test(start_paused = true)]
async fn persistent_failure_is_suppressed_until_it_changes() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let notifier = Arc::new(RecordingNotifier::new());
    for _ in 0..3 {
        fetcher.push_json(json!({"code": "not_authenticated"}));
    }
    fetcher.push_json(json!({
        "homeworks": [{"homework_name": "t", "status": "brand_new_status"}]
    }));
    fetcher.push_json(json!({"homeworks": [], "current_date": START + 10}));

    let mut driver = driver(&fetcher, &notifier);
    let steps = driver.run_for(5).await;

    let outcomes: Vec<IterationOutcome> = steps.iter().map(|s| s.iteration.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            IterationOutcome::FailureNotified,
            IterationOutcome::FailureSuppressed,
            IterationOutcome::FailureSuppressed,
            IterationOutcome::FailureNotified,
            IterationOutcome::Idle,
        ]
    );
    assert_eq!(driver.guard().state(), GuardState::Steady);
    assert_eq!(driver.watermark(), Watermark::new(START + 10));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("Неожиданный ответ от сервера: code=not_authenticated"));
    assert!(sent[1].ends_with("Неизвестный статус:\n\nbrand_new_status"));
    assert_eq!(fetcher.remaining(), 0);
}
