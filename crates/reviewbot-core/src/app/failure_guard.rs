//! FailureGuard - 1 イテレーションの外側の境界
//!
//! Poller のエラーはすべてここで止めて、通知とタイミング判断に変換します。
//! 同じ失敗が続く間（例: トークン切れ）は通知を 1 回に抑えます。
//!
//! # 状態
//! - Steady: 直前が成功、または新しい種類の失敗
//! - Suppressed: 直前の失敗文が最後に通知した文と同じ

use std::sync::Arc;

use tracing::{error, info, warn};

use super::poller::Poller;
use crate::domain::{Messages, PollError, Watermark};
use crate::ports::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Steady,
    Suppressed,
}

/// What happened during one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// A verdict message was delivered.
    Delivered,
    /// Poll succeeded but the window was empty.
    Idle,
    /// Poll succeeded but the verdict could not be delivered.
    DeliveryFailed,
    /// Poll failed and a new failure notice was delivered.
    FailureNotified,
    /// Poll failed with the same text as the last notice; nothing sent.
    FailureSuppressed,
    /// Poll failed and the failure notice itself could not be delivered.
    FailureUndelivered,
}

impl IterationOutcome {
    /// True when the poll itself failed; the driver retries sooner.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            IterationOutcome::FailureNotified
                | IterationOutcome::FailureSuppressed
                | IterationOutcome::FailureUndelivered
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    pub watermark: Watermark,
    pub outcome: IterationOutcome,
}

pub struct FailureGuard {
    poller: Poller,
    notifier: Arc<dyn Notifier>,
    messages: Arc<Messages>,
    last_notified_failure: Option<String>,
    state: GuardState,
}

impl FailureGuard {
    pub fn new(poller: Poller, notifier: Arc<dyn Notifier>, messages: Arc<Messages>) -> Self {
        Self {
            poller,
            notifier,
            messages,
            last_notified_failure: None,
            state: GuardState::Steady,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn last_notified_failure(&self) -> Option<&str> {
        self.last_notified_failure.as_deref()
    }

    /// Runs one poll and turns every result into a side effect.
    ///
    /// Never fails. On a poll failure the given watermark is returned as is.
    pub async fn run_iteration(&mut self, watermark: Watermark) -> Iteration {
        match self.poller.poll_once(watermark).await {
            Ok(result) => {
                self.state = GuardState::Steady;
                let outcome = match result.message {
                    Some(message) => self.deliver_verdict(&message).await,
                    None => IterationOutcome::Idle,
                };
                Iteration {
                    watermark: result.watermark,
                    outcome,
                }
            }
            Err(err) => Iteration {
                watermark,
                outcome: self.handle_failure(&err).await,
            },
        }
    }

    async fn deliver_verdict(&self, message: &str) -> IterationOutcome {
        match self.notifier.deliver(message).await {
            Ok(()) => {
                info!(text = message, "verdict delivered");
                IterationOutcome::Delivered
            }
            Err(e) => {
                warn!(error = %e, "failed to deliver verdict");
                IterationOutcome::DeliveryFailed
            }
        }
    }

    async fn handle_failure(&mut self, err: &PollError) -> IterationOutcome {
        let kind = err.kind();
        error!(kind = %kind, transient = kind.is_transient(), error = %err, "poll failed");

        let notice = self.messages.failure_notice(err);
        if self.last_notified_failure.as_deref() == Some(notice.as_str()) {
            self.state = GuardState::Suppressed;
            warn!(kind = %kind, "same failure as last notice, not re-sending");
            return IterationOutcome::FailureSuppressed;
        }

        self.state = GuardState::Steady;
        match self.notifier.deliver(&notice).await {
            Ok(()) => {
                self.last_notified_failure = Some(notice);
                IterationOutcome::FailureNotified
            }
            Err(e) => {
                warn!(error = %e, "failed to deliver failure notice");
                IterationOutcome::FailureUndelivered
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusTranslator;
    use crate::impls::{RecordingNotifier, ScriptedFetcher};
    use serde_json::json;

    fn guard(fetcher: Arc<ScriptedFetcher>, notifier: Arc<RecordingNotifier>) -> FailureGuard {
        let messages = Arc::new(Messages::default());
        let poller = Poller::new(
            fetcher,
            "https://example.test/",
            "secret",
            StatusTranslator::new(messages.clone()),
        );
        FailureGuard::new(poller, notifier, messages)
    }

    #[tokio::test]
    async fn verdict_is_delivered_and_watermark_advances() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        fetcher.push_json(json!({
            "homeworks": [{"homework_name": "t", "status": "reviewing"}],
            "current_date": 1000
        }));

        let mut guard = guard(fetcher, notifier.clone());
        let it = guard.run_iteration(Watermark::new(1)).await;

        assert_eq!(it.outcome, IterationOutcome::Delivered);
        assert_eq!(it.watermark, Watermark::new(1000));
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Работа взята на проверку"));
    }

    #[tokio::test]
    async fn empty_window_sends_nothing() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        fetcher.push_json(json!({"homeworks": [], "current_date": 20}));

        let mut guard = guard(fetcher, notifier.clone());
        let it = guard.run_iteration(Watermark::new(10)).await;

        assert_eq!(it.outcome, IterationOutcome::Idle);
        assert_eq!(it.watermark, Watermark::new(20));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_does_not_hold_back_watermark() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        notifier.fail_next(1);
        fetcher.push_json(json!({
            "homeworks": [{"homework_name": "t", "status": "approved"}],
            "current_date": 1000
        }));

        let mut guard = guard(fetcher, notifier.clone());
        let it = guard.run_iteration(Watermark::new(1)).await;

        assert_eq!(it.outcome, IterationOutcome::DeliveryFailed);
        assert!(!it.outcome.is_failure());
        assert_eq!(it.watermark, Watermark::new(1000));
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn identical_failures_notify_once() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        fetcher.push_json(json!({"error": "bad token"}));
        fetcher.push_json(json!({"error": "bad token"}));

        let mut guard = guard(fetcher, notifier.clone());
        let first = guard.run_iteration(Watermark::new(3)).await;
        assert_eq!(first.outcome, IterationOutcome::FailureNotified);
        assert_eq!(guard.state(), GuardState::Steady);

        let second = guard.run_iteration(first.watermark).await;
        assert_eq!(second.outcome, IterationOutcome::FailureSuppressed);
        assert_eq!(guard.state(), GuardState::Suppressed);

        assert_eq!(second.watermark, Watermark::new(3));
        assert_eq!(notifier.sent().len(), 1);
        assert!(notifier.sent()[0].contains("bad token"));
    }

    #[tokio::test]
    async fn remote_and_unknown_status_notices_are_localized() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        fetcher.push_json(json!({"code": "not_authenticated"}));
        fetcher.push_json(json!({
            "homeworks": [{"homework_name": "t", "status": "on_hold"}]
        }));

        let mut guard = guard(fetcher, notifier.clone());
        guard.run_iteration(Watermark::new(3)).await;
        guard.run_iteration(Watermark::new(3)).await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            "Бот столкнулся с ошибкой: Неожиданный ответ от сервера: \
             code=not_authenticated (GET https://example.test/?from_date=3)"
        );
        assert_eq!(
            sent[1],
            "Бот столкнулся с ошибкой: Неизвестный статус:\n\non_hold"
        );
        assert_eq!(guard.last_notified_failure(), Some(sent[1].as_str()));
    }

    #[tokio::test]
    async fn different_failures_notify_each() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        fetcher.push_json(json!({"error": "bad token"}));
        fetcher.push_transport_failure("connection refused");

        let mut guard = guard(fetcher, notifier.clone());
        guard.run_iteration(Watermark::new(3)).await;
        let second = guard.run_iteration(Watermark::new(3)).await;

        assert_eq!(second.outcome, IterationOutcome::FailureNotified);
        assert_eq!(guard.state(), GuardState::Steady);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].contains("connection refused"));
    }

    #[tokio::test]
    async fn success_between_identical_failures_keeps_suppression() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        fetcher.push_json(json!({"error": "bad token"}));
        fetcher.push_json(json!({"homeworks": []}));
        fetcher.push_json(json!({"error": "bad token"}));

        let mut guard = guard(fetcher, notifier.clone());
        guard.run_iteration(Watermark::new(3)).await;
        let ok = guard.run_iteration(Watermark::new(3)).await;
        assert_eq!(ok.outcome, IterationOutcome::Idle);
        assert_eq!(guard.state(), GuardState::Steady);

        let again = guard.run_iteration(Watermark::new(3)).await;
        assert_eq!(again.outcome, IterationOutcome::FailureSuppressed);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn undelivered_failure_notice_is_retried() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        notifier.fail_next(1);
        fetcher.push_json(json!({"code": "expired"}));
        fetcher.push_json(json!({"code": "expired"}));

        let mut guard = guard(fetcher, notifier.clone());
        let first = guard.run_iteration(Watermark::new(3)).await;
        assert_eq!(first.outcome, IterationOutcome::FailureUndelivered);
        assert!(first.outcome.is_failure());
        assert_eq!(guard.last_notified_failure(), None);

        let second = guard.run_iteration(Watermark::new(3)).await;
        assert_eq!(second.outcome, IterationOutcome::FailureNotified);
        assert_eq!(notifier.sent().len(), 1);
    }
}
