//! インメモリ実装 - テスト・開発用の fetcher と notifier
//!
//! # 学習ポイント
//! - Mutex による内部可変性（`&self` の async trait から書き換える）
//! - ロックは await を跨がない
//!
//! ネットワークなしで FailureGuard / Driver のシナリオを再現できます。

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{DeliveryError, TransportError};
use crate::ports::{FetchRequest, FetchResponse, Notifier, StatusFetcher};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// ScriptedFetcher は事前に積んだレスポンスを順に返す
///
/// # 使用例
/// ```ignore
/// let fetcher = ScriptedFetcher::new();
/// fetcher.push_json(json!({"homeworks": [], "current_date": 1000}));
/// fetcher.push_transport_failure("connection timed out");
/// ```
///
/// スクリプトが尽きたら TransportError を返します。
#[derive(Default)]
pub struct ScriptedFetcher {
    /// `Err` は TransportError の cause
    script: Mutex<VecDeque<Result<FetchResponse, String>>>,
    /// 受け取ったリクエストの記録
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Result<FetchResponse, String>) {
        lock(&self.script).push_back(reply);
    }

    pub fn push_json(&self, body: serde_json::Value) {
        self.push(Ok(FetchResponse::json(&body)));
    }

    pub fn push_transport_failure(&self, cause: impl Into<String>) {
        self.push(Err(cause.into()));
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        lock(&self.requests).clone()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

#[async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        let next = lock(&self.script).pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(cause)) => Err(TransportError::new(cause, request.target.clone())),
            None => Err(TransportError::new(
                "scripted fetcher exhausted",
                request.target.clone(),
            )),
        }
    }
}

/// RecordingNotifier は送信されたメッセージを記録する
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    failures_left: Mutex<u32>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 次の `n` 回の deliver を失敗させる
    pub fn fail_next(&self, n: u32) {
        *lock(&self.failures_left) = n;
    }

    pub fn sent(&self) -> Vec<String> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        {
            let mut left = lock(&self.failures_left);
            if *left > 0 {
                *left -= 1;
                return Err(DeliveryError::new("scripted delivery failure"));
            }
        }
        lock(&self.sent).push(text.to_string());
        Ok(())
    }
}
