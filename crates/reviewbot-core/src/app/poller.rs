//! Poller - 1 回分のポーリング
//!
//! # フロー
//! 1. watermark を `from_date` にしてリクエストを組み立てる
//! 2. StatusFetcher で取得（失敗は TransportError）
//! 3. 本文を JSON として解釈（失敗は TransportError）
//! 4. ResponseValidator でエラーマーカーを検査（RemoteError）
//! 5. 先頭のレコードを StatusTranslator で通知文に変換（UnknownStatusError）
//! 6. `current_date` があれば watermark を進める
//!
//! メッセージと新しい watermark は必ずまとめて返します。

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::validator;
use crate::domain::{
    PollError, RequestTarget, StatusPayload, StatusTranslator, TransportError, Watermark,
};
use crate::ports::{FetchRequest, StatusFetcher};

/// Query parameter carrying the watermark.
pub const FROM_DATE_PARAM: &str = "from_date";

/// The result of one successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    /// Text to deliver, if the window contained a submission.
    pub message: Option<String>,
    pub watermark: Watermark,
}

pub struct Poller {
    fetcher: Arc<dyn StatusFetcher>,
    endpoint: String,
    api_token: String,
    translator: StatusTranslator,
}

impl Poller {
    pub fn new(
        fetcher: Arc<dyn StatusFetcher>,
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
        translator: StatusTranslator,
    ) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            translator,
        }
    }

    pub fn translator(&self) -> &StatusTranslator {
        &self.translator
    }

    fn request(&self, watermark: Watermark) -> FetchRequest {
        FetchRequest {
            target: RequestTarget::new(
                self.endpoint.clone(),
                vec![(FROM_DATE_PARAM.to_string(), watermark.to_string())],
            ),
            headers: vec![(
                "Authorization".to_string(),
                format!("OAuth {}", self.api_token),
            )],
        }
    }

    pub async fn poll_once(&self, watermark: Watermark) -> Result<PollResult, PollError> {
        let request = self.request(watermark);
        debug!(%watermark, target = %request.target, "polling review status");

        let response = self.fetcher.fetch(&request).await?;
        if !response.is_success() {
            warn!(status = response.status, "review-status endpoint returned non-2xx");
        }

        let raw: Value = serde_json::from_str(&response.body).map_err(|e| {
            TransportError::new(
                format!("response body is not JSON (status {}): {e}", response.status),
                request.target.clone(),
            )
        })?;

        validator::validate(&raw, &request.target)?;

        let payload: StatusPayload = serde_json::from_value(raw).map_err(|e| {
            TransportError::new(format!("unexpected payload shape: {e}"), request.target.clone())
        })?;

        let message = match payload.latest() {
            Some(record) => Some(self.translator.translate(record)?),
            None => None,
        };

        Ok(PollResult {
            message,
            watermark: watermark.advance(payload.current_date),
        })
    }
}
