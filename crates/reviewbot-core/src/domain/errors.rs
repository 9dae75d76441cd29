//! Errors - ポーリング失敗の分類
//!
//! # 分類
//! - Transport: 通信エラー・タイムアウト・壊れたレスポンス（一時的）
//! - Remote: API が明示的に返したエラー（`error` / `code`）
//! - UnknownStatus: 既知の判定表にないステータス
//!
//! どれも FailureGuard で同じリトライ/通知ポリシーに乗ります。
//! DeliveryError は通知チャネル自体の失敗で、ログに残すだけです。

use std::fmt;

use thiserror::Error;

use super::request::RequestTarget;

/// ErrorKind はログ用の運用分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Remote,
    UnknownStatus,
}

impl ErrorKind {
    /// Transport failures are expected to clear on their own; the other two
    /// need the remote side (or a redeploy) to change.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::Transport)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Remote => "remote",
            ErrorKind::UnknownStatus => "unknown_status",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection error, timeout, or a body that is not the expected JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {cause} ({target})")]
pub struct TransportError {
    pub cause: String,
    pub target: RequestTarget,
}

impl TransportError {
    pub fn new(cause: impl Into<String>, target: RequestTarget) -> Self {
        Self {
            cause: cause.into(),
            target,
        }
    }
}

/// The API answered, but the payload carried an error marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote error: {marker}={value} ({target})")]
pub struct RemoteError {
    pub marker: String,
    pub value: String,
    pub target: RequestTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown review status: {status}")]
pub struct UnknownStatusError {
    pub status: String,
}

/// Everything a single poll can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatusError),
}

impl PollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PollError::Transport(_) => ErrorKind::Transport,
            PollError::Remote(_) => ErrorKind::Remote,
            PollError::UnknownStatus(_) => ErrorKind::UnknownStatus,
        }
    }
}

/// The notification channel refused or failed to take a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

impl DeliveryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
