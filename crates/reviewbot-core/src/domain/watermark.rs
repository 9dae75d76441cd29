//! Watermark - 次のポーリング窓の下限となるタイムスタンプ
//!
//! サーバーが返す `current_date` でのみ前進します。
//! プロセス再起動をまたいで永続化はしません。

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Unix epoch からの秒数で表したポーリングカーソル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Watermark(i64);

impl Watermark {
    pub fn new(secs: i64) -> Self {
        Self(secs)
    }

    /// 起動時の初期値: `now - lookback`
    ///
    /// lookback を 0 にすると起動時刻以降の更新だけを拾います。
    pub fn starting_at(now: DateTime<Utc>, lookback: Duration) -> Self {
        let lookback = i64::try_from(lookback.as_secs()).unwrap_or(i64::MAX);
        Self(now.timestamp().saturating_sub(lookback))
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Returns the reported cursor when the server sent one, otherwise `self`.
    pub fn advance(self, reported: Option<Watermark>) -> Self {
        reported.unwrap_or(self)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
