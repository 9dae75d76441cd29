//! StatusFetcher port - review-status API への HTTP 呼び出し
//!
//! コアは「URL・クエリ・ヘッダを渡すとステータスコードと本文が返る」
//! ことだけを前提にします。JSON の解釈は Poller 側の責務です。

use std::fmt;

use async_trait::async_trait;

use crate::domain::{RequestTarget, TransportError};

/// One outgoing GET request.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub target: RequestTarget,
    pub headers: Vec<(String, String)>,
}

// Header values hold credentials, so they never reach logs.
impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("FetchRequest")
            .field("target", &self.target)
            .field("headers", &header_names)
            .finish()
    }
}

/// Raw HTTP reply: status code and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 OK with a JSON body.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// StatusFetcher は HTTP GET を実行
///
/// 接続エラー・タイムアウトは `TransportError` として返すこと。
/// 握りつぶしてはいけない。
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError>;
}
