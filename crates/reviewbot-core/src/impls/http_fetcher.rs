//! HttpStatusFetcher - reqwest による StatusFetcher 実装
//!
//! タイムアウトはクライアント側で設定します（コアは関知しない）。

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::TransportError;
use crate::ports::{FetchRequest, FetchResponse, StatusFetcher};

pub struct HttpStatusFetcher {
    client: reqwest::Client,
}

impl HttpStatusFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("request failed: {err}")
    }
}

#[async_trait]
impl StatusFetcher for HttpStatusFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut builder = self
            .client
            .get(&request.target.url)
            .query(&request.target.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(describe(&e), request.target.clone()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(describe(&e), request.target.clone()))?;

        Ok(FetchResponse { status, body })
    }
}
