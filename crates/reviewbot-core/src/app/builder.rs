//! AppBuilder - Driver の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 本番アダプタとテスト用アダプタの差し替え

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::driver::Driver;
use super::failure_guard::FailureGuard;
use super::poller::Poller;
use super::schedule::PollSchedule;
use crate::config::Config;
use crate::domain::{Messages, StatusTranslator, Watermark};
use crate::impls::{HttpStatusFetcher, TelegramNotifier};
use crate::ports::{Clock, Notifier, StatusFetcher, SystemClock};

/// AppBuilder は Driver を構築
///
/// # 使用例
/// ```ignore
/// let driver = AppBuilder::from_config(&config)?.build()?;
/// driver.run(shutdown_rx).await;
/// ```
///
/// # Fail-fast 設計
/// - fetcher / notifier が未設定なら BuildError
/// - 間隔が 0、または retry > steady なら BuildError
pub struct AppBuilder {
    endpoint: String,
    api_token: String,
    fetcher: Option<Arc<dyn StatusFetcher>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Arc<dyn Clock>,
    messages: Messages,
    schedule: PollSchedule,
    lookback: Duration,
}

/// BuildError は構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no status fetcher configured")]
    MissingFetcher,

    #[error("no notifier configured")]
    MissingNotifier,

    #[error("invalid poll schedule: {0}")]
    InvalidSchedule(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl AppBuilder {
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            fetcher: None,
            notifier: None,
            clock: Arc::new(SystemClock),
            messages: Messages::default(),
            schedule: PollSchedule::default(),
            lookback: Duration::ZERO,
        }
    }

    /// 設定から本番用アダプタ（reqwest + Telegram）まで組み立てる
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        let fetcher = HttpStatusFetcher::new(config.http_timeout)
            .map_err(|e| BuildError::HttpClient(e.to_string()))?;
        let notifier = TelegramNotifier::new(
            &config.telegram_api_url,
            &config.telegram_token,
            &config.chat_id,
            config.http_timeout,
        )
        .map_err(|e| BuildError::HttpClient(e.to_string()))?;

        Ok(Self::new(&config.endpoint, &config.api_token)
            .fetcher(Arc::new(fetcher))
            .notifier(Arc::new(notifier))
            .schedule(PollSchedule::new(config.poll_interval, config.retry_interval))
            .lookback(config.lookback))
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn StatusFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn schedule(mut self, schedule: PollSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// How far before "now" the first poll window starts.
    pub fn lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn build(self) -> Result<Driver, BuildError> {
        let fetcher = self.fetcher.ok_or(BuildError::MissingFetcher)?;
        let notifier = self.notifier.ok_or(BuildError::MissingNotifier)?;
        validate_schedule(&self.schedule)?;

        let messages = Arc::new(self.messages);
        let poller = Poller::new(
            fetcher,
            self.endpoint,
            self.api_token,
            StatusTranslator::new(messages.clone()),
        );
        let guard = FailureGuard::new(poller, notifier, messages);
        let watermark = Watermark::starting_at(self.clock.now(), self.lookback);

        info!(
            %watermark,
            steady_secs = self.schedule.steady.as_secs(),
            retry_secs = self.schedule.retry.as_secs(),
            "driver built"
        );
        Ok(Driver::new(guard, self.schedule, watermark))
    }
}

fn validate_schedule(schedule: &PollSchedule) -> Result<(), BuildError> {
    if schedule.steady.is_zero() || schedule.retry.is_zero() {
        return Err(BuildError::InvalidSchedule(
            "intervals must be non-zero".to_string(),
        ));
    }
    if schedule.retry > schedule.steady {
        return Err(BuildError::InvalidSchedule(format!(
            "retry interval {:?} is longer than steady interval {:?}",
            schedule.retry, schedule.steady
        )));
    }
    Ok(())
}
