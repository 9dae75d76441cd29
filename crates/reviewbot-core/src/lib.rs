//! reviewbot-core
//!
//! Core building blocks for the review-status notifier.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（watermark, submission, verdict, errors）
//! - **ports**: 抽象化レイヤー（StatusFetcher, Notifier, Clock）
//! - **app**: アプリケーションロジック（poller, failure_guard, driver, builder）
//! - **impls**: 実装（reqwest / Telegram、テスト用のインメモリ実装）
//! - **config**: 環境変数からの設定読み込み

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{AppBuilder, Driver};
pub use config::{Config, ConfigError};
