//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **HttpStatusFetcher**: reqwest による review-status API 呼び出し（本番用）
//! - **TelegramNotifier**: Telegram Bot API への送信（本番用）
//! - **ScriptedFetcher / RecordingNotifier**: テスト・開発用のインメモリ実装

pub mod http_fetcher;
pub mod inmem;
pub mod telegram;

// 主要な型を再エクスポート
pub use self::http_fetcher::HttpStatusFetcher;
pub use self::inmem::{RecordingNotifier, ScriptedFetcher};
pub use self::telegram::TelegramNotifier;

#[cfg(test)]
mod test_server;
