//! Ports - 外部との境界
//!
//! ここにある trait はコアが外部（HTTP API、チャット、時計）に要求する
//! 最小のインターフェースです。実装は `impls` にあります。

pub mod clock;
pub mod fetcher;
pub mod notifier;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::fetcher::{FetchRequest, FetchResponse, StatusFetcher};
pub use self::notifier::Notifier;
