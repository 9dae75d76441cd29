//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてポーリングのロジックを実装します。
//!
//! # 主要コンポーネント
//! - **validator**: レスポンスのエラーマーカー検査
//! - **Poller**: 取得 → 検査 → 変換 → watermark 更新
//! - **FailureGuard**: エラー分類・通知の重複抑止
//! - **PollSchedule**: steady / retry の 2 つの間隔
//! - **Driver**: 無限ループ本体
//! - **AppBuilder**: 構築とワイヤリング

pub mod builder;
pub mod driver;
pub mod failure_guard;
pub mod poller;
pub mod schedule;
pub mod validator;

// 主要な型を再エクスポート
pub use self::builder::{AppBuilder, BuildError};
pub use self::driver::{Driver, Step};
pub use self::failure_guard::{FailureGuard, GuardState, Iteration, IterationOutcome};
pub use self::poller::{PollResult, Poller};
pub use self::schedule::PollSchedule;
