//! Domain model (watermark, submissions, verdicts, errors).
//!
//! ここにある型はすべて副作用を持たない値です。
//! ネットワークや通知チャネルは `ports` 側に置きます。

pub mod errors;
pub mod request;
pub mod submission;
pub mod verdict;
pub mod watermark;

pub use self::errors::{
    DeliveryError, ErrorKind, PollError, RemoteError, TransportError, UnknownStatusError,
};
pub use self::request::RequestTarget;
pub use self::submission::{ReviewStatus, StatusPayload, SubmissionRecord};
pub use self::verdict::{Messages, StatusTranslator};
pub use self::watermark::Watermark;
