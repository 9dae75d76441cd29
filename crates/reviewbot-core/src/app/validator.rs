//! ResponseValidator - ドメイン処理の前にエラーマーカーを検査
//!
//! マーカーは固定順で検査し、最初に見つかったものを採用します。
//! 値の中身（空文字や null でも）は見ず、キーの存在だけで判定します。

use serde_json::Value;

use crate::domain::{RemoteError, RequestTarget};

/// Error-marker keys, in the order they are checked.
pub const ERROR_MARKERS: [&str; 2] = ["error", "code"];

/// Fails with `RemoteError` when `raw` carries an error marker.
///
/// Anything that is not a JSON object, or an object without markers, passes.
pub fn validate(raw: &Value, target: &RequestTarget) -> Result<(), RemoteError> {
    let Some(object) = raw.as_object() else {
        return Ok(());
    };

    for marker in ERROR_MARKERS {
        if let Some(value) = object.get(marker) {
            return Err(RemoteError {
                marker: marker.to_string(),
                value: marker_text(value),
                target: target.clone(),
            });
        }
    }
    Ok(())
}

fn marker_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
