//! Verdict - ステータスから表示メッセージへの変換
//!
//! # 学習ポイント
//! - 純粋関数（副作用なし）
//! - 未知のステータスは panic ではなくドメインエラー
//! - 文言は `Messages` に集約して差し替え可能にする

use std::sync::Arc;

use super::errors::{PollError, UnknownStatusError};
use super::submission::{ReviewStatus, SubmissionRecord};

/// Localized texts used in outgoing notifications.
///
/// Templates use `{name}`, `{verdict}`, `{status}` and `{error}` placeholders.
/// Each placeholder is filled once; text substituted into a template is never
/// scanned again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub rejected: String,
    pub reviewing: String,
    pub approved: String,
    pub checked_template: String,
    pub failure_template: String,
    pub unknown_status_template: String,
    pub unknown_response_template: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            rejected: "К сожалению в работе нашлись ошибки.".to_string(),
            reviewing: "Работа взята на проверку".to_string(),
            approved: "Ревьюеру всё понравилось, можно приступать к следующему уроку."
                .to_string(),
            checked_template: "Проверена работа \"{name}\"!\n\n{verdict}".to_string(),
            failure_template: "Бот столкнулся с ошибкой: {error}".to_string(),
            unknown_status_template: "Неизвестный статус:\n\n{status}".to_string(),
            unknown_response_template: "Неожиданный ответ от сервера: {error}".to_string(),
        }
    }
}

impl Messages {
    /// Verdict text for a known status, `None` for anything else.
    pub fn verdict(&self, status: &ReviewStatus) -> Option<&str> {
        match status {
            ReviewStatus::Rejected => Some(self.rejected.as_str()),
            ReviewStatus::Reviewing => Some(self.reviewing.as_str()),
            ReviewStatus::Approved => Some(self.approved.as_str()),
            ReviewStatus::Unrecognized(_) => None,
        }
    }

    pub fn checked(&self, name: &str, verdict: &str) -> String {
        fill(
            &self.checked_template,
            &[("name", name), ("verdict", verdict)],
        )
    }

    /// Renders the text sent when an iteration fails.
    ///
    /// Remote and unknown-status failures go through their own localized
    /// template first. Two failures are "the same" exactly when this text is
    /// equal.
    pub fn failure_notice(&self, error: &PollError) -> String {
        let detail = match error {
            PollError::Transport(e) => e.to_string(),
            PollError::Remote(e) => {
                let response = format!("{}={} ({})", e.marker, e.value, e.target);
                fill(&self.unknown_response_template, &[("error", response.as_str())])
            }
            PollError::UnknownStatus(e) => {
                fill(&self.unknown_status_template, &[("status", e.status.as_str())])
            }
        };
        fill(&self.failure_template, &[("error", detail.as_str())])
    }
}

/// Single pass over `template`, replacing each `{key}` with its value.
///
/// Unknown placeholders and stray braces are copied as is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = values.iter().find_map(|(key, value)| {
            let after = tail[1..].strip_prefix(*key)?.strip_prefix('}')?;
            Some((*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// StatusTranslator は SubmissionRecord を通知文に変換
#[derive(Debug, Clone)]
pub struct StatusTranslator {
    messages: Arc<Messages>,
}

impl StatusTranslator {
    pub fn new(messages: Arc<Messages>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn translate(&self, record: &SubmissionRecord) -> Result<String, UnknownStatusError> {
        let verdict = self
            .messages
            .verdict(&record.status)
            .ok_or_else(|| UnknownStatusError {
                status: record.status.as_str().to_string(),
            })?;
        Ok(self.messages.checked(&record.name, verdict))
    }
}

impl Default for StatusTranslator {
    fn default() -> Self {
        Self::new(Arc::new(Messages::default()))
    }
}
