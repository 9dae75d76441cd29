//! Submission records as returned by the review-status API.

use std::fmt;

use serde::Deserialize;

use super::watermark::Watermark;

/// Review status of a submission.
///
/// Unknown values are kept verbatim in `Unrecognized` instead of failing
/// deserialization; the remote service may introduce new statuses and the
/// translator reports them as a domain error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ReviewStatus {
    Rejected,
    Reviewing,
    Approved,
    Unrecognized(String),
}

impl ReviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReviewStatus::Rejected => "rejected",
            ReviewStatus::Reviewing => "reviewing",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for ReviewStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "rejected" => ReviewStatus::Rejected,
            "reviewing" => ReviewStatus::Reviewing,
            "approved" => ReviewStatus::Approved,
            _ => ReviewStatus::Unrecognized(raw),
        }
    }
}

impl From<&str> for ReviewStatus {
    fn from(raw: &str) -> Self {
        ReviewStatus::from(raw.to_string())
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submission entry (`{"homework_name": ..., "status": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "homework_name")]
    pub name: String,
    pub status: ReviewStatus,
}

impl SubmissionRecord {
    pub fn new(name: impl Into<String>, status: impl Into<ReviewStatus>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// The typed view of a successful status response.
///
/// Both fields are optional: an empty poll window omits `homeworks`, and the
/// cursor stays put when `current_date` is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub homeworks: Option<Vec<SubmissionRecord>>,

    #[serde(default)]
    pub current_date: Option<Watermark>,
}

impl StatusPayload {
    /// The most recent submission; the API lists newest first.
    pub fn latest(&self) -> Option<&SubmissionRecord> {
        self.homeworks.as_ref().and_then(|records| records.first())
    }
}
