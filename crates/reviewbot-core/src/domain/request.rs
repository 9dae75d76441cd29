use std::fmt;

/// The URL and query parameters of one status request.
///
/// Errors carry this so a failing call can be reproduced from the log line.
/// Headers are not part of it: they hold the API token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RequestTarget {
    pub fn new(url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            url: url.into(),
            query,
        }
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.url)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}
