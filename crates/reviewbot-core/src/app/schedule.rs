//! Poll schedule: decides how long to sleep between iterations.

use std::time::Duration;

use super::failure_guard::IterationOutcome;

/// Two named intervals: a slow cadence in steady state and a fast retry
/// after a failed poll.
///
/// There is no retry cap; a persistent failure is retried at `retry` forever
/// (its notice is deduplicated by `FailureGuard`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Delay after a successful poll.
    pub steady: Duration,

    /// Delay after a failed poll.
    pub retry: Duration,
}

impl PollSchedule {
    pub fn new(steady: Duration, retry: Duration) -> Self {
        Self { steady, retry }
    }

    /// Delay before the next iteration.
    ///
    /// A failed verdict delivery still counts as a successful poll: the
    /// watermark has already moved past that submission.
    pub fn next_delay(&self, outcome: IterationOutcome) -> Duration {
        if outcome.is_failure() {
            self.retry
        } else {
            self.steady
        }
    }
}

impl Default for PollSchedule {
    /// 300s steady / 5s retry.
    fn default() -> Self {
        Self {
            steady: Duration::from_secs(300),
            retry: Duration::from_secs(5),
        }
    }
}
