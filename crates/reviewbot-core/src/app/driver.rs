//! Driver - プロセス全体のスケジューリングループ
//!
//! # フロー
//! 1. FailureGuard::run_iteration() を現在の watermark で呼ぶ
//! 2. 返ってきた watermark を保存
//! 3. 成功なら steady、失敗なら retry の間隔だけ sleep
//!
//! 単一タスクで逐次実行します（spawn しない）。
//! 停止は sleep 中に shutdown シグナルで受け付けます。

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use super::failure_guard::{FailureGuard, Iteration};
use super::schedule::PollSchedule;
use crate::domain::Watermark;

/// One iteration plus the delay chosen after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub iteration: Iteration,
    pub delay: Duration,
}

pub struct Driver {
    guard: FailureGuard,
    schedule: PollSchedule,
    watermark: Watermark,
}

impl Driver {
    pub fn new(guard: FailureGuard, schedule: PollSchedule, watermark: Watermark) -> Self {
        Self {
            guard,
            schedule,
            watermark,
        }
    }

    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    pub fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    pub fn guard(&self) -> &FailureGuard {
        &self.guard
    }

    /// Runs one iteration and stores the returned watermark. Does not sleep.
    pub async fn step(&mut self) -> Step {
        let iteration = self.guard.run_iteration(self.watermark).await;
        self.watermark = iteration.watermark;
        let delay = self.schedule.next_delay(iteration.outcome);
        debug!(
            outcome = ?iteration.outcome,
            watermark = %self.watermark,
            delay_secs = delay.as_secs(),
            "iteration finished"
        );
        Step { iteration, delay }
    }

    /// Runs exactly `n` iterations, sleeping between them.
    pub async fn run_for(&mut self, n: usize) -> Vec<Step> {
        let mut steps = Vec::with_capacity(n);
        for i in 0..n {
            let step = self.step().await;
            steps.push(step);
            if i + 1 < n {
                tokio::time::sleep(step.delay).await;
            }
        }
        steps
    }

    /// Runs until `shutdown` turns true or its sender is dropped.
    ///
    /// Returns the last watermark.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Watermark {
        info!(watermark = %self.watermark, "driver started");
        loop {
            if *shutdown.borrow() {
                break;
            }

            let step = self.step().await;

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // sender dropped
                        break;
                    }
                }
                _ = tokio::time::sleep(step.delay) => {}
            }
        }
        info!(watermark = %self.watermark, "driver stopped");
        self.watermark
    }
}
