//! Ticker - 表示更新ループ
//!
//! # フロー
//! 1. 一定周期（既定 1 秒）で tick
//! 2. engine で残り時間を再計算
//! 3. `watch` チャネルに最新値を publish
//! 4. expired を publish したら、または受信側がいなくなったら終了

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::{Countdown, TimeRemaining};
use crate::engine::compute_remaining;
use crate::ports::Clock;

#[derive(Clone)]
pub struct Ticker {
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl Ticker {
    pub fn new(clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self { clock, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking on the current runtime.
    pub fn spawn(self, countdown: Countdown) -> (watch::Receiver<TimeRemaining>, JoinHandle<()>) {
        let initial = compute_remaining(self.clock.now(), &countdown);
        let (tx, rx) = watch::channel(initial);
        let handle = tokio::spawn(self.run(countdown, tx));
        (rx, handle)
    }

    pub async fn run(self, countdown: Countdown, tx: watch::Sender<TimeRemaining>) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let remaining = compute_remaining(self.clock.now(), &countdown);
            if tx.send(remaining).is_err() {
                tracing::debug!(id = %countdown.id, "ticker receiver dropped");
                break;
            }
            if remaining.is_expired {
                tracing::info!(id = %countdown.id, "countdown expired");
                break;
            }
        }
    }
}
