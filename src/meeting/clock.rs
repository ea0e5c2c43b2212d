//! Timer abstraction for the status poller.
//!
//! Production code sleeps on the tokio timer. `ManualClock` lets a caller
//! decide exactly when each poll interval elapses.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{watch, Notify};

#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A clock whose sleeps only end when `advance` is called.
pub struct ManualClock {
    tick: Notify,
    sleepers: watch::Sender<usize>,
    /// Sleeps that ended because of a tick. Never decreases.
    woken: watch::Sender<u64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            tick: Notify::new(),
            sleepers: watch::channel(0).0,
            woken: watch::channel(0).0,
        }
    }

    /// Number of tasks currently blocked in `sleep`.
    pub fn sleepers(&self) -> usize {
        *self.sleepers.borrow()
    }

    /// Wait until some task is blocked in `sleep`.
    pub async fn wait_for_sleeper(&self) {
        let mut rx = self.sleepers.subscribe();
        let _ = rx.wait_for(|n| *n > 0).await;
    }

    /// Wait for a sleeper, end its sleep, and wait until it has woken up.
    ///
    /// Completion is tracked by wake-up count, so a task that goes straight
    /// back to sleep does not keep this waiting.
    pub async fn advance(&self) {
        self.wait_for_sleeper().await;
        let mut woken = self.woken.subscribe();
        let before = *woken.borrow_and_update();
        self.tick.notify_waiters();
        let _ = woken.wait_for(|n| *n > before).await;
    }
}

struct SleeperGuard<'a>(&'a watch::Sender<usize>);

impl Drop for SleeperGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, _duration: Duration) {
        let notified = self.tick.notified();
        tokio::pin!(notified);
        // Register before announcing so a tick sent right after cannot be missed.
        notified.as_mut().enable();

        self.sleepers.send_modify(|n| *n += 1);
        let guard = SleeperGuard(&self.sleepers);
        notified.await;
        drop(guard);
        self.woken.send_modify(|n| *n += 1);
    }
}
