//! Fixed-interval background polling with cancellation on drop.
//!
//! The unread-message counter is eventually-consistent display data: a poll
//! that loses a race with an explicit mutation is tolerated, but a poll
//! belonging to a dismounted view must never apply a stale update. Dropping
//! the handle aborts the task, which is exactly that liveness guard.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::ApiResult;

/// Guard for a background poll task. Aborts the task on drop.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `poll` on a fixed interval until the returned handle is dropped.
///
/// Failures are logged and skipped; the next tick tries again.
pub fn spawn_poll<F, Fut, T>(interval: Duration, poll: F) -> PollHandle
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ApiResult<T>> + Send,
    T: Send,
{
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(error) = poll().await {
                tracing::debug!("background poll failed: {error}");
            }
        }
    });
    PollHandle { task }
}
