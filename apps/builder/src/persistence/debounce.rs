//! Single-slot debounced scheduler.
//!
//! Every [`Debouncer::schedule`] call cancels whatever is still waiting in
//! the slot and arms a fresh timer. Only the most recent request survives a
//! burst; earlier ones are dropped, never merged or queued. A task whose
//! timer has already elapsed runs detached and is never cancelled.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Mutex::new(None),
        }
    }

    /// Replaces any pending task with `task`, to run after the quiet period.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pending) = slot.take() {
            if !pending.is_finished() {
                debug!("Debouncer: superseding pending task");
            }
            pending.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach so a later schedule() cannot abort work already under way.
            tokio::spawn(task);
        }));
    }

    /// Drops the pending task, if any, without running it.
    pub fn cancel(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pending) = slot.take() {
            pending.abort();
        }
    }

    /// True while a task is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
