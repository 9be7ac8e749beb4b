//! Debounce: a single cancellable delayed task.
//!
//! DESIGN
//! ======
//! At most one task waits at a time. Scheduling a new one aborts the waiting
//! one (last signal wins). Once the delay elapses the task is detached onto
//! its own tokio task, so a later signal can no longer cancel work that has
//! already started; it only replaces the timer.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Clone, Default)]
pub struct Debouncer {
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` unless another call replaces it first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });
        let previous = self.pending.lock().unwrap_or_else(PoisonError::into_inner).replace(timer);
        if let Some(previous) = previous.filter(|h| !h.is_finished()) {
            previous.abort();
            debug!(delay_ms = delay.as_millis(), "pending debounce replaced");
        }
    }

    /// Abort the waiting task, if any. Returns whether one was waiting.
    pub fn cancel(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner).take();
        match pending {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a task is still waiting for its delay.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).as_ref().is_some_and(|h| !h.is_finished())
    }
}
