//! Debounced save scheduling.
//!
//! Drawing tools emit bursts of edit events (dragging a vertex fires one per
//! mouse move); writing the store on every event would thrash it and persist
//! intermediate shapes. [`SaveScheduler`] coalesces the burst: the store is
//! written at most once per debounce window, plus one final flush at
//! teardown.
//!
//! The machine is `Idle -> Pending -> Idle`. Scheduling while Pending
//! cancels the armed timer and re-arms it with a fresh delay; the action
//! therefore runs once, after the window of quiet following the last
//! mutation, and always observes the latest collection state.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

struct SchedulerState {
    /// Incremented on every schedule/flush/cancel; a timer that fires with a
    /// stale generation does nothing, so an aborted timer can never race the
    /// one that replaced it.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Coalesces rapid mutation events into a single deferred action.
///
/// The action is fixed at construction (the orchestrator's persist step) and
/// runs either when the debounce window elapses without a newer `schedule`
/// call, or immediately on [`flush`](SaveScheduler::flush).
///
/// `schedule` must be called from within a tokio runtime; the armed timer is
/// a spawned task.
pub struct SaveScheduler {
    window: Duration,
    action: Arc<dyn Fn() + Send + Sync>,
    state: Arc<Mutex<SchedulerState>>,
}

impl SaveScheduler {
    /// Creates an idle scheduler around a deferred action.
    pub fn new(window: Duration, action: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self {
            window,
            action,
            state: Arc::new(Mutex::new(SchedulerState {
                generation: 0,
                timer: None,
            })),
        }
    }

    /// Arms (or re-arms) the debounce timer.
    ///
    /// Idle -> Pending, or Pending -> Pending with the previous timer
    /// cancelled and replaced. Writes are coalesced, never queued: at any
    /// moment at most one deferred save exists.
    pub fn schedule(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let action = Arc::clone(&self.action);
        let window = self.window;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            {
                let mut state = shared.lock();
                if state.generation != generation {
                    return;
                }
                state.timer = None;
            }
            action();
        }));
    }

    /// Runs a pending action immediately and returns to Idle.
    ///
    /// No-op when Idle. Used at teardown so no in-flight edit is lost.
    pub fn flush(&self) {
        let pending = {
            let mut state = self.state.lock();
            state.generation += 1;
            match state.timer.take() {
                Some(timer) => {
                    timer.abort();
                    true
                }
                None => false,
            }
        };
        if pending {
            (self.action)();
        }
    }

    /// Disarms a pending timer without running the action.
    ///
    /// Used by clear-all, which persists immediately itself.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Whether a deferred save is currently armed.
    pub fn is_pending(&self) -> bool {
        self.state.lock().timer.is_some()
    }
}

impl fmt::Debug for SaveScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveScheduler")
            .field("window", &self.window)
            .field("pending", &self.is_pending())
            .finish()
    }
}
