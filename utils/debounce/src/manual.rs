use core::cell::{Cell, RefCell};
use core::fmt;
use core::time::Duration;

use crate::scheduler::{Scheduler, TimerCallback, TimerHandle};

struct PendingTimer {
    handle: TimerHandle,
    due: Duration,
    callback: TimerCallback,
}

/// A deterministic [`Scheduler`] driven by explicit calls to [`advance`](Self::advance).
///
/// Time only moves when the owner says so. Callbacks run in due order; timers
/// that fall due at the same instant run in registration order. A callback may
/// schedule or clear other timers, including ones that fall due within the same
/// `advance` call.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    timers: RefCell<Vec<PendingTimer>>,
}

impl ManualScheduler {
    /// Creates a scheduler whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of callbacks that are scheduled but have not run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Moves the clock forward by `by`, running every callback that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        while let Some(timer) = self.pop_due(target) {
            self.now.set(timer.due);
            (timer.callback)();
        }
        self.now.set(target);
    }

    fn pop_due(&self, target: Duration) -> Option<PendingTimer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= target)
            .min_by_key(|(_, timer)| (timer.due, timer.handle))
            .map(|(index, _)| index)?;
        Some(timers.remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, wait: Duration, callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = TimerHandle::from_raw(id);
        self.timers.borrow_mut().push(PendingTimer {
            handle,
            due: self.now.get() + wait,
            callback,
        });
        handle
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.timers
            .borrow_mut()
            .retain(|timer| timer.handle != handle);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
