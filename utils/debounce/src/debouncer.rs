use core::cell::Cell;
use core::fmt;
use core::time::Duration;

use std::rc::{Rc, Weak};

use crate::scheduler::{Scheduler, TimerHandle};

/// Timing options for a [`Debouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Quiet period that must elapse after the latest call.
    pub wait: Duration,
    /// Fire on the leading edge of a burst instead of the trailing edge.
    pub leading: bool,
}

impl DebounceOptions {
    /// Trailing-edge options with the given quiet period.
    #[must_use]
    pub const fn trailing(wait: Duration) -> Self {
        Self {
            wait,
            leading: false,
        }
    }

    /// Leading-edge options with the given quiet period.
    #[must_use]
    pub const fn leading(wait: Duration) -> Self {
        Self {
            wait,
            leading: true,
        }
    }
}

struct DebounceState {
    scheduler: Rc<dyn Scheduler>,
    options: DebounceOptions,
    action: Box<dyn Fn()>,
    pending: Cell<Option<TimerHandle>>,
}

impl DebounceState {
    fn expire(&self) {
        self.pending.set(None);
        if !self.options.leading {
            (self.action)();
        }
    }
}

/// A time-coalescing wrapper around a zero-argument action.
///
/// Every [`call`](Self::call) cancels the pending timer and schedules a new one
/// `wait` after the latest call. In trailing mode the action runs when that
/// timer expires. In leading mode the action runs immediately when no timer is
/// pending at call time, and the timer only marks the end of the burst.
///
/// Cloning a `Debouncer` yields another handle to the same timer.
#[derive(Clone)]
pub struct Debouncer {
    state: Rc<DebounceState>,
}

impl Debouncer {
    /// Creates a trailing-edge debouncer.
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        wait: Duration,
        action: impl Fn() + 'static,
    ) -> Self {
        Self::with_options(scheduler, DebounceOptions::trailing(wait), action)
    }

    /// Creates a debouncer with explicit [`DebounceOptions`].
    pub fn with_options(
        scheduler: Rc<dyn Scheduler>,
        options: DebounceOptions,
        action: impl Fn() + 'static,
    ) -> Self {
        Self {
            state: Rc::new(DebounceState {
                scheduler,
                options,
                action: Box::new(action),
                pending: Cell::new(None),
            }),
        }
    }

    /// Registers one invocation.
    pub fn call(&self) {
        let state = &self.state;
        let was_pending = state.pending.take();
        if let Some(handle) = was_pending {
            state.scheduler.clear_timeout(handle);
        }

        let weak: Weak<DebounceState> = Rc::downgrade(state);
        let handle = state.scheduler.set_timeout(
            state.options.wait,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.expire();
                }
            }),
        );
        state.pending.set(Some(handle));
        tracing::trace!(%handle, wait = ?state.options.wait, "debounce rescheduled");

        if state.options.leading && was_pending.is_none() {
            (state.action)();
        }
    }

    /// Drops the pending invocation, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.state.pending.take() {
            self.state.scheduler.clear_timeout(handle);
            tracing::trace!(%handle, "debounce cancelled");
        }
    }

    /// Whether a timer is currently scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }

    /// The options this debouncer was built with.
    #[must_use]
    pub fn options(&self) -> DebounceOptions {
        self.state.options
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("options", &self.state.options)
            .field("pending", &self.state.pending.get())
            .finish_non_exhaustive()
    }
}

/// Wraps `action` in a [`Debouncer`] with the given wait and edge.
pub fn debounce(
    scheduler: Rc<dyn Scheduler>,
    wait: Duration,
    leading: bool,
    action: impl Fn() + 'static,
) -> Debouncer {
    Debouncer::with_options(scheduler, DebounceOptions { wait, leading }, action)
}
