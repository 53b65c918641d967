use core::fmt;
use core::time::Duration;

/// A callback handed to a [`Scheduler`]. It runs at most once.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Opaque identifier for a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a raw host timer id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw host timer id.
    #[must_use]
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// A single-threaded timer facility.
///
/// Implementations must never run a callback synchronously from inside
/// [`set_timeout`](Self::set_timeout), and must guarantee that a cleared
/// callback never runs.
pub trait Scheduler {
    /// Schedules `callback` to run once after `wait` has elapsed.
    fn set_timeout(&self, wait: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancels a pending callback. Clearing an expired or unknown handle is a no-op.
    fn clear_timeout(&self, handle: TimerHandle);
}
