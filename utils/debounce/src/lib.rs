//! # Debounce Utilities
//!
//! Host-agnostic timing combinators. A [`Scheduler`] is anything that can run a
//! callback after a delay and cancel it again: `window.setTimeout` in the
//! browser, or the deterministic [`ManualScheduler`] in tests.
//!
//! [`Debouncer`] wraps a zero-argument action so that bursts of calls collapse
//! into a single trailing invocation:
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use real_viewport_debounce::{Debouncer, ManualScheduler};
//!
//! let clock = Rc::new(ManualScheduler::new());
//! let hits = Rc::new(Cell::new(0));
//! let debounced = Debouncer::new(clock.clone(), Duration::from_millis(250), {
//!     let hits = hits.clone();
//!     move || hits.set(hits.get() + 1)
//! });
//!
//! debounced.call();
//! debounced.call();
//! clock.advance(Duration::from_millis(250));
//! assert_eq!(hits.get(), 1);
//! ```

mod debouncer;
mod manual;
mod scheduler;

pub use debouncer::{DebounceOptions, Debouncer, debounce};
pub use manual::ManualScheduler;
pub use scheduler::{Scheduler, TimerCallback, TimerHandle};
