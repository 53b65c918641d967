use core::cell::{Cell, RefCell};
use core::fmt;
use core::time::Duration;

use std::collections::HashMap;
use std::rc::Rc;

use real_viewport_debounce::{Scheduler, TimerCallback, TimerHandle};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

/// [`Scheduler`] backed by `window.setTimeout` / `window.clearTimeout`.
///
/// Each pending timer keeps its JS closure alive in `timers`. A closure that
/// has fired records its id in `expired` and is released on the next
/// `set_timeout`, never from inside its own invocation.
pub struct WindowScheduler {
    window: Window,
    timers: RefCell<HashMap<i32, Closure<dyn FnMut()>>>,
    expired: Rc<RefCell<Vec<i32>>>,
}

impl WindowScheduler {
    /// Creates a scheduler for `window`.
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self {
            window,
            timers: RefCell::new(HashMap::new()),
            expired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn release_expired(&self) {
        let expired: Vec<i32> = self.expired.borrow_mut().drain(..).collect();
        let mut timers = self.timers.borrow_mut();
        for id in expired {
            timers.remove(&id);
        }
    }
}

impl Scheduler for WindowScheduler {
    fn set_timeout(&self, wait: Duration, callback: TimerCallback) -> TimerHandle {
        self.release_expired();

        let id_slot = Rc::new(Cell::new(None::<i32>));
        let closure = {
            let id_slot = Rc::clone(&id_slot);
            let expired = Rc::clone(&self.expired);
            let mut callback = Some(callback);
            Closure::wrap(Box::new(move || {
                if let Some(callback) = callback.take() {
                    callback();
                }
                if let Some(id) = id_slot.get() {
                    expired.borrow_mut().push(id);
                }
            }) as Box<dyn FnMut()>)
        };

        let millis = i32::try_from(wait.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(id) => {
                id_slot.set(Some(id));
                self.timers.borrow_mut().insert(id, closure);
                TimerHandle::from_raw(u64::from(id.unsigned_abs()))
            }
            Err(err) => {
                tracing::error!(?err, "setTimeout failed");
                TimerHandle::from_raw(u64::MAX)
            }
        }
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let Ok(id) = i32::try_from(handle.into_raw()) else {
            return;
        };
        if self.timers.borrow_mut().remove(&id).is_some() {
            self.window.clear_timeout_with_handle(id);
        }
    }
}

impl Drop for WindowScheduler {
    fn drop(&mut self) {
        for (id, _) in self.timers.borrow_mut().drain() {
            self.window.clear_timeout_with_handle(id);
        }
    }
}

impl fmt::Debug for WindowScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowScheduler")
            .field("pending", &self.timers.borrow().len())
            .finish_non_exhaustive()
    }
}
