//! iOS Safari toolbar tracking.
//!
//! Mobile Safari collapses its bottom toolbar while the user scrolls, which grows
//! `innerHeight` without firing `resize`. The heuristic records the height at
//! activation and compares every scroll against it.

use core::cell::Cell;
use core::fmt;

use std::rc::{Rc, Weak};

use real_viewport_debounce::{Scheduler, TimerHandle};

use crate::config::{TOOLBAR_COLLAPSE_THRESHOLD, TOOLBAR_SETTLE_DELAY};
use crate::error::ViewportError;
use crate::host::{Host, HostEvent, ListenerId, WindowHost};
use crate::platform::{PlatformCapability, classify_platform};

struct ToolbarShared {
    window: Rc<dyn WindowHost>,
    scheduler: Rc<dyn Scheduler>,
    baseline_height: f64,
    hidden: Cell<Option<bool>>,
    settle: Cell<Option<TimerHandle>>,
    active: Cell<bool>,
    on_change: Box<dyn Fn(bool)>,
    on_settled: Box<dyn Fn()>,
}

impl ToolbarShared {
    fn on_scroll(self: &Rc<Self>) {
        if !self.active.get() {
            return;
        }
        let height = match self.window.inner_size() {
            Ok(size) => size.height,
            Err(err) => {
                tracing::error!(%err, "toolbar heuristic could not read the window height");
                return;
            }
        };

        let hidden = height - self.baseline_height > TOOLBAR_COLLAPSE_THRESHOLD;
        if self.hidden.get() == Some(hidden) {
            return;
        }
        self.hidden.set(Some(hidden));
        tracing::debug!(hidden, height, baseline = self.baseline_height, "toolbar state changed");

        (self.on_change)(hidden);
        self.schedule_settle();
    }

    fn schedule_settle(self: &Rc<Self>) {
        if let Some(handle) = self.settle.take() {
            self.scheduler.clear_timeout(handle);
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.scheduler.set_timeout(
            TOOLBAR_SETTLE_DELAY,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.settle.set(None);
                    if shared.active.get() {
                        (shared.on_settled)();
                    }
                }
            }),
        );
        self.settle.set(Some(handle));
    }
}

/// Tracks whether the iOS Safari toolbar is collapsed.
///
/// On every other platform the heuristic is inert and
/// [`is_toolbar_hidden`](Self::is_toolbar_hidden) stays `None`.
pub struct ToolbarHeuristic {
    capability: PlatformCapability,
    shared: Rc<ToolbarShared>,
    listener: Cell<Option<ListenerId>>,
}

impl ToolbarHeuristic {
    /// Classifies the host and, on iOS Safari, starts listening for scroll.
    ///
    /// `on_change` runs whenever the collapsed state flips. `on_settled` runs once,
    /// [`TOOLBAR_SETTLE_DELAY`] after the latest flip.
    ///
    /// # Errors
    ///
    /// Returns an error if the baseline height cannot be read.
    pub fn activate(
        host: &Host,
        on_change: impl Fn(bool) + 'static,
        on_settled: impl Fn() + 'static,
    ) -> Result<Self, ViewportError> {
        let window = Rc::clone(host.window());
        let capability = classify_platform(&window.user_agent(), window.is_standalone());

        let (baseline_height, hidden) = match capability {
            PlatformCapability::Unsupported => (0.0, None),
            PlatformCapability::IosStandalone => (0.0, Some(true)),
            PlatformCapability::IosSafari => (window.inner_size()?.height, None),
        };

        let shared = Rc::new(ToolbarShared {
            window,
            scheduler: Rc::clone(host.scheduler()),
            baseline_height,
            hidden: Cell::new(hidden),
            settle: Cell::new(None),
            active: Cell::new(true),
            on_change: Box::new(on_change),
            on_settled: Box::new(on_settled),
        });

        let listener = if capability == PlatformCapability::IosSafari {
            let weak = Rc::downgrade(&shared);
            Some(shared.window.add_listener(
                HostEvent::Scroll,
                Rc::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_scroll();
                    }
                }),
            ))
        } else {
            None
        };

        tracing::debug!(?capability, baseline_height, "toolbar heuristic activated");
        Ok(Self {
            capability,
            shared,
            listener: Cell::new(listener),
        })
    }

    /// The platform classification made at activation.
    #[must_use]
    pub const fn capability(&self) -> PlatformCapability {
        self.capability
    }

    /// Current state: `Some(true)` collapsed, `Some(false)` expanded, `None` unknown.
    #[must_use]
    pub fn is_toolbar_hidden(&self) -> Option<bool> {
        self.shared.hidden.get()
    }

    /// Inner height captured at activation.
    #[must_use]
    pub fn baseline_height(&self) -> f64 {
        self.shared.baseline_height
    }

    /// Whether a scroll listener is registered.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.get().is_some()
    }

    /// Removes the scroll listener and cancels a pending settle remeasurement.
    pub fn deactivate(&self) {
        if !self.shared.active.replace(false) {
            return;
        }
        if let Some(id) = self.listener.take() {
            self.shared.window.remove_listener(id);
        }
        if let Some(handle) = self.shared.settle.take() {
            self.shared.scheduler.clear_timeout(handle);
        }
        tracing::debug!("toolbar heuristic deactivated");
    }
}

impl Drop for ToolbarHeuristic {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl fmt::Debug for ToolbarHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolbarHeuristic")
            .field("capability", &self.capability)
            .field("hidden", &self.shared.hidden.get())
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}
