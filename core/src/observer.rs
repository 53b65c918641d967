//! The viewport observer.
//!
//! Measures the window, writes `--{prefix}vw` / `--{prefix}vh` onto the style
//! sink and republishes the values to subscribers, once at start and again after
//! every `resize`, `orientationchange` and toolbar flip.

use core::cell::{Cell, RefCell};
use core::fmt;

use std::rc::{Rc, Weak};

use nami::watcher::BoxWatcherGuard;
use nami::{Binding, Signal, binding};
use real_viewport_debounce::Debouncer;

use crate::config::{MeasureSource, RESIZE_DEBOUNCE, ViewportConfig};
use crate::error::ViewportError;
use crate::host::{EventHandler, Host, HostEvent, ListenerId, WindowSize};
use crate::style::{CssVariableNames, format_px};
use crate::toolbar::ToolbarHeuristic;
use crate::units::{ViewportSnapshot, ViewportUnits};

pub(crate) struct ObserverShared {
    host: Option<Host>,
    config: ViewportConfig,
    names: CssVariableNames,
    snapshot: Binding<ViewportSnapshot>,
    active: Cell<bool>,
    // Cleared by teardown. Inert observers stay readable until then.
    readable: Cell<bool>,
}

impl ObserverShared {
    fn read_size(&self, host: &Host) -> Result<WindowSize, ViewportError> {
        let window = host.window();
        match self.config.measure {
            MeasureSource::Window => window.inner_size(),
            MeasureSource::DocumentClient => {
                let client = window.client_size().unwrap_or_default();
                if client.width > 0.0 && client.height > 0.0 {
                    return Ok(client);
                }
                let inner = window.inner_size()?;
                Ok(WindowSize::new(
                    if client.width > 0.0 { client.width } else { inner.width },
                    if client.height > 0.0 { client.height } else { inner.height },
                ))
            }
        }
    }

    /// Writes both properties, attempting the second even if the first fails.
    fn write_units(&self, host: &Host, width: f64, height: f64) -> Result<(), ViewportError> {
        let style = host.style();
        let width_written = style.set_property(self.names.width(), &format_px(width));
        let height_written = style.set_property(self.names.height(), &format_px(height));
        width_written.and(height_written)
    }

    /// Measures and publishes. Style writes and the in-memory update happen together.
    ///
    /// A failed write restores the previously published values so the style
    /// sink never runs ahead of the snapshot.
    fn measure_and_publish(&self) -> Result<ViewportUnits, ViewportError> {
        let Some(host) = &self.host else {
            return Ok(ViewportUnits::default());
        };
        let units = ViewportUnits::from_size(self.read_size(host)?);

        if let (Some(width), Some(height)) = (units.width_unit, units.height_unit) {
            if let Err(err) = self.write_units(host, width, height) {
                let previous = self.snapshot.get();
                if let (Some(width), Some(height)) = (previous.width_unit, previous.height_unit) {
                    if let Err(rollback) = self.write_units(host, width, height) {
                        tracing::warn!(%rollback, "could not restore viewport properties");
                    }
                }
                return Err(err);
            }
        }
        self.snapshot.set(self.snapshot.get().with_units(units));
        tracing::debug!(
            width_unit = ?units.width_unit,
            height_unit = ?units.height_unit,
            "viewport units published"
        );
        Ok(units)
    }

    fn remeasure(&self) {
        if !self.active.get() {
            return;
        }
        if let Err(err) = self.measure_and_publish() {
            tracing::error!(%err, "viewport measurement failed");
        }
    }

    /// The published snapshot, or `None` once the observer has been torn down.
    pub(crate) fn scoped_snapshot(&self) -> Option<ViewportSnapshot> {
        self.readable.get().then(|| self.snapshot.get())
    }

    fn publish_toolbar(&self, hidden: bool) {
        if !self.active.get() {
            return;
        }
        self.snapshot
            .set(self.snapshot.get().with_toolbar(Some(hidden)));
    }
}

struct Attachments {
    listeners: Vec<ListenerId>,
    debouncer: Option<Debouncer>,
    toolbar: ToolbarHeuristic,
}

/// Keeps the viewport custom properties and the published snapshot in sync with the window.
///
/// The observer is active from [`start`](Self::start) until [`teardown`](Self::teardown)
/// or drop. Teardown removes every listener and cancels every timer the observer
/// scheduled, so nothing is written afterwards.
pub struct ViewportObserver {
    shared: Rc<ObserverShared>,
    attachments: RefCell<Option<Attachments>>,
}

impl ViewportObserver {
    /// Measures once, publishes, then starts listening.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial measurement or style write fails.
    pub fn start(host: Host, config: ViewportConfig) -> Result<Self, ViewportError> {
        let shared = Rc::new(ObserverShared {
            names: CssVariableNames::new(&config.variables_prefix),
            host: Some(host.clone()),
            config,
            snapshot: binding(ViewportSnapshot::default()),
            active: Cell::new(true),
            readable: Cell::new(true),
        });

        let toolbar = ToolbarHeuristic::activate(
            &host,
            {
                let weak = Rc::downgrade(&shared);
                move |hidden| {
                    if let Some(shared) = weak.upgrade() {
                        shared.publish_toolbar(hidden);
                    }
                }
            },
            remeasure_handler(Rc::downgrade(&shared)),
        )?;
        shared.snapshot.set(
            ViewportSnapshot::default().with_toolbar(toolbar.is_toolbar_hidden()),
        );
        shared.measure_and_publish()?;

        let debouncer = shared.config.debounce_resize.then(|| {
            Debouncer::new(
                Rc::clone(host.scheduler()),
                RESIZE_DEBOUNCE,
                remeasure_handler(Rc::downgrade(&shared)),
            )
        });
        let handler: EventHandler = match &debouncer {
            Some(debouncer) => {
                let trigger = debouncer.clone();
                Rc::new(move || trigger.call())
            }
            None => Rc::new(remeasure_handler(Rc::downgrade(&shared))),
        };

        let window = host.window();
        let listeners = [HostEvent::Resize, HostEvent::OrientationChange]
            .into_iter()
            .map(|event| window.add_listener(event, Rc::clone(&handler)))
            .collect();

        tracing::debug!(
            debounce = shared.config.debounce_resize,
            prefix = %shared.config.variables_prefix,
            "viewport observer started"
        );
        Ok(Self {
            shared,
            attachments: RefCell::new(Some(Attachments {
                listeners,
                debouncer,
                toolbar,
            })),
        })
    }

    /// An observer for contexts without a DOM. It never measures and never writes;
    /// its snapshot stays empty.
    #[must_use]
    pub fn unavailable(config: ViewportConfig) -> Self {
        tracing::debug!("no browser environment, viewport observer is inert");
        Self {
            shared: Rc::new(ObserverShared {
                names: CssVariableNames::new(&config.variables_prefix),
                host: None,
                config,
                snapshot: binding(ViewportSnapshot::default()),
                active: Cell::new(false),
                readable: Cell::new(true),
            }),
            attachments: RefCell::new(None),
        }
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewportSnapshot {
        self.shared.snapshot.get()
    }

    /// The latest published units.
    #[must_use]
    pub fn units(&self) -> ViewportUnits {
        self.snapshot().units()
    }

    /// Calls `listener` with every snapshot published from now on.
    pub fn subscribe(&self, listener: impl Fn(ViewportSnapshot) + 'static) -> Subscription {
        let guard = self
            .shared
            .snapshot
            .watch(move |context| listener(context.into_value()));
        Subscription { _guard: guard }
    }

    /// Measures and publishes immediately, bypassing the debounce.
    ///
    /// Does nothing once the observer has been torn down.
    ///
    /// # Errors
    ///
    /// Returns an error if the host measurement or a style write fails.
    pub fn measure_now(&self) -> Result<ViewportUnits, ViewportError> {
        if !self.shared.active.get() {
            return Ok(self.units());
        }
        self.shared.measure_and_publish()
    }

    /// The custom property names this observer writes.
    #[must_use]
    pub fn variable_names(&self) -> &CssVariableNames {
        &self.shared.names
    }

    /// The configuration the observer was started with.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.shared.config
    }

    /// Whether the observer is still listening.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.active.get()
    }

    /// Whether a debounced remeasurement is waiting to run.
    #[must_use]
    pub fn has_pending_resize(&self) -> bool {
        self.attachments
            .borrow()
            .as_ref()
            .and_then(|attachments| attachments.debouncer.as_ref())
            .is_some_and(Debouncer::is_pending)
    }

    /// Removes all listeners and cancels pending timers. Idempotent.
    pub fn teardown(&self) {
        self.shared.active.set(false);
        self.shared.readable.set(false);
        let Some(attachments) = self.attachments.borrow_mut().take() else {
            return;
        };
        if let Some(host) = &self.shared.host {
            for id in attachments.listeners {
                host.window().remove_listener(id);
            }
        }
        if let Some(debouncer) = &attachments.debouncer {
            debouncer.cancel();
        }
        attachments.toolbar.deactivate();
        tracing::debug!("viewport observer torn down");
    }

    pub(crate) fn scope_source(&self) -> Weak<ObserverShared> {
        Rc::downgrade(&self.shared)
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for ViewportObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportObserver")
            .field("config", &self.shared.config)
            .field("snapshot", &self.snapshot())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

fn remeasure_handler(weak: Weak<ObserverShared>) -> impl Fn() + 'static {
    move || {
        if let Some(shared) = weak.upgrade() {
            shared.remeasure();
        }
    }
}

/// Keeps a subscriber registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: BoxWatcherGuard,
}

impl Subscription {
    /// Stops delivery to the subscriber.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
