//! Capabilities the observer needs from its environment.
//!
//! The browser backend implements these on top of `web-sys`; tests implement
//! them in memory. Nothing in this crate touches a global.

use core::fmt;

use std::rc::Rc;

use real_viewport_debounce::Scheduler;

use crate::error::ViewportError;

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowSize {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl WindowSize {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Events the observer and the toolbar heuristic listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// Window `resize`.
    Resize,
    /// Window `orientationchange`.
    OrientationChange,
    /// Document `scroll`.
    Scroll,
}

impl HostEvent {
    /// The DOM event type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::OrientationChange => "orientationchange",
            Self::Scroll => "scroll",
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wraps a raw listener id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw listener id.
    #[must_use]
    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

/// Event handlers receive no payload; they re-read whatever they need from the host.
pub type EventHandler = Rc<dyn Fn()>;

/// Read access to the window plus listener registration.
pub trait WindowHost {
    /// `window.innerWidth` / `window.innerHeight`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Host`] if the host call throws.
    fn inner_size(&self) -> Result<WindowSize, ViewportError>;

    /// `documentElement.clientWidth` / `clientHeight`, if the host has a document element.
    fn client_size(&self) -> Option<WindowSize> {
        None
    }

    /// The navigator user agent string; empty when unknown.
    fn user_agent(&self) -> String;

    /// Whether the page runs as a home-screen (standalone) web app.
    fn is_standalone(&self) -> bool;

    /// Registers `handler` for `event` and returns an id for removal.
    fn add_listener(&self, event: HostEvent, handler: EventHandler) -> ListenerId;

    /// Removes a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Sink for global style properties, normally the document root's inline style.
pub trait StyleSink {
    /// Sets a single property.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Host`] if the style engine rejects the write.
    fn set_property(&self, name: &str, value: &str) -> Result<(), ViewportError>;
}

/// The bundle of capabilities an observer runs against.
#[derive(Clone)]
pub struct Host {
    window: Rc<dyn WindowHost>,
    style: Rc<dyn StyleSink>,
    scheduler: Rc<dyn Scheduler>,
}

impl Host {
    /// Bundles a window, a style sink and a timer facility.
    pub fn new(
        window: Rc<dyn WindowHost>,
        style: Rc<dyn StyleSink>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            window,
            style,
            scheduler,
        }
    }

    /// The window capability.
    #[must_use]
    pub fn window(&self) -> &Rc<dyn WindowHost> {
        &self.window
    }

    /// The style sink.
    #[must_use]
    pub fn style(&self) -> &Rc<dyn StyleSink> {
        &self.style
    }

    /// The timer facility.
    #[must_use]
    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
