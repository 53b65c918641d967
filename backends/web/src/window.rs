use core::cell::{Cell, RefCell};
use core::fmt;

use std::collections::HashMap;

use real_viewport_core::{EventHandler, HostEvent, ListenerId, ViewportError, WindowHost, WindowSize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{EventTarget, Window};

use crate::dom::DocumentRoot;
use crate::error::WebError;

struct Registration {
    target: EventTarget,
    event: HostEvent,
    closure: Closure<dyn FnMut()>,
}

/// [`WindowHost`] over the real `window` and `document`.
///
/// `resize` and `orientationchange` listen on the window, `scroll` on the document.
pub struct BrowserWindow {
    window: Window,
    root: DocumentRoot,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, Registration>>,
}

impl BrowserWindow {
    /// Wraps `window` and resolves its document root.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] when the window has no document.
    pub fn new(window: Window) -> Result<Self, WebError> {
        let root = DocumentRoot::new(&window)?;
        Ok(Self {
            window,
            root,
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
        })
    }

    /// The document root this window measures and styles.
    #[must_use]
    pub const fn root(&self) -> &DocumentRoot {
        &self.root
    }

    fn target(&self, event: HostEvent) -> EventTarget {
        match event {
            HostEvent::Resize | HostEvent::OrientationChange => self.window.clone().into(),
            HostEvent::Scroll => self.root.document().clone().into(),
        }
    }
}

fn pixels(value: Result<JsValue, JsValue>, what: &str) -> Result<f64, ViewportError> {
    let value = value.map_err(WebError::from)?;
    value
        .as_f64()
        .ok_or_else(|| ViewportError::Host(format!("{what} is not a number")))
}

impl WindowHost for BrowserWindow {
    fn inner_size(&self) -> Result<WindowSize, ViewportError> {
        Ok(WindowSize::new(
            pixels(self.window.inner_width(), "innerWidth")?,
            pixels(self.window.inner_height(), "innerHeight")?,
        ))
    }

    fn client_size(&self) -> Option<WindowSize> {
        Some(self.root.client_size())
    }

    fn user_agent(&self) -> String {
        self.window.navigator().user_agent().unwrap_or_default()
    }

    fn is_standalone(&self) -> bool {
        let navigator = self.window.navigator();
        let legacy = js_sys::Reflect::get(&navigator, &JsValue::from_str("standalone"))
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        let display_mode = self
            .window
            .match_media("(display-mode: standalone)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches());
        legacy || display_mode
    }

    fn add_listener(&self, event: HostEvent, handler: EventHandler) -> ListenerId {
        let id = ListenerId::from_raw(self.next_id.get());
        self.next_id.set(id.into_raw() + 1);

        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let target = self.target(event);
        if let Err(err) =
            target.add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())
        {
            tracing::error!(%event, ?err, "failed to add event listener");
            return id;
        }
        self.listeners.borrow_mut().insert(
            id,
            Registration {
                target,
                event,
                closure,
            },
        );
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(registration) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(err) = registration.target.remove_event_listener_with_callback(
            registration.event.as_str(),
            registration.closure.as_ref().unchecked_ref(),
        ) {
            tracing::error!(event = %registration.event, ?err, "failed to remove event listener");
        }
    }
}

impl Drop for BrowserWindow {
    fn drop(&mut self) {
        for (_, registration) in self.listeners.borrow_mut().drain() {
            let _ = registration.target.remove_event_listener_with_callback(
                registration.event.as_str(),
                registration.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl fmt::Debug for BrowserWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserWindow")
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}
