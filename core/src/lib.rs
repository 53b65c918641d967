//! # Real Viewport Core
//!
//! Host-agnostic core of `real-viewport`. A [`ViewportObserver`] measures the
//! window, publishes one hundredth of its width and height as the CSS custom
//! properties `--{prefix}vw` / `--{prefix}vh`, and republishes the same values
//! to subscribers. On iOS Safari a [`ToolbarHeuristic`] additionally tracks the
//! collapsing bottom toolbar.
//!
//! Every environment capability is injected through [`Host`]: the window
//! ([`WindowHost`]), the style system ([`StyleSink`]) and a timer facility
//! ([`Scheduler`](real_viewport_debounce::Scheduler)). The browser backend
//! lives in `real-viewport-web`.
//!
//! ```
//! use std::rc::Rc;
//!
//! use real_viewport_core::{
//!     Host, HostEvent, ListenerId, MemoryStyleSink, ViewportConfig, ViewportError,
//!     ViewportObserver, WindowHost, WindowSize, EventHandler,
//! };
//! use real_viewport_debounce::ManualScheduler;
//!
//! struct Fixed;
//!
//! impl WindowHost for Fixed {
//!     fn inner_size(&self) -> Result<WindowSize, ViewportError> {
//!         Ok(WindowSize::new(400.0, 800.0))
//!     }
//!     fn user_agent(&self) -> String {
//!         String::new()
//!     }
//!     fn is_standalone(&self) -> bool {
//!         false
//!     }
//!     fn add_listener(&self, _: HostEvent, _: EventHandler) -> ListenerId {
//!         ListenerId::from_raw(0)
//!     }
//!     fn remove_listener(&self, _: ListenerId) {}
//! }
//!
//! let style = Rc::new(MemoryStyleSink::new());
//! let host = Host::new(Rc::new(Fixed), style.clone(), Rc::new(ManualScheduler::new()));
//! let observer = ViewportObserver::start(host, ViewportConfig::default())?;
//!
//! assert_eq!(style.get("--vw").as_deref(), Some("4px"));
//! assert_eq!(observer.units().height_unit, Some(8.0));
//! # Ok::<(), ViewportError>(())
//! ```

mod bootstrap;
mod boxes;
mod config;
mod error;
mod host;
mod observer;
mod platform;
mod scope;
mod style;
mod toolbar;
mod units;

#[cfg(test)]
mod tests;

pub use bootstrap::bootstrap_script;
pub use boxes::{StyleDeclaration, ViewportHeightBox, ViewportWidthBox, inline_style};
pub use config::{
    MeasureSource, RESIZE_DEBOUNCE, TOOLBAR_COLLAPSE_THRESHOLD, TOOLBAR_SETTLE_DELAY,
    ViewportConfig,
};
pub use error::ViewportError;
pub use host::{EventHandler, Host, HostEvent, ListenerId, StyleSink, WindowHost, WindowSize};
pub use observer::{Subscription, ViewportObserver};
pub use platform::{PlatformCapability, classify_platform};
pub use scope::{ViewportScope, try_use_real_viewport, use_real_viewport};
pub use style::{CssVariableNames, MemoryStyleSink, VH_CSS_VAR, VW_CSS_VAR, format_px};
pub use toolbar::ToolbarHeuristic;
pub use units::{ViewportSnapshot, ViewportUnits};
