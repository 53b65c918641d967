#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod logging;

pub mod prelude {
    //! A collection of commonly used types for easy importing.
    //!
    //! ```rust
    //! use real_viewport::prelude::*;
    //!
    //! let config = ViewportConfig::default().with_variables_prefix("app-");
    //! let observer = ViewportObserver::unavailable(config);
    //! assert_eq!(observer.snapshot(), ViewportSnapshot::default());
    //! ```
    pub use real_viewport_core::{
        Host, MeasureSource, Subscription, ViewportConfig, ViewportError, ViewportObserver,
        ViewportScope, ViewportSnapshot, ViewportUnits, try_use_real_viewport, use_real_viewport,
    };
}

#[doc(inline)]
pub use real_viewport_core::*;

/// Timer scheduling and debouncing.
pub use real_viewport_debounce as debounce;

/// Reactive primitives backing [`ViewportObserver::subscribe`].
pub use nami as reactive;

pub use tracing as log;
