#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Web/WASM backend for `real-viewport`.
//!
//! This crate implements the host capabilities of `real-viewport-core` on top of
//! `web-sys`: [`BrowserWindow`] for measurement and listeners, [`DocumentRoot`]
//! as the style sink, and [`WindowScheduler`] for timers. [`RealViewport`] is the
//! `wasm-bindgen` entry point used from JavaScript.
//!
//! Outside of `wasm32` targets [`browser_host`] reports
//! [`WebError::Unsupported`] and [`RealViewport`] falls back to an inert
//! observer, so server-side rendering code can construct it safely.

mod app;
mod dom;
mod error;
mod timer;
mod window;

pub use app::{
    RealViewport, RealViewportBuilder, ViewportSubscription, apply_height_box, apply_width_box,
    bootstrap_script, browser_host, full_height_css, full_width_css,
};
pub use dom::{DocumentRoot, apply_declarations};
pub use error::WebError;
pub use timer::WindowScheduler;
pub use window::BrowserWindow;
