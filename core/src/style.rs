//! Custom property naming and an in-memory style sink.

use core::cell::{Cell, RefCell};
use core::fmt;

use std::collections::BTreeMap;

use crate::error::ViewportError;
use crate::host::StyleSink;

/// Name of the width custom property when no prefix is configured.
pub const VW_CSS_VAR: &str = "--vw";
/// Name of the height custom property when no prefix is configured.
pub const VH_CSS_VAR: &str = "--vh";

/// The pair of custom property names an observer writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssVariableNames {
    width: String,
    height: String,
}

impl CssVariableNames {
    /// Builds `--{prefix}vw` and `--{prefix}vh`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            width: format!("--{prefix}vw"),
            height: format!("--{prefix}vh"),
        }
    }

    /// The width property, e.g. `--vw`.
    #[must_use]
    pub fn width(&self) -> &str {
        &self.width
    }

    /// The height property, e.g. `--vh`.
    #[must_use]
    pub fn height(&self) -> &str {
        &self.height
    }

    /// `calc(var(--{prefix}vw) * 100)`, a drop-in for `100vw`.
    #[must_use]
    pub fn full_width_css(&self) -> String {
        format!("calc(var({}) * 100)", self.width)
    }

    /// `calc(var(--{prefix}vh) * 100)`, a drop-in for `100vh`.
    #[must_use]
    pub fn full_height_css(&self) -> String {
        format!("calc(var({}) * 100)", self.height)
    }
}

impl Default for CssVariableNames {
    fn default() -> Self {
        Self::new("")
    }
}

/// Formats a unit value as a CSS pixel length, e.g. `3.9px`.
#[must_use]
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}

/// A [`StyleSink`] that keeps properties in memory.
///
/// Useful for tests and for rendering outside a browser, where the collected
/// properties can be serialized into an inline `style` attribute.
#[derive(Default)]
pub struct MemoryStyleSink {
    properties: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStyleSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.properties.borrow().get(name).cloned()
    }

    /// Total number of `set_property` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Serializes the properties as `name: value;` declarations.
    #[must_use]
    pub fn to_inline_style(&self) -> String {
        self.properties
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl StyleSink for MemoryStyleSink {
    fn set_property(&self, name: &str, value: &str) -> Result<(), ViewportError> {
        self.properties
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl fmt::Debug for MemoryStyleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStyleSink")
            .field("properties", &self.properties.borrow())
            .field("writes", &self.write_count())
            .finish()
    }
}
