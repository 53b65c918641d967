//! Inline styles for boxes sized by the viewport properties.

use core::fmt;

use crate::style::CssVariableNames;

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    /// CSS property name.
    pub property: &'static str,
    /// CSS value.
    pub value: String,
}

impl StyleDeclaration {
    fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property, self.value)
    }
}

/// A box exactly as wide as the visual viewport.
///
/// Centered boxes break out of their parent's horizontal padding by shifting
/// half their width back from the parent's midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWidthBox {
    /// Break out of the parent and center on the viewport.
    pub center: bool,
    /// Use the native `100vw` instead of the custom property.
    pub use_native_values: bool,
}

impl Default for ViewportWidthBox {
    fn default() -> Self {
        Self {
            center: true,
            use_native_values: false,
        }
    }
}

impl ViewportWidthBox {
    /// A centered box sized by the custom property.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`center`](Self::center).
    #[must_use]
    pub const fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Sets [`use_native_values`](Self::use_native_values).
    #[must_use]
    pub const fn use_native_values(mut self, native: bool) -> Self {
        self.use_native_values = native;
        self
    }

    /// The declarations to apply to the box element.
    #[must_use]
    pub fn declarations(&self, names: &CssVariableNames) -> Vec<StyleDeclaration> {
        let width = if self.use_native_values {
            "100vw".to_owned()
        } else {
            names.full_width_css()
        };
        let mut declarations = vec![StyleDeclaration::new("width", width)];
        if self.center {
            declarations.extend([
                StyleDeclaration::new("position", "relative"),
                StyleDeclaration::new("transform", "translateX(-50%)"),
                StyleDeclaration::new("left", "50%"),
            ]);
        }
        declarations
    }
}

/// A box exactly as tall as the visual viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportHeightBox;

impl ViewportHeightBox {
    /// The declarations to apply to the box element.
    #[must_use]
    pub fn declarations(self, names: &CssVariableNames) -> Vec<StyleDeclaration> {
        vec![StyleDeclaration::new("height", names.full_height_css())]
    }
}

/// Joins declarations into an inline `style` attribute value.
#[must_use]
pub fn inline_style(declarations: &[StyleDeclaration]) -> String {
    declarations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
