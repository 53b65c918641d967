use crate::error::WebError;

use real_viewport_core::{StyleDeclaration, StyleSink, ViewportError, WindowSize};

use wasm_bindgen::{JsCast, JsValue};

use web_sys::{Document, HtmlElement, Window};

/// The document root element, whose inline style carries the viewport properties.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    document: Document,
    element: HtmlElement,
}

impl DocumentRoot {
    /// Resolves `document.documentElement` for the given window.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] when the window has no document or the
    /// document has no root element.
    pub fn new(window: &Window) -> Result<Self, WebError> {
        let document: Document = window.document().ok_or(WebError::DomUnavailable)?;
        let element = document
            .document_element()
            .ok_or(WebError::DomUnavailable)?
            .dyn_into::<HtmlElement>()
            .map_err(|e| WebError::from(JsValue::from(e)))?;
        Ok(Self { document, element })
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the root element.
    #[must_use]
    pub const fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// `clientWidth` / `clientHeight` of the root element.
    #[must_use]
    pub fn client_size(&self) -> WindowSize {
        WindowSize::new(
            f64::from(self.element.client_width()),
            f64::from(self.element.client_height()),
        )
    }
}

impl StyleSink for DocumentRoot {
    fn set_property(&self, name: &str, value: &str) -> Result<(), ViewportError> {
        self.element
            .style()
            .set_property(name, value)
            .map_err(|e| WebError::from(e).into())
    }
}

/// Writes `declarations` onto an element's inline style.
///
/// # Errors
///
/// Returns an error if the style engine rejects a declaration.
pub fn apply_declarations(
    element: &HtmlElement,
    declarations: &[StyleDeclaration],
) -> Result<(), WebError> {
    let style = element.style();
    for declaration in declarations {
        style.set_property(declaration.property, &declaration.value)?;
    }
    Ok(())
}
