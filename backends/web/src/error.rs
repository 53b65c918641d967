use real_viewport_core::ViewportError;
use thiserror::Error;

/// Error type produced by the web backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    #[error("DOM is not available")]
    DomUnavailable,
    /// The feature is currently unsupported on the active target.
    #[error("real-viewport web backend requires the wasm32 target")]
    Unsupported,
    /// Wrapper around JavaScript exceptions.
    #[error("JavaScript error: {0}")]
    Js(String),
    /// Error raised by the viewport observer.
    #[error(transparent)]
    Viewport(ViewportError),
}

impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<ViewportError> for WebError {
    fn from(value: ViewportError) -> Self {
        match value {
            ViewportError::EnvironmentUnavailable => Self::DomUnavailable,
            other => Self::Viewport(other),
        }
    }
}

impl From<WebError> for ViewportError {
    fn from(value: WebError) -> Self {
        match value {
            WebError::DomUnavailable | WebError::Unsupported => Self::EnvironmentUnavailable,
            WebError::Js(msg) => Self::Host(msg),
            WebError::Viewport(err) => err,
        }
    }
}

impl From<WebError> for wasm_bindgen::JsValue {
    fn from(value: WebError) -> Self {
        Self::from(value.to_string())
    }
}
