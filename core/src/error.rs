use thiserror::Error;

/// Errors produced while observing the viewport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// Viewport values were read outside of an active [`ViewportScope`](crate::ViewportScope).
    #[error("use_real_viewport must be called inside an active viewport scope")]
    ContextMisuse,
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    #[error("DOM is not available")]
    EnvironmentUnavailable,
    /// A host call (measurement or style write) threw.
    #[error("host error: {0}")]
    Host(String),
    /// The configuration could not be parsed.
    #[error("invalid viewport configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ViewportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}
