//! Observer configuration.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ViewportError;

/// Quiet period used when resize debouncing is enabled.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Delay between a toolbar state change and the follow-up remeasurement.
pub const TOOLBAR_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Height growth over the baseline, in CSS pixels, beyond which the toolbar is collapsed.
pub const TOOLBAR_COLLAPSE_THRESHOLD: f64 = 50.0;

/// Which pair of window dimensions a measurement reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureSource {
    /// `window.innerWidth` / `window.innerHeight`.
    #[default]
    Window,
    /// `documentElement.clientWidth` / `clientHeight`, which exclude scrollbars.
    /// Falls back to the window size when the client size is zero or unknown.
    DocumentClient,
}

/// Settings fixed for the lifetime of a [`ViewportObserver`](crate::ViewportObserver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportConfig {
    /// Coalesce bursts of resize events into a single trailing measurement.
    pub debounce_resize: bool,
    /// Inserted between `--` and `vw`/`vh` in the custom property names.
    pub variables_prefix: String,
    /// Which dimensions to measure.
    pub measure: MeasureSource,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            debounce_resize: true,
            variables_prefix: String::new(),
            measure: MeasureSource::Window,
        }
    }
}

impl ViewportConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object such as `{"debounceResize": false, "variablesPrefix": "app-"}`.
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Config`] when the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ViewportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enables or disables resize debouncing.
    #[must_use]
    pub const fn with_debounce_resize(mut self, debounce: bool) -> Self {
        self.debounce_resize = debounce;
        self
    }

    /// Sets the custom property prefix.
    #[must_use]
    pub fn with_variables_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.variables_prefix = prefix.into();
        self
    }

    /// Sets the measurement source.
    #[must_use]
    pub const fn with_measure(mut self, measure: MeasureSource) -> Self {
        self.measure = measure;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ViewportConfig::default();
        assert!(config.debounce_resize);
        assert_eq!(config.variables_prefix, "");
        assert_eq!(config.measure, MeasureSource::Window);
    }

    #[test]
    fn parses_camel_case_json_with_defaults() {
        let config = ViewportConfig::from_json(r#"{"variablesPrefix":"app-"}"#).unwrap();
        assert_eq!(config.variables_prefix, "app-");
        assert!(config.debounce_resize);

        let config =
            ViewportConfig::from_json(r#"{"debounceResize":false,"measure":"documentClient"}"#)
                .unwrap();
        assert!(!config.debounce_resize);
        assert_eq!(config.measure, MeasureSource::DocumentClient);
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let err = ViewportConfig::from_json(r#"{"debounceResize":"yes"}"#).unwrap_err();
        assert!(matches!(err, ViewportError::Config(_)));
    }
}
