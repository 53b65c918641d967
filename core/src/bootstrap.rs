//! Inline script that seeds the custom properties before the wasm module loads.
//!
//! Placed in `<head>`, it runs before first paint so boxes sized by `--vw`/`--vh`
//! do not flash at zero size. The observer overwrites the values once it starts.

use crate::config::{MeasureSource, ViewportConfig};
use crate::style::CssVariableNames;

/// Returns a self-invoking script that writes both properties once.
#[must_use]
pub fn bootstrap_script(config: &ViewportConfig) -> String {
    let names = CssVariableNames::new(&config.variables_prefix);
    let (width, height) = match config.measure {
        MeasureSource::Window => ("window.innerWidth", "window.innerHeight"),
        MeasureSource::DocumentClient => (
            "(d.clientWidth || window.innerWidth)",
            "(d.clientHeight || window.innerHeight)",
        ),
    };
    format!(
        "(function() {{\
var d = document.documentElement;\
d.style.setProperty('{vw}', {width} / 100 + 'px');\
d.style.setProperty('{vh}', {height} / 100 + 'px');\
}}())",
        vw = escape_js_string(names.width()),
        vh = escape_js_string(names.height()),
    )
}

/// Escapes `value` for a single-quoted JS string inside an inline `<script>`.
fn escape_js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '<' => escaped.push_str("\\u003c"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            other => escaped.push(other),
        }
    }
    escaped
}
