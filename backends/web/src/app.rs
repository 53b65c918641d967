use real_viewport_core::{
    CssVariableNames, Host, Subscription, ViewportConfig, ViewportHeightBox, ViewportObserver,
    ViewportSnapshot, ViewportWidthBox,
};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::{dom, error::WebError};

/// Builds a [`Host`] over the current browser window.
///
/// # Errors
///
/// Returns [`WebError::DomUnavailable`] when there is no `window` or `document`.
#[cfg(target_arch = "wasm32")]
pub fn browser_host() -> Result<Host, WebError> {
    use std::rc::Rc;

    use crate::{timer::WindowScheduler, window::BrowserWindow};

    let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
    let browser = Rc::new(BrowserWindow::new(window.clone())?);
    let style = Rc::new(browser.root().clone());
    let scheduler = Rc::new(WindowScheduler::new(window));
    Ok(Host::new(browser, style, scheduler))
}

/// Builds a [`Host`] over the current browser window.
///
/// # Errors
///
/// Always returns [`WebError::Unsupported`] outside of `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
#[allow(clippy::missing_const_for_fn)]
pub fn browser_host() -> Result<Host, WebError> {
    Err(WebError::Unsupported)
}

/// Builder for [`RealViewport`].
#[derive(Debug, Default, Clone)]
pub struct RealViewportBuilder {
    config: ViewportConfig,
}

impl RealViewportBuilder {
    /// Creates a new builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: ViewportConfig) -> Self {
        self.config = config;
        self
    }

    /// Controls whether resize events are debounced.
    #[must_use]
    pub fn debounce_resize(mut self, debounce: bool) -> Self {
        self.config.debounce_resize = debounce;
        self
    }

    /// Sets the custom property prefix.
    #[must_use]
    pub fn variables_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.variables_prefix = prefix.into();
        self
    }

    /// Finalises the builder and starts observing.
    ///
    /// Outside a browser the observer is inert instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial measurement throws.
    pub fn build(self) -> Result<RealViewport, WebError> {
        let observer = match browser_host() {
            Ok(host) => ViewportObserver::start(host, self.config)?,
            Err(WebError::DomUnavailable | WebError::Unsupported) => {
                ViewportObserver::unavailable(self.config)
            }
            Err(err) => return Err(err),
        };
        Ok(RealViewport { observer })
    }
}

/// Entry point for using the viewport observer from JavaScript.
#[wasm_bindgen]
#[derive(Debug)]
pub struct RealViewport {
    observer: ViewportObserver,
}

impl RealViewport {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> RealViewportBuilder {
        RealViewportBuilder::new()
    }

    /// Provides access to the underlying observer.
    #[must_use]
    pub const fn observer(&self) -> &ViewportObserver {
        &self.observer
    }
}

#[wasm_bindgen]
impl RealViewport {
    /// Starts observing. `config` is an optional JSON object with `debounceResize`,
    /// `variablesPrefix` and `measure`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is malformed or the initial measurement throws.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<Self, WebError> {
        console_error_panic_hook::set_once();
        let config = match config.as_deref() {
            Some(json) => ViewportConfig::from_json(json)?,
            None => ViewportConfig::default(),
        };
        RealViewportBuilder::new().with_config(config).build()
    }

    /// One hundredth of the viewport width, in CSS pixels.
    #[wasm_bindgen(getter, js_name = widthUnit)]
    #[must_use]
    pub fn width_unit(&self) -> Option<f64> {
        self.observer.snapshot().width_unit
    }

    /// One hundredth of the viewport height, in CSS pixels.
    #[wasm_bindgen(getter, js_name = heightUnit)]
    #[must_use]
    pub fn height_unit(&self) -> Option<f64> {
        self.observer.snapshot().height_unit
    }

    /// Whether the iOS Safari toolbar is collapsed; `undefined` elsewhere.
    #[wasm_bindgen(getter, js_name = isToolbarHidden)]
    #[must_use]
    pub fn is_toolbar_hidden(&self) -> Option<bool> {
        self.observer.snapshot().is_toolbar_hidden
    }

    /// Calls `callback` with `{ widthUnit, heightUnit, isToolbarHidden }` after every publish.
    #[must_use]
    pub fn subscribe(&self, callback: js_sys::Function) -> ViewportSubscription {
        let subscription = self.observer.subscribe(move |snapshot| {
            if let Err(err) = callback.call1(&JsValue::NULL, &snapshot_to_js(snapshot)) {
                tracing::error!(?err, "viewport subscriber threw");
            }
        });
        ViewportSubscription {
            subscription: Some(subscription),
        }
    }

    /// Remeasures immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the measurement throws.
    #[wasm_bindgen(js_name = measureNow)]
    pub fn measure_now(&self) -> Result<(), WebError> {
        self.observer.measure_now()?;
        Ok(())
    }

    /// Removes every listener and cancels pending timers.
    pub fn teardown(&self) {
        self.observer.teardown();
    }
}

/// Handle returned by [`RealViewport::subscribe`].
#[wasm_bindgen]
#[derive(Debug)]
pub struct ViewportSubscription {
    subscription: Option<Subscription>,
}

#[wasm_bindgen]
impl ViewportSubscription {
    /// Stops delivery. Calling it twice is harmless.
    pub fn unsubscribe(&mut self) {
        self.subscription.take();
    }
}

fn snapshot_to_js(snapshot: ViewportSnapshot) -> JsValue {
    let object = js_sys::Object::new();
    let fields = [
        ("widthUnit", snapshot.width_unit.map_or(JsValue::UNDEFINED, JsValue::from_f64)),
        ("heightUnit", snapshot.height_unit.map_or(JsValue::UNDEFINED, JsValue::from_f64)),
        ("isToolbarHidden", snapshot.is_toolbar_hidden.map_or(JsValue::UNDEFINED, JsValue::from_bool)),
    ];
    for (key, value) in fields {
        let _ = js_sys::Reflect::set(&object, &JsValue::from_str(key), &value);
    }
    object.into()
}

/// The inline `<head>` script that seeds the properties before the module loads.
///
/// # Errors
///
/// Returns an error if `config` is malformed JSON.
#[wasm_bindgen(js_name = bootstrapScript)]
pub fn bootstrap_script(config: Option<String>) -> Result<String, WebError> {
    let config = match config.as_deref() {
        Some(json) => ViewportConfig::from_json(json)?,
        None => ViewportConfig::default(),
    };
    Ok(real_viewport_core::bootstrap_script(&config))
}

/// `calc(var(--{prefix}vw) * 100)`.
#[wasm_bindgen(js_name = fullWidthCss)]
#[must_use]
pub fn full_width_css(prefix: Option<String>) -> String {
    CssVariableNames::new(prefix.as_deref().unwrap_or_default()).full_width_css()
}

/// `calc(var(--{prefix}vh) * 100)`.
#[wasm_bindgen(js_name = fullHeightCss)]
#[must_use]
pub fn full_height_css(prefix: Option<String>) -> String {
    CssVariableNames::new(prefix.as_deref().unwrap_or_default()).full_height_css()
}

/// Sizes `element` to the viewport width.
///
/// # Errors
///
/// Returns an error if the style engine rejects a declaration.
#[wasm_bindgen(js_name = applyWidthBox)]
pub fn apply_width_box(
    element: &HtmlElement,
    center: Option<bool>,
    use_native_values: Option<bool>,
    prefix: Option<String>,
) -> Result<(), WebError> {
    let defaults = ViewportWidthBox::default();
    let declarations = ViewportWidthBox::new()
        .center(center.unwrap_or(defaults.center))
        .use_native_values(use_native_values.unwrap_or(defaults.use_native_values))
        .declarations(&CssVariableNames::new(prefix.as_deref().unwrap_or_default()));
    dom::apply_declarations(element, &declarations)
}

/// Sizes `element` to the viewport height.
///
/// # Errors
///
/// Returns an error if the style engine rejects a declaration.
#[wasm_bindgen(js_name = applyHeightBox)]
pub fn apply_height_box(element: &HtmlElement, prefix: Option<String>) -> Result<(), WebError> {
    let declarations =
        ViewportHeightBox.declarations(&CssVariableNames::new(prefix.as_deref().unwrap_or_default()));
    dom::apply_declarations(element, &declarations)
}
