//! End-to-end observer behavior against an in-memory host.
//!
//! These tests drive the observer through a fake window, the in-memory style sink
//! and the manual clock, and check both output channels after every step.

use core::cell::{Cell, RefCell};
use core::time::Duration;

use std::rc::Rc;

use real_viewport_debounce::ManualScheduler;

use crate::{
    EventHandler, Host, HostEvent, ListenerId, MeasureSource, MemoryStyleSink,
    PlatformCapability, StyleSink, ToolbarHeuristic, ViewportConfig, ViewportError, ViewportObserver,
    ViewportSnapshot, WindowHost, WindowSize, try_use_real_viewport, use_real_viewport,
};

// ============================================================================
// Test Infrastructure
// ============================================================================

const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// A window whose size, user agent and events are driven by the test.
struct FakeWindow {
    size: Cell<WindowSize>,
    client: Cell<Option<WindowSize>>,
    user_agent: String,
    standalone: bool,
    fail_measure: Cell<bool>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, HostEvent, EventHandler)>>,
}

impl FakeWindow {
    fn new(width: f64, height: f64, user_agent: &str, standalone: bool) -> Self {
        Self {
            size: Cell::new(WindowSize::new(width, height)),
            client: Cell::new(None),
            user_agent: user_agent.to_owned(),
            standalone,
            fail_measure: Cell::new(false),
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    fn dispatch(&self, event: HostEvent) {
        let handlers: Vec<EventHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, registered, _)| *registered == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler();
        }
    }

    fn resize(&self, width: f64, height: f64) {
        self.size.set(WindowSize::new(width, height));
        self.dispatch(HostEvent::Resize);
    }

    fn scroll_with_height(&self, height: f64) {
        let width = self.size.get().width;
        self.size.set(WindowSize::new(width, height));
        self.dispatch(HostEvent::Scroll);
    }

    fn listener_count(&self, event: HostEvent) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, registered, _)| *registered == event)
            .count()
    }
}

impl WindowHost for FakeWindow {
    fn inner_size(&self) -> Result<WindowSize, ViewportError> {
        if self.fail_measure.get() {
            return Err(ViewportError::Host("innerWidth threw".into()));
        }
        Ok(self.size.get())
    }

    fn client_size(&self) -> Option<WindowSize> {
        self.client.get()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn is_standalone(&self) -> bool {
        self.standalone
    }

    fn add_listener(&self, event: HostEvent, handler: EventHandler) -> ListenerId {
        let id = ListenerId::from_raw(self.next_id.get());
        self.next_id.set(id.into_raw() + 1);
        self.listeners.borrow_mut().push((id, event, handler));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(registered, _, _)| *registered != id);
    }
}

/// An in-memory sink that rejects writes to one property on demand.
#[derive(Default)]
struct RejectingSink {
    inner: MemoryStyleSink,
    reject: Cell<Option<&'static str>>,
}

impl StyleSink for RejectingSink {
    fn set_property(&self, name: &str, value: &str) -> Result<(), ViewportError> {
        if self.reject.get() == Some(name) {
            return Err(ViewportError::Host(format!("{name} rejected")));
        }
        self.inner.set_property(name, value)
    }
}

struct Fixture {
    window: Rc<FakeWindow>,
    style: Rc<MemoryStyleSink>,
    clock: Rc<ManualScheduler>,
}

impl Fixture {
    fn new(width: f64, height: f64) -> Self {
        Self::with_agent(width, height, DESKTOP_CHROME, false)
    }

    fn with_agent(width: f64, height: f64, user_agent: &str, standalone: bool) -> Self {
        Self {
            window: Rc::new(FakeWindow::new(width, height, user_agent, standalone)),
            style: Rc::new(MemoryStyleSink::new()),
            clock: Rc::new(ManualScheduler::new()),
        }
    }

    fn host(&self) -> Host {
        Host::new(self.window.clone(), self.style.clone(), self.clock.clone())
    }

    fn start(&self, config: ViewportConfig) -> ViewportObserver {
        ViewportObserver::start(self.host(), config).unwrap()
    }

    fn css(&self, name: &str) -> Option<String> {
        self.style.get(name)
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn record(observer: &ViewportObserver) -> (crate::Subscription, Rc<RefCell<Vec<ViewportSnapshot>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let subscription = observer.subscribe({
        let seen = Rc::clone(&seen);
        move |snapshot| seen.borrow_mut().push(snapshot)
    });
    (subscription, seen)
}

// ============================================================================
// Measurement & publishing
// ============================================================================

#[test]
fn publishes_initial_measurement_before_any_event() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());

    assert_eq!(fixture.css("--vw").as_deref(), Some("4px"));
    assert_eq!(fixture.css("--vh").as_deref(), Some("8px"));
    assert_eq!(observer.units().width_unit, Some(4.0));
    assert_eq!(observer.units().height_unit, Some(8.0));
    assert_eq!(fixture.style.write_count(), 2);
}

#[test]
fn debounced_resize_applies_after_the_window() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());

    fixture.window.resize(390.0, 844.0);
    fixture.clock.advance(ms(249));
    assert_eq!(fixture.css("--vw").as_deref(), Some("4px"));
    assert!(observer.has_pending_resize());

    fixture.clock.advance(ms(1));
    assert_eq!(fixture.css("--vw").as_deref(), Some("3.9px"));
    assert_eq!(fixture.css("--vh").as_deref(), Some("8.44px"));
    assert_eq!(observer.units().width_unit, Some(3.9));
    assert_eq!(observer.units().height_unit, Some(8.44));
}

#[test]
fn burst_publishes_once_with_last_dimensions() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());
    let (_subscription, seen) = record(&observer);

    for (width, height) in [(380.0, 700.0), (500.0, 900.0), (320.0, 640.0)] {
        fixture.window.resize(width, height);
        fixture.clock.advance(ms(100));
    }
    fixture.clock.advance(ms(250));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].width_unit, Some(3.2));
    assert_eq!(seen[0].height_unit, Some(6.4));
}

#[test]
fn spaced_resizes_publish_once_each() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());
    let (_subscription, seen) = record(&observer);

    for width in [300.0, 310.0, 320.0] {
        fixture.window.resize(width, 800.0);
        fixture.clock.advance(ms(300));
    }

    let widths: Vec<_> = seen.borrow().iter().map(|s| s.width_unit).collect();
    assert_eq!(widths, [Some(3.0), Some(3.1), Some(3.2)]);
}

#[test]
fn undebounced_resize_publishes_every_event_immediately() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default().with_debounce_resize(false));
    let (_subscription, seen) = record(&observer);

    fixture.window.resize(300.0, 600.0);
    assert_eq!(fixture.css("--vw").as_deref(), Some("3px"));
    fixture.window.resize(310.0, 620.0);
    assert_eq!(fixture.css("--vw").as_deref(), Some("3.1px"));

    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(fixture.clock.pending(), 0);
}

#[test]
fn orientation_change_remeasures() {
    let fixture = Fixture::new(400.0, 800.0);
    let _observer = fixture.start(ViewportConfig::default().with_debounce_resize(false));

    fixture.window.size.set(WindowSize::new(800.0, 400.0));
    fixture.window.dispatch(HostEvent::OrientationChange);

    assert_eq!(fixture.css("--vw").as_deref(), Some("8px"));
    assert_eq!(fixture.css("--vh").as_deref(), Some("4px"));
}

#[test]
fn style_is_written_before_subscribers_run() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());
    let mismatches = Rc::new(Cell::new(0));
    let _subscription = observer.subscribe({
        let style = Rc::clone(&fixture.style);
        let mismatches = Rc::clone(&mismatches);
        move |snapshot| {
            let expected = snapshot.width_unit.map(|unit| format!("{unit}px"));
            if style.get("--vw") != expected {
                mismatches.set(mismatches.get() + 1);
            }
        }
    });

    for width in [333.333, 412.0, 1024.5] {
        fixture.window.resize(width, 700.0);
        fixture.clock.advance(ms(250));
    }
    assert_eq!(mismatches.get(), 0);
}

#[test]
fn prefix_changes_property_names() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default().with_variables_prefix("app-"));

    assert_eq!(fixture.css("--app-vw").as_deref(), Some("4px"));
    assert_eq!(fixture.css("--app-vh").as_deref(), Some("8px"));
    assert_eq!(fixture.css("--vw"), None);
    assert_eq!(observer.variable_names().width(), "--app-vw");
}

#[test]
fn document_client_measurement_falls_back_per_dimension() {
    let fixture = Fixture::new(400.0, 800.0);
    fixture.window.client.set(Some(WindowSize::new(385.0, 0.0)));
    let observer =
        fixture.start(ViewportConfig::default().with_measure(MeasureSource::DocumentClient));

    assert_eq!(observer.units().width_unit, Some(3.85));
    assert_eq!(observer.units().height_unit, Some(8.0));
}

#[test]
fn failed_initial_measurement_propagates() {
    let fixture = Fixture::new(400.0, 800.0);
    fixture.window.fail_measure.set(true);

    let result = ViewportObserver::start(fixture.host(), ViewportConfig::default());
    assert!(matches!(result, Err(ViewportError::Host(_))));
    assert_eq!(fixture.style.write_count(), 0);
}

#[test]
fn failed_style_write_keeps_channels_in_sync() {
    let window = Rc::new(FakeWindow::new(400.0, 800.0, DESKTOP_CHROME, false));
    let style = Rc::new(RejectingSink::default());
    let host = Host::new(window.clone(), style.clone(), Rc::new(ManualScheduler::new()));
    let observer =
        ViewportObserver::start(host, ViewportConfig::default().with_debounce_resize(false))
            .unwrap();

    style.reject.set(Some("--vh"));
    window.resize(390.0, 844.0);
    assert_eq!(style.inner.get("--vw").as_deref(), Some("4px"));
    assert_eq!(style.inner.get("--vh").as_deref(), Some("8px"));
    assert_eq!(observer.units().width_unit, Some(4.0));

    assert_eq!(
        observer.measure_now(),
        Err(ViewportError::Host("--vh rejected".into()))
    );
    assert_eq!(style.inner.get("--vw").as_deref(), Some("4px"));

    style.reject.set(None);
    observer.measure_now().unwrap();
    assert_eq!(style.inner.get("--vw").as_deref(), Some("3.9px"));
    assert_eq!(observer.units().height_unit, Some(8.44));
}

#[test]
fn measure_now_bypasses_debounce() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());

    fixture.window.size.set(WindowSize::new(500.0, 500.0));
    let units = observer.measure_now().unwrap();
    assert_eq!(units.width_unit, Some(5.0));
    assert_eq!(fixture.css("--vh").as_deref(), Some("5px"));
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default().with_debounce_resize(false));
    let (subscription, seen) = record(&observer);

    fixture.window.resize(300.0, 600.0);
    subscription.unsubscribe();
    fixture.window.resize(310.0, 620.0);

    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(observer.units().width_unit, Some(3.1));
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn teardown_cancels_pending_resize() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());
    let writes = fixture.style.write_count();

    fixture.window.resize(390.0, 844.0);
    observer.teardown();
    fixture.clock.advance(ms(1000));

    assert_eq!(fixture.style.write_count(), writes);
    assert_eq!(fixture.css("--vw").as_deref(), Some("4px"));
    assert_eq!(observer.units().width_unit, Some(4.0));
    assert_eq!(fixture.clock.pending(), 0);
    assert_eq!(fixture.window.listener_count(HostEvent::Resize), 0);
    assert_eq!(fixture.window.listener_count(HostEvent::OrientationChange), 0);
    assert!(!observer.is_active());
}

#[test]
fn dropping_the_observer_removes_listeners() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());
    assert_eq!(fixture.window.listener_count(HostEvent::Resize), 1);

    fixture.window.resize(390.0, 844.0);
    drop(observer);
    fixture.clock.advance(ms(1000));

    assert_eq!(fixture.window.listener_count(HostEvent::Resize), 0);
    assert_eq!(fixture.css("--vw").as_deref(), Some("4px"));
}

#[test]
fn teardown_is_idempotent_and_freezes_measure_now() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());

    observer.teardown();
    observer.teardown();
    fixture.window.size.set(WindowSize::new(100.0, 100.0));

    assert_eq!(observer.measure_now().unwrap().width_unit, Some(4.0));
    assert_eq!(fixture.style.write_count(), 2);
}

// ============================================================================
// Toolbar heuristic
// ============================================================================

#[test]
fn ios_safari_scroll_growth_collapses_toolbar() {
    let fixture = Fixture::with_agent(390.0, 664.0, IPHONE_SAFARI, false);
    let observer = fixture.start(ViewportConfig::default());
    let (_subscription, seen) = record(&observer);

    assert_eq!(observer.snapshot().is_toolbar_hidden, None);
    assert_eq!(fixture.window.listener_count(HostEvent::Scroll), 1);

    fixture.window.scroll_with_height(745.0);
    assert_eq!(observer.snapshot().is_toolbar_hidden, Some(true));
    assert_eq!(seen.borrow().last().unwrap().is_toolbar_hidden, Some(true));
    // Units are untouched until the settle delay elapses.
    assert_eq!(fixture.css("--vh").as_deref(), Some("6.64px"));

    fixture.clock.advance(ms(200));
    assert_eq!(fixture.css("--vh").as_deref(), Some("7.45px"));
    assert_eq!(observer.units().height_unit, Some(7.45));
}

#[test]
fn growth_at_threshold_keeps_toolbar_visible() {
    let fixture = Fixture::with_agent(390.0, 664.0, IPHONE_SAFARI, false);
    let observer = fixture.start(ViewportConfig::default());

    fixture.window.scroll_with_height(714.0);
    assert_eq!(observer.snapshot().is_toolbar_hidden, Some(false));

    fixture.window.scroll_with_height(714.5);
    assert_eq!(observer.snapshot().is_toolbar_hidden, Some(true));

    fixture.window.scroll_with_height(664.0);
    assert_eq!(observer.snapshot().is_toolbar_hidden, Some(false));
}

#[test]
fn repeated_flips_settle_once() {
    let fixture = Fixture::with_agent(390.0, 664.0, IPHONE_SAFARI, false);
    let observer = fixture.start(ViewportConfig::default());
    let writes = fixture.style.write_count();

    fixture.window.scroll_with_height(745.0);
    fixture.clock.advance(ms(100));
    fixture.window.scroll_with_height(664.0);
    fixture.clock.advance(ms(100));
    assert_eq!(fixture.style.write_count(), writes);

    fixture.clock.advance(ms(100));
    assert_eq!(fixture.style.write_count(), writes + 2);
    assert_eq!(observer.snapshot().is_toolbar_hidden, Some(false));
}

#[test]
fn unchanged_state_does_not_republish() {
    let fixture = Fixture::with_agent(390.0, 664.0, IPHONE_SAFARI, false);
    let observer = fixture.start(ViewportConfig::default());
    let (_subscription, seen) = record(&observer);

    fixture.window.scroll_with_height(745.0);
    fixture.window.scroll_with_height(760.0);
    fixture.window.scroll_with_height(800.0);

    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn non_ios_agents_never_track_the_toolbar() {
    let fixture = Fixture::with_agent(390.0, 664.0, DESKTOP_CHROME, false);
    let observer = fixture.start(ViewportConfig::default());

    assert_eq!(fixture.window.listener_count(HostEvent::Scroll), 0);
    fixture.window.scroll_with_height(900.0);
    assert_eq!(observer.snapshot().is_toolbar_hidden, None);
}

#[test]
fn standalone_mode_is_hidden_without_listening() {
    let fixture = Fixture::with_agent(390.0, 844.0, IPHONE_SAFARI, true);
    let observer = fixture.start(ViewportConfig::default());

    assert_eq!(observer.snapshot().is_toolbar_hidden, Some(true));
    assert_eq!(fixture.window.listener_count(HostEvent::Scroll), 0);
}

#[test]
fn heuristic_reports_capability_and_baseline() {
    let fixture = Fixture::with_agent(390.0, 664.0, IPHONE_SAFARI, false);
    let flips = Rc::new(RefCell::new(Vec::new()));
    let settled = Rc::new(Cell::new(0));
    let heuristic = ToolbarHeuristic::activate(
        &fixture.host(),
        {
            let flips = Rc::clone(&flips);
            move |hidden| flips.borrow_mut().push(hidden)
        },
        {
            let settled = Rc::clone(&settled);
            move || settled.set(settled.get() + 1)
        },
    )
    .unwrap();

    assert_eq!(heuristic.capability(), PlatformCapability::IosSafari);
    assert!((heuristic.baseline_height() - 664.0).abs() < f64::EPSILON);
    assert!(heuristic.is_listening());

    fixture.window.scroll_with_height(745.0);
    fixture.clock.advance(ms(200));
    assert_eq!(&*flips.borrow(), &[true]);
    assert_eq!(settled.get(), 1);

    heuristic.deactivate();
    assert!(!heuristic.is_listening());
    fixture.window.scroll_with_height(664.0);
    assert_eq!(&*flips.borrow(), &[true]);
}

#[test]
fn teardown_cancels_pending_settle() {
    let fixture = Fixture::with_agent(390.0, 664.0, IPHONE_SAFARI, false);
    let observer = fixture.start(ViewportConfig::default());
    let writes = fixture.style.write_count();

    fixture.window.scroll_with_height(745.0);
    observer.teardown();
    fixture.clock.advance(ms(1000));

    assert_eq!(fixture.style.write_count(), writes);
    assert_eq!(fixture.window.listener_count(HostEvent::Scroll), 0);
    assert_eq!(fixture.clock.pending(), 0);
}

// ============================================================================
// Environment & scopes
// ============================================================================

#[test]
fn unavailable_environment_is_inert() {
    let observer = ViewportObserver::unavailable(ViewportConfig::default());

    assert_eq!(observer.snapshot(), ViewportSnapshot::default());
    assert_eq!(observer.measure_now(), Ok(observer.units()));
    assert!(!observer.is_active());
    observer.teardown();
}

#[test]
fn scope_exposes_live_values() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default().with_debounce_resize(false));
    let scope = observer.provide();

    assert_eq!(use_real_viewport().width_unit, Some(4.0));
    fixture.window.resize(390.0, 844.0);
    assert_eq!(use_real_viewport().height_unit, Some(8.44));

    drop(scope);
    assert_eq!(try_use_real_viewport(), Err(ViewportError::ContextMisuse));
}

#[test]
fn scope_fails_after_observer_teardown() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());
    let _scope = observer.provide();
    assert!(try_use_real_viewport().is_ok());

    observer.teardown();
    assert_eq!(try_use_real_viewport(), Err(ViewportError::ContextMisuse));
}

#[test]
fn scope_fails_after_observer_drop() {
    let fixture = Fixture::new(400.0, 800.0);
    let observer = fixture.start(ViewportConfig::default());
    let _scope = observer.provide();

    drop(observer);
    assert_eq!(try_use_real_viewport(), Err(ViewportError::ContextMisuse));
}
