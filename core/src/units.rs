//! Viewport unit values.

use crate::host::WindowSize;

/// One hundredth of the measured viewport width and height, in CSS pixels.
///
/// Both fields are `None` until the first measurement, and stay `None` when no
/// browser environment exists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportUnits {
    /// `1vw` equivalent.
    pub width_unit: Option<f64>,
    /// `1vh` equivalent.
    pub height_unit: Option<f64>,
}

impl ViewportUnits {
    /// Derives units from a window size: 1% of each dimension, rounded to 4 decimals.
    #[must_use]
    pub fn from_size(size: WindowSize) -> Self {
        Self {
            width_unit: Some(percent_of(size.width)),
            height_unit: Some(percent_of(size.height)),
        }
    }

    /// Whether a measurement has been taken.
    #[must_use]
    pub const fn is_measured(&self) -> bool {
        self.width_unit.is_some() && self.height_unit.is_some()
    }
}

/// What subscribers see after every publish.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportSnapshot {
    /// `1vw` equivalent in CSS pixels.
    pub width_unit: Option<f64>,
    /// `1vh` equivalent in CSS pixels.
    pub height_unit: Option<f64>,
    /// `Some(true)` while the iOS Safari toolbar is collapsed, `Some(false)` while
    /// it is expanded, `None` on other platforms or before the first scroll.
    pub is_toolbar_hidden: Option<bool>,
}

impl ViewportSnapshot {
    /// The unit pair without the toolbar state.
    #[must_use]
    pub const fn units(&self) -> ViewportUnits {
        ViewportUnits {
            width_unit: self.width_unit,
            height_unit: self.height_unit,
        }
    }

    #[must_use]
    pub(crate) const fn with_units(mut self, units: ViewportUnits) -> Self {
        self.width_unit = units.width_unit;
        self.height_unit = units.height_unit;
        self
    }

    #[must_use]
    pub(crate) const fn with_toolbar(mut self, hidden: Option<bool>) -> Self {
        self.is_toolbar_hidden = hidden;
        self
    }
}

fn percent_of(pixels: f64) -> f64 {
    round4(pixels * 0.01)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
