//! Two-point distance measurement.

#[cfg(test)]
#[path = "ruler_test.rs"]
mod ruler_test;

use crate::units::{self, Point};

/// Label shown while no measurement is available.
pub const EMPTY_LABEL: &str = "0.00 cm";

/// A completed ruler measurement between two pixel-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub start: Point,
    pub end: Point,
}

impl Measurement {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Straight-line distance in pixels.
    #[must_use]
    pub fn distance_px(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// Straight-line distance in centimeters.
    #[must_use]
    pub fn distance_cm(&self) -> f64 {
        units::to_cm(self.distance_px())
    }

    /// Display form, e.g. `"12.34 cm"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} cm", units::format_cm(self.distance_cm()))
    }
}
