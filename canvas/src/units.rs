#[cfg(test)]
#[path = "units_test.rs"]
mod units_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DENSITY, MM_PER_CM};

/// A point in either pixel or centimeter space.
///
/// In memory the trajectory keeps pixel coordinates relative to the canvas
/// origin; centimeters only appear at the document boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a pixel-space point to centimeters.
    #[must_use]
    pub fn to_cm(self) -> Point {
        Point { x: to_cm(self.x), y: to_cm(self.y) }
    }

    /// Convert a centimeter-space point to pixels.
    #[must_use]
    pub fn to_px(self) -> Point {
        Point { x: to_px(self.x), y: to_px(self.y) }
    }

    /// Euclidean distance to `other`, in the same space as both points.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Convert a pixel length to centimeters.
#[must_use]
pub fn to_cm(px: f64) -> f64 {
    px / DENSITY
}

/// Convert a centimeter length to pixels.
#[must_use]
pub fn to_px(cm: f64) -> f64 {
    cm * DENSITY
}

/// Convert a pixel length to millimeters.
#[must_use]
pub fn to_mm(px: f64) -> f64 {
    to_cm(px) * MM_PER_CM
}

/// Convert a millimeter length to pixels.
#[must_use]
pub fn mm_to_px(mm: f64) -> f64 {
    to_px(mm / MM_PER_CM)
}

/// Whole-pixel extent of a canvas edge given in centimeters.
///
/// Callers pass validated canvas edges, so the result always fits in `u32`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn canvas_px(cm: f64) -> u32 {
    to_px(cm).round().max(0.0) as u32
}

/// Format a centimeter value with the document's fixed precision.
#[must_use]
pub fn format_cm(cm: f64) -> String {
    format!("{cm:.prec$}", prec = crate::consts::CM_DECIMALS)
}
