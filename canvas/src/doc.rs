//! Document model: the drawn trajectory and the canvas it lives on.
//!
//! `Trajectory` is the ordered, append-only store of pixel-space points the
//! user has drawn. `CanvasSize` is the validated physical size of the canvas
//! in centimeters. Both are owned by the session engine and converted to and
//! from the saved JSON form by [`crate::persist`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use crate::consts::{DEFAULT_CANVAS_CM, MAX_CANVAS_CM, MIN_CANVAS_CM};
use crate::units::{self, Point};

/// Error returned by canvas size validation and document conversion.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// Requested canvas edge is outside the accepted range.
    #[error("canvas size must be between 10 and 500 cm (got {width} x {height})")]
    CanvasSizeOutOfRange { width: f64, height: f64 },
    /// There is nothing to save.
    #[error("there are no coordinates to save")]
    EmptyTrajectory,
    /// The document parsed as JSON but does not describe a trajectory.
    #[error("invalid trajectory document: {0}")]
    InvalidFormat(String),
    /// The input is not JSON at all.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The creation timestamp could not be rendered.
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Physical canvas size in centimeters. Both edges lie in the accepted range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    width: f64,
    height: f64,
}

impl CanvasSize {
    /// Validate and build a canvas size. Non-finite or out-of-range edges are rejected.
    pub fn new(width: f64, height: f64) -> Result<Self, DocError> {
        let range = MIN_CANVAS_CM..=MAX_CANVAS_CM;
        if range.contains(&width) && range.contains(&height) {
            Ok(Self { width, height })
        } else {
            Err(DocError::CanvasSizeOutOfRange { width, height })
        }
    }

    /// Width in centimeters.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in centimeters.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Canvas width in whole pixels.
    #[must_use]
    pub fn width_px(&self) -> u32 {
        units::canvas_px(self.width)
    }

    /// Canvas height in whole pixels.
    #[must_use]
    pub fn height_px(&self) -> u32 {
        units::canvas_px(self.height)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: DEFAULT_CANVAS_CM, height: DEFAULT_CANVAS_CM }
    }
}

/// Ordered sequence of drawn points in pixel space. Drawing order is kept and
/// duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    points: Vec<Point>,
}

impl Trajectory {
    /// Create an empty trajectory.
    #[must_use]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append a point at the end of the trajectory.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Points in drawing order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The most recently added point, if any.
    #[must_use]
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Total length of the polyline through all points, in pixels.
    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.points.windows(2).map(|pair| pair[0].distance_to(pair[1])).fold(0.0, |acc, d| acc + d)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points have been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Point> for Trajectory {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}
