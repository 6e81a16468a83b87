//! Input model: the active mode, its transient gesture state, and the
//! scripted events a host can feed into a session.
//!
//! `Mode` is a two-variant tagged state. Draw mode only tracks whether a
//! stroke is in progress; ruler mode carries the endpoints of the measurement
//! being taken, which are meaningless outside it and vanish on mode switch.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::ruler::Measurement;
use crate::units::Point;

/// Which tool the user has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    /// Freehand drawing (default).
    #[default]
    Draw,
    /// Two-point distance measurement.
    Ruler,
}

/// Active mode together with its gesture state.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Freehand drawing.
    Draw {
        /// A pointer is down and moves append points.
        stroking: bool,
    },
    /// Ruler measurement.
    Ruler {
        /// First endpoint, set on pointer-down.
        start: Option<Point>,
        /// Second endpoint, set on drag or on a second click.
        end: Option<Point>,
        /// The pointer has been down since `start` was recorded.
        dragging: bool,
        /// The pointer moved after the press, so the release ends a drag.
        moved: bool,
    },
}

impl Mode {
    /// Fresh state for `kind`, with no gesture in progress.
    #[must_use]
    pub fn idle(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Draw => Self::Draw { stroking: false },
            ModeKind::Ruler => Self::Ruler { start: None, end: None, dragging: false, moved: false },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Draw { .. } => ModeKind::Draw,
            Self::Ruler { .. } => ModeKind::Ruler,
        }
    }

    /// The current ruler measurement, when both endpoints are known.
    #[must_use]
    pub fn measurement(&self) -> Option<Measurement> {
        match *self {
            Self::Ruler { start: Some(start), end: Some(end), .. } => Some(Measurement::new(start, end)),
            _ => None,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::idle(ModeKind::default())
    }
}

/// One scripted input event, as read from a JSON-lines event file.
///
/// Coordinates are pixels relative to the canvas origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Pointer pressed.
    Down { x: f64, y: f64 },
    /// Pointer moved.
    Move { x: f64, y: f64 },
    /// Pointer released.
    Up { x: f64, y: f64 },
    /// Pointer left the canvas.
    Leave,
    /// Switch tools.
    Mode { mode: ModeKind },
    /// Clear the canvas. Scripted clears count as confirmed.
    Clear,
    /// Apply a new canvas size in centimeters.
    Resize { width: f64, height: f64 },
}
