//! Shared numeric constants for the canvas crate.

// ── Units ───────────────────────────────────────────────────────

/// Pixels per centimeter at 96 DPI (96 / 2.54).
pub const DENSITY: f64 = 37.795_275_591;

/// Millimeters per centimeter, for CAD output.
pub const MM_PER_CM: f64 = 10.0;

/// Decimal places kept for centimeter coordinates in saved documents.
pub const CM_DECIMALS: usize = 2;

// ── Canvas ──────────────────────────────────────────────────────

/// Smallest accepted canvas edge in centimeters.
pub const MIN_CANVAS_CM: f64 = 10.0;

/// Largest accepted canvas edge in centimeters.
pub const MAX_CANVAS_CM: f64 = 500.0;

/// Canvas edge used when nothing else has been configured.
pub const DEFAULT_CANVAS_CM: f64 = 100.0;
