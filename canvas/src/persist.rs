//! Saved document format: conversion between the in-memory trajectory and
//! the JSON document written to disk.
//!
//! On disk every coordinate is in centimeters, rendered as a string with two
//! decimals. Reading is lenient about representation (numbers or numeric
//! strings are both accepted) but strict about shape: a document whose
//! `trajectory` is not an array of numeric points is rejected as a whole, so
//! callers never see a partially converted trajectory.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::doc::{CanvasSize, DocError, Trajectory};
use crate::units::{self, Point};

/// Top-level saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Canvas size in centimeters.
    pub canvas_size: CanvasSizeRecord,
    /// Points in drawing order, in centimeters.
    pub trajectory: Vec<PointRecord>,
    /// Point count and creation time.
    pub metadata: Metadata,
}

/// Canvas size as written to the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSizeRecord {
    pub width: f64,
    pub height: f64,
}

/// A point in centimeters, each axis formatted with two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: String,
    pub y: String,
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Always equal to `trajectory.len()` when written.
    pub point_count: usize,
    /// ISO-8601 (RFC 3339) UTC timestamp.
    pub created_at: String,
}

/// Build a document from the current canvas and trajectory.
///
/// # Errors
///
/// [`DocError::EmptyTrajectory`] when there is nothing to save, or
/// [`DocError::Timestamp`] if `created_at` cannot be rendered.
pub fn serialize(canvas: &CanvasSize, trajectory: &Trajectory, created_at: OffsetDateTime) -> Result<Document, DocError> {
    if trajectory.is_empty() {
        return Err(DocError::EmptyTrajectory);
    }

    let points: Vec<PointRecord> = trajectory
        .points()
        .iter()
        .map(|p| {
            let cm = p.to_cm();
            PointRecord { x: units::format_cm(cm.x), y: units::format_cm(cm.y) }
        })
        .collect();

    Ok(Document {
        canvas_size: CanvasSizeRecord { width: canvas.width(), height: canvas.height() },
        metadata: Metadata { point_count: points.len(), created_at: format_timestamp(created_at)? },
        trajectory: points,
    })
}

/// Render a document as pretty-printed JSON with two-space indentation.
///
/// # Errors
///
/// Propagates serializer failures as [`DocError::Json`].
pub fn to_json_pretty(doc: &Document) -> Result<String, DocError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Read a parsed JSON document back into a canvas size and pixel-space trajectory.
///
/// `current` is kept for any canvas edge the document does not specify.
///
/// # Errors
///
/// [`DocError::InvalidFormat`] when `trajectory` is missing, is not an array,
/// or holds a point without numeric `x`/`y`; [`DocError::CanvasSizeOutOfRange`]
/// when the document's canvas size is outside the accepted range.
pub fn deserialize(value: &Value, current: CanvasSize) -> Result<(CanvasSize, Trajectory), DocError> {
    let Some(points) = value.get("trajectory").and_then(Value::as_array) else {
        return Err(DocError::InvalidFormat("`trajectory` must be an array of points".into()));
    };

    let canvas = match value.get("canvasSize") {
        None | Some(Value::Null) => current,
        Some(size) => read_canvas_size(size, current)?,
    };

    let trajectory = points
        .iter()
        .enumerate()
        .map(|(index, point)| read_point(index, point))
        .collect::<Result<Trajectory, DocError>>()?;

    Ok((canvas, trajectory))
}

/// Plain-text coordinate listing: a `#` comment header followed by one
/// `x, y` line per point, in centimeters.
///
/// # Errors
///
/// Same conditions as [`serialize`].
pub fn to_text(canvas: &CanvasSize, trajectory: &Trajectory, generated_at: OffsetDateTime) -> Result<String, DocError> {
    if trajectory.is_empty() {
        return Err(DocError::EmptyTrajectory);
    }

    let mut out = String::new();
    out.push_str("# Trajectory coordinates (cm)\n");
    out.push_str(&format!("# Generated: {}\n", format_timestamp(generated_at)?));
    out.push_str(&format!(
        "# Canvas: {} x {} cm\n",
        units::format_cm(canvas.width()),
        units::format_cm(canvas.height())
    ));
    out.push_str(&format!("# Total points: {}\n", trajectory.len()));
    out.push_str("# Format: x, y\n\n");
    for p in trajectory.points() {
        let cm = p.to_cm();
        out.push_str(&format!("{}, {}\n", units::format_cm(cm.x), units::format_cm(cm.y)));
    }
    Ok(out)
}

/// File name for an exported document: `trajectory_<epoch-ms>.json`.
#[must_use]
pub fn export_file_name(at: OffsetDateTime) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("trajectory_{millis}.json")
}

/// Polyline vertices for CAD output: millimeters, with Y pointing up.
///
/// Screen Y grows downward, so Y is negated. Points keep their drawing order.
///
/// # Errors
///
/// [`DocError::EmptyTrajectory`] when there is nothing to export.
pub fn to_cad_vertices(trajectory: &Trajectory) -> Result<Vec<(f64, f64)>, DocError> {
    if trajectory.is_empty() {
        return Err(DocError::EmptyTrajectory);
    }
    Ok(trajectory.points().iter().map(|p| (units::to_mm(p.x), -units::to_mm(p.y))).collect())
}

/// Rebuild a trajectory from CAD polyline vertices (inverse of [`to_cad_vertices`]).
///
/// # Errors
///
/// [`DocError::InvalidFormat`] when a vertex does not map to finite pixels.
pub fn from_cad_vertices<I>(vertices: I) -> Result<Trajectory, DocError>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    vertices
        .into_iter()
        .enumerate()
        .map(|(index, (x_mm, y_mm))| {
            let px = Point::new(units::mm_to_px(x_mm), -units::mm_to_px(y_mm));
            if px.x.is_finite() && px.y.is_finite() {
                Ok(px)
            } else {
                Err(DocError::InvalidFormat(format!("vertex {index}: coordinate out of range")))
            }
        })
        .collect()
}

fn format_timestamp(at: OffsetDateTime) -> Result<String, DocError> {
    Ok(at.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

fn read_canvas_size(size: &Value, current: CanvasSize) -> Result<CanvasSize, DocError> {
    if !size.is_object() {
        return Err(DocError::InvalidFormat("`canvasSize` must be an object".into()));
    }
    let width = read_edge(size, "width")?.unwrap_or(current.width());
    let height = read_edge(size, "height")?.unwrap_or(current.height());
    CanvasSize::new(width, height)
}

/// An absent, null, zero or empty edge means "keep the current one".
fn read_edge(size: &Value, key: &str) -> Result<Option<f64>, DocError> {
    match size.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => match number(v) {
            Some(n) if n == 0.0 => Ok(None),
            Some(n) => Ok(Some(n)),
            None => Err(DocError::InvalidFormat(format!("`canvasSize.{key}` is not a number"))),
        },
    }
}

fn read_point(index: usize, point: &Value) -> Result<Point, DocError> {
    let axis = |key: &str| {
        point
            .get(key)
            .and_then(number)
            .ok_or_else(|| DocError::InvalidFormat(format!("point {index}: missing or non-numeric `{key}`")))
    };
    let px = Point::new(axis("x")?, axis("y")?).to_px();
    if !(px.x.is_finite() && px.y.is_finite()) {
        return Err(DocError::InvalidFormat(format!("point {index}: coordinate out of range")));
    }
    Ok(px)
}

/// Accept a JSON number or a string holding one.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) => return None,
        },
        _ => return None,
    };
    n.is_finite().then_some(n)
}
