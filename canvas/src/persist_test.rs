#![allow(clippy::float_cmp)]

use serde_json::json;
use time::macros::datetime;

use super::*;
use crate::consts::DENSITY;

fn at() -> OffsetDateTime {
    datetime!(2024-01-02 03:04:05 UTC)
}

fn three_points() -> Trajectory {
    [Point::new(0.0, 0.0), Point::new(DENSITY, 2.0 * DENSITY), Point::new(50.0, 75.5)]
        .into_iter()
        .collect()
}

// =============================================================
// serialize
// =============================================================

#[test]
fn serialize_rejects_empty_trajectory() {
    let err = serialize(&CanvasSize::default(), &Trajectory::new(), at()).unwrap_err();
    assert!(matches!(err, DocError::EmptyTrajectory));
}

#[test]
fn serialize_three_points_sets_point_count() {
    let doc = serialize(&CanvasSize::default(), &three_points(), at()).unwrap();
    assert_eq!(doc.metadata.point_count, 3);
    assert_eq!(doc.trajectory.len(), 3);
}

#[test]
fn serialize_formats_centimeters_with_two_decimals() {
    let doc = serialize(&CanvasSize::default(), &three_points(), at()).unwrap();
    assert_eq!(doc.trajectory[0], PointRecord { x: "0.00".into(), y: "0.00".into() });
    assert_eq!(doc.trajectory[1], PointRecord { x: "1.00".into(), y: "2.00".into() });
    // 50 px = 1.3229 cm, 75.5 px = 1.9976 cm
    assert_eq!(doc.trajectory[2], PointRecord { x: "1.32".into(), y: "2.00".into() });
}

#[test]
fn serialize_carries_canvas_size() {
    let canvas = CanvasSize::new(120.0, 45.5).unwrap();
    let doc = serialize(&canvas, &three_points(), at()).unwrap();
    assert_eq!(doc.canvas_size, CanvasSizeRecord { width: 120.0, height: 45.5 });
}

#[test]
fn serialize_timestamp_is_rfc3339_utc() {
    let doc = serialize(&CanvasSize::default(), &three_points(), at()).unwrap();
    assert!(doc.metadata.created_at.starts_with("2024-01-02T03:04:05"), "{}", doc.metadata.created_at);
    assert!(doc.metadata.created_at.ends_with('Z'));
}

#[test]
fn serialize_normalises_offset_to_utc() {
    let local = datetime!(2024-01-02 05:04:05 +02:00);
    let doc = serialize(&CanvasSize::default(), &three_points(), local).unwrap();
    assert!(doc.metadata.created_at.starts_with("2024-01-02T03:04:05"));
}

#[test]
fn json_uses_exact_schema_keys() {
    let doc = serialize(&CanvasSize::default(), &three_points(), at()).unwrap();
    let text = to_json_pretty(&doc).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert!(value["canvasSize"]["width"].is_number());
    assert!(value["canvasSize"]["height"].is_number());
    assert_eq!(value["trajectory"][1], json!({ "x": "1.00", "y": "2.00" }));
    assert_eq!(value["metadata"]["pointCount"], json!(3));
    assert!(value["metadata"]["createdAt"].is_string());
}

#[test]
fn json_is_indented_two_spaces() {
    let doc = serialize(&CanvasSize::default(), &three_points(), at()).unwrap();
    let text = to_json_pretty(&doc).unwrap();
    assert!(text.contains("\n  \"canvasSize\""), "{text}");
}

// =============================================================
// deserialize
// =============================================================

#[test]
fn roundtrip_within_rounding_error() {
    let original = three_points();
    let doc = serialize(&CanvasSize::default(), &original, at()).unwrap();
    let value = serde_json::to_value(&doc).unwrap();
    let (_, restored) = deserialize(&value, CanvasSize::default()).unwrap();

    assert_eq!(restored.len(), original.len());
    for (a, b) in original.points().iter().zip(restored.points()) {
        // Half a hundredth of a centimeter, expressed in pixels.
        assert!((a.x - b.x).abs() <= 0.005 * DENSITY + 1e-9);
        assert!((a.y - b.y).abs() <= 0.005 * DENSITY + 1e-9);
    }
}

#[test]
fn roundtrip_restores_canvas_size() {
    let canvas = CanvasSize::new(30.0, 20.0).unwrap();
    let value = serde_json::to_value(serialize(&canvas, &three_points(), at()).unwrap()).unwrap();
    let (restored, _) = deserialize(&value, CanvasSize::default()).unwrap();
    assert_eq!(restored, canvas);
}

#[test]
fn missing_trajectory_is_invalid_format() {
    let err = deserialize(&json!({ "canvasSize": { "width": 50, "height": 50 } }), CanvasSize::default()).unwrap_err();
    assert!(matches!(err, DocError::InvalidFormat(_)));
}

#[test]
fn non_array_trajectory_is_invalid_format() {
    let err = deserialize(&json!({ "trajectory": "not an array" }), CanvasSize::default()).unwrap_err();
    assert!(matches!(err, DocError::InvalidFormat(_)));
}

#[test]
fn non_object_document_is_invalid_format() {
    let err = deserialize(&json!([1, 2, 3]), CanvasSize::default()).unwrap_err();
    assert!(matches!(err, DocError::InvalidFormat(_)));
}

#[test]
fn empty_trajectory_array_loads() {
    let (_, t) = deserialize(&json!({ "trajectory": [] }), CanvasSize::default()).unwrap();
    assert!(t.is_empty());
}

#[test]
fn numeric_and_string_coordinates_are_accepted() {
    let value = json!({ "trajectory": [{ "x": 1, "y": "2.00" }, { "x": " 3.5 ", "y": 0.5 }] });
    let (_, t) = deserialize(&value, CanvasSize::default()).unwrap();
    assert!((t.points()[0].x - DENSITY).abs() < 1e-9);
    assert!((t.points()[0].y - 2.0 * DENSITY).abs() < 1e-9);
    assert!((t.points()[1].x - 3.5 * DENSITY).abs() < 1e-9);
}

#[test]
fn non_numeric_coordinate_is_invalid_format() {
    let value = json!({ "trajectory": [{ "x": "1.00", "y": "1.00" }, { "x": "abc", "y": "1.00" }] });
    let err = deserialize(&value, CanvasSize::default()).unwrap_err();
    let DocError::InvalidFormat(msg) = err else {
        panic!("expected InvalidFormat");
    };
    assert!(msg.contains("point 1"), "{msg}");
}

#[test]
fn point_missing_axis_is_invalid_format() {
    let value = json!({ "trajectory": [{ "x": "1.00" }] });
    assert!(matches!(deserialize(&value, CanvasSize::default()), Err(DocError::InvalidFormat(_))));
}

#[test]
fn coordinate_overflowing_pixels_is_invalid_format() {
    let value = json!({ "trajectory": [{ "x": 1e308, "y": "1e308" }] });
    let err = deserialize(&value, CanvasSize::default()).unwrap_err();
    let DocError::InvalidFormat(msg) = err else {
        panic!("expected InvalidFormat");
    };
    assert!(msg.contains("point 0"), "{msg}");
}

#[test]
fn absent_canvas_size_keeps_current() {
    let current = CanvasSize::new(42.0, 24.0).unwrap();
    let (canvas, _) = deserialize(&json!({ "trajectory": [] }), current).unwrap();
    assert_eq!(canvas, current);
}

#[test]
fn partial_canvas_size_updates_one_axis() {
    let current = CanvasSize::new(42.0, 24.0).unwrap();
    let (canvas, _) = deserialize(&json!({ "canvasSize": { "width": "80" }, "trajectory": [] }), current).unwrap();
    assert_eq!(canvas.width(), 80.0);
    assert_eq!(canvas.height(), 24.0);
}

#[test]
fn zero_canvas_edge_keeps_current() {
    let current = CanvasSize::new(42.0, 24.0).unwrap();
    let (canvas, _) =
        deserialize(&json!({ "canvasSize": { "width": 0, "height": 60 }, "trajectory": [] }), current).unwrap();
    assert_eq!(canvas.width(), 42.0);
    assert_eq!(canvas.height(), 60.0);
}

#[test]
fn out_of_range_canvas_size_is_rejected() {
    let value = json!({ "canvasSize": { "width": 600, "height": 100 }, "trajectory": [] });
    assert!(matches!(
        deserialize(&value, CanvasSize::default()),
        Err(DocError::CanvasSizeOutOfRange { .. })
    ));
}

#[test]
fn non_object_canvas_size_is_invalid_format() {
    let value = json!({ "canvasSize": "big", "trajectory": [] });
    assert!(matches!(deserialize(&value, CanvasSize::default()), Err(DocError::InvalidFormat(_))));
}

#[test]
fn metadata_is_not_required_on_load() {
    let value = json!({ "trajectory": [{ "x": "0.00", "y": "0.00" }] });
    let (_, t) = deserialize(&value, CanvasSize::default()).unwrap();
    assert_eq!(t.len(), 1);
}

// =============================================================
// text export / file name
// =============================================================

#[test]
fn text_export_lists_points_after_header() {
    let text = to_text(&CanvasSize::default(), &three_points(), at()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# Trajectory coordinates (cm)");
    assert!(lines[1].starts_with("# Generated: 2024-01-02T03:04:05"));
    assert_eq!(lines[2], "# Canvas: 100.00 x 100.00 cm");
    assert_eq!(lines[3], "# Total points: 3");
    assert_eq!(lines[4], "# Format: x, y");
    assert_eq!(lines[5], "");
    assert_eq!(&lines[6..], ["0.00, 0.00", "1.00, 2.00", "1.32, 2.00"]);
}

#[test]
fn text_export_rejects_empty_trajectory() {
    assert!(matches!(
        to_text(&CanvasSize::default(), &Trajectory::new(), at()),
        Err(DocError::EmptyTrajectory)
    ));
}

#[test]
fn export_file_name_uses_epoch_millis() {
    let at = OffsetDateTime::from_unix_timestamp_nanos(1_700_000_000_123_456_789).unwrap();
    assert_eq!(export_file_name(at), "trajectory_1700000000123.json");
}

// =============================================================
// CAD vertices
// =============================================================

#[test]
fn cad_vertices_are_millimeters_with_y_up() {
    let t: Trajectory = [Point::new(DENSITY, 2.0 * DENSITY), Point::new(0.0, 0.0)].into_iter().collect();
    let vertices = to_cad_vertices(&t).unwrap();
    assert_eq!(vertices.len(), 2);
    assert!((vertices[0].0 - 10.0).abs() < 1e-9);
    assert!((vertices[0].1 + 20.0).abs() < 1e-9);
}

#[test]
fn cad_vertices_reject_empty_trajectory() {
    assert!(matches!(to_cad_vertices(&Trajectory::new()), Err(DocError::EmptyTrajectory)));
}

#[test]
fn cad_vertices_map_back_to_pixels() {
    let t = three_points();
    let back = from_cad_vertices(to_cad_vertices(&t).unwrap()).unwrap();
    assert_eq!(back.len(), t.len());
    for (a, b) in back.points().iter().zip(t.points()) {
        assert!(a.distance_to(*b) < 1e-9);
    }
}

#[test]
fn cad_vertex_overflowing_pixels_is_invalid_format() {
    let err = from_cad_vertices([(1.0, 1.0), (f64::MAX, 0.0)]).unwrap_err();
    let DocError::InvalidFormat(msg) = err else {
        panic!("expected InvalidFormat");
    };
    assert!(msg.contains("vertex 1"), "{msg}");
}
