use super::*;
use crate::scene::model::ShapeSpec;
use crate::shape::registry::ShapeRegistry;
use serde_json::json;

fn make(list: serde_json::Value) -> Vec<Shape> {
    let reg = ShapeRegistry::with_builtins();
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| {
            let spec: ShapeSpec = serde_json::from_value(v.clone()).unwrap();
            reg.try_create(&spec, "s").unwrap().shape
        })
        .collect()
}

fn pos(shape: &Shape) -> Point {
    shape.view().position()
}

#[test]
fn in_range_scene_is_untouched() {
    let shapes = make(json!([{"type": "circle", "x": 10, "y": 10}]));
    assert!(compute_mapping(&shapes, 800.0, 600.0, 20.0).is_none());
}

#[test]
fn axes_scale_independently() {
    let mut shapes = make(json!([
        {"type": "circle", "x": 0, "y": 0},
        {"type": "circle", "x": 1000, "y": 10}
    ]));
    let m = compute_mapping(&shapes, 820.0, 620.0, 10.0).unwrap();
    let (sx, sy) = m.scale();
    assert!((sx - 0.8).abs() < 1e-9);
    assert!((sy - 60.0).abs() < 1e-9);
    apply_mapping(&mut shapes, &m);
    assert_eq!(pos(&shapes[0]), Point::new(10.0, 10.0));
    assert_eq!(pos(&shapes[1]), Point::new(810.0, 610.0));
}

#[test]
fn zero_extent_axis_is_centered() {
    let mut shapes = make(json!([
        {"type": "circle", "x": -50, "y": 5},
        {"type": "circle", "x": 950, "y": 5}
    ]));
    let m = compute_mapping(&shapes, 800.0, 600.0, 0.0).unwrap();
    apply_mapping(&mut shapes, &m);
    assert_eq!(pos(&shapes[0]).y, 300.0);
    assert_eq!(pos(&shapes[1]).y, 300.0);
    assert_eq!(pos(&shapes[1]).x, 800.0);
}

#[test]
fn polyline_points_are_mapped() {
    let mut shapes = make(json!([
        {"type": "path", "points": [[0, 0], [2000, 2000]]}
    ]));
    let m = compute_mapping(&shapes, 100.0, 100.0, 0.0).unwrap();
    apply_mapping(&mut shapes, &m);
    let pts = shapes[0].view().points("points").to_vec();
    assert_eq!(pts, vec![Point::new(0.0, 0.0), Point::new(100.0, 100.0)]);
}

#[test]
fn animation_values_follow_their_axis() {
    let shapes = make(json!([
        {"type": "circle", "x": 0, "y": 0},
        {"type": "circle", "x": 1000, "y": 10}
    ]));
    let m = compute_mapping(&shapes, 820.0, 620.0, 10.0).unwrap();
    assert_eq!(m.map_property("x", PropValue::Number(500.0)), PropValue::Number(410.0));
    assert_eq!(m.map_property("y2", PropValue::Number(5.0)), PropValue::Number(310.0));
    assert_eq!(m.map_property("radius", PropValue::Number(5.0)), PropValue::Number(5.0));
}
