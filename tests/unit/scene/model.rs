use super::*;
use serde_json::json;

#[test]
fn parses_full_scene() {
    let spec = SceneSpec::from_value(json!({
        "id": "demo",
        "durationMs": 2000,
        "fps": 30,
        "loop": true,
        "shapes": [
            {"id": "c", "type": "circle", "properties": {"r": 10}, "layer": "fg", "class": "dot big"},
            {"type": "text", "text": "hi", "zIndex": 3}
        ],
        "animations": [
            {"target": "c", "type": "property", "property": "x", "from": 0, "to": 10, "easing": "linear"},
            {"target": {"class": "dot"}, "type": "orbit", "centerX": 5, "radius": 2, "duration": 500},
            {"target": [{"type": "text"}, "#c"], "type": "path", "points": [[0, 0], {"x": 1, "y": 2}]}
        ]
    }))
    .unwrap();

    assert_eq!(spec.duration_ms, Some(2000.0));
    assert_eq!(spec.fps, Some(30.0));
    assert_eq!(spec.looping, Some(true));
    assert_eq!(spec.shapes.len(), 2);
    assert_eq!(spec.shapes[0].class_tokens(), vec!["dot", "big"]);
    assert_eq!(spec.shapes[1].z_index, 3);
    assert_eq!(spec.shapes[1].merged_properties().get("text"), Some(&json!("hi")));

    let a = &spec.animations;
    assert_eq!(a[0].duration, 1000.0);
    assert!(matches!(a[0].target, TargetSpec::One(Selector::Shorthand(ref s)) if s == "c"));
    let MotionSpec::Orbit {
        center_x,
        center_y,
        radius,
        clockwise,
        ..
    } = a[1].motion
    else {
        panic!("expected orbit motion");
    };
    assert_eq!((center_x, center_y, radius), (Some(5.0), None, Some(2.0)));
    assert!(clockwise);
    assert_eq!(a[1].duration, 500.0);
    let MotionSpec::Path { points } = &a[2].motion else {
        panic!("expected path motion");
    };
    assert_eq!(Point::from(points[1]), Point::new(1.0, 2.0));
    assert!(matches!(&a[2].target, TargetSpec::Many(v) if v.len() == 2));
}

#[test]
fn explicit_properties_override_inline_ones() {
    let spec: ShapeSpec =
        serde_json::from_value(json!({"type": "circle", "r": 1, "properties": {"r": 2}})).unwrap();
    assert_eq!(spec.merged_properties().get("r"), Some(&json!(2)));
}

#[test]
fn rejects_bad_structure() {
    let bad_duration = SceneSpec::from_value(json!({"durationMs": -5})).unwrap();
    assert!(matches!(
        bad_duration.validate(),
        Err(TweenError::InvalidScene(_))
    ));

    let dup = SceneSpec::from_value(json!({
        "shapes": [{"id": "a", "type": "circle"}, {"id": "a", "type": "circle"}]
    }))
    .unwrap();
    assert!(dup.validate().is_err());

    assert!(matches!(
        SceneSpec::from_json("{\"shapes\": 5}"),
        Err(TweenError::InvalidScene(_))
    ));
}

#[test]
fn missing_fields_use_defaults() {
    let spec = SceneSpec::from_json("{}").unwrap();
    assert!(spec.duration_ms.is_none());
    assert!(spec.shapes.is_empty());
    spec.validate().unwrap();
}
