use super::*;
use crate::foundation::core::Rgba8;
use crate::render::surface::{RecordingSurface, SurfaceOp};
use crate::shape::registry::ShapeRegistry;
use crate::scene::model::ShapeSpec;
use serde_json::json;

fn circle(props: serde_json::Value) -> Shape {
    let mut spec = ShapeSpec::new("circle").with_id("c");
    spec.properties = props.as_object().cloned().unwrap();
    ShapeRegistry::with_builtins()
        .try_create(&spec, "fallback")
        .unwrap()
        .shape
}

#[test]
fn bounds_follow_overlay_and_reset() {
    let mut s = circle(json!({"x": 50, "y": 60, "r": 10}));
    assert_eq!(s.bounds(), Rect::new(40.0, 50.0, 60.0, 70.0));

    s.set_animated_property("x", PropValue::Number(150.0));
    assert_eq!(s.bounds(), Rect::new(140.0, 50.0, 160.0, 70.0));
    assert_eq!(s.static_props().get("x"), Some(&PropValue::Number(50.0)));

    s.reset_animated_properties();
    assert!(s.overlay().is_empty());
    assert_eq!(s.bounds(), Rect::new(40.0, 50.0, 60.0, 70.0));
}

#[test]
fn stroke_pads_bounds() {
    let s = circle(json!({"x": 0, "y": 0, "r": 10, "strokeWidth": 4}));
    assert_eq!(s.bounds(), Rect::new(-12.0, -12.0, 12.0, 12.0));
}

#[test]
fn rotation_expands_bounds() {
    let mut spec = ShapeSpec::new("rectangle");
    spec.properties = json!({"x": 0, "y": 0, "width": 10, "height": 10, "rotation": std::f64::consts::FRAC_PI_4})
        .as_object()
        .cloned()
        .unwrap();
    let s = ShapeRegistry::with_builtins()
        .try_create(&spec, "r")
        .unwrap()
        .shape;
    let b = s.bounds();
    assert!(b.width() > 14.0 && b.width() < 14.2);
}

#[test]
fn render_applies_opacity() {
    let s = circle(json!({"fill": "#ff0000", "opacity": 0.5}));
    let mut surface = RecordingSurface::new(200, 200);
    s.render(&mut surface).unwrap();
    let SurfaceOp::FillPath { color, .. } = &surface.ops()[0] else {
        panic!("expected a fill");
    };
    assert_eq!(*color, Rgba8::new(255, 0, 0, 128));
}

#[test]
fn zero_opacity_draws_nothing() {
    let s = circle(json!({"opacity": 0}));
    let mut surface = RecordingSurface::new(200, 200);
    s.render(&mut surface).unwrap();
    assert!(surface.ops().is_empty());
}

#[test]
fn draw_failures_name_the_shape() {
    let red = Rgba8::new(255, 0, 0, 255);
    let s = circle(json!({"fill": "red"}));
    let mut surface = RecordingSurface::new(200, 200).poison_color(red);
    let err = s.render(&mut surface).unwrap_err();
    assert!(matches!(err, TweenError::Render { ref shape_id, .. } if shape_id == "c"));
}
