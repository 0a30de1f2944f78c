use super::*;
use crate::render::surface::{RecordingSurface, SurfaceOp};
use crate::shape::props::{Props, normalize_properties};
use serde_json::json;

fn props_for(kind: &dyn ShapeKind, raw: serde_json::Value) -> Props {
    normalize_properties(
        kind.type_name(),
        raw.as_object().unwrap(),
        &kind.defaults(),
    )
    .props
}

fn draw(kind: &dyn ShapeKind, raw: serde_json::Value) -> Vec<SurfaceOp> {
    let props = props_for(kind, raw);
    let overlay = Props::new();
    let mut surface = RecordingSurface::new(800, 600);
    kind.draw(&PropsView::new(&props, &overlay), &mut surface)
        .unwrap();
    surface.take_ops()
}

fn bounds(kind: &dyn ShapeKind, raw: serde_json::Value) -> Rect {
    let props = props_for(kind, raw);
    let overlay = Props::new();
    kind.local_bounds(&PropsView::new(&props, &overlay))
}

#[test]
fn circle_defaults_to_radius_20_at_100_100() {
    assert_eq!(bounds(&Circle, json!({})), Rect::new(80.0, 80.0, 120.0, 120.0));
}

#[test]
fn zero_radius_circle_draws_nothing() {
    assert!(draw(&Circle, json!({"r": 0})).is_empty());
}

#[test]
fn rectangle_is_anchored_top_left() {
    assert_eq!(
        bounds(&Rectangle, json!({"x": 10, "y": 20, "w": 30, "h": 40})),
        Rect::new(10.0, 20.0, 40.0, 60.0)
    );
}

#[test]
fn line_strokes_with_main_color_by_default() {
    let ops = draw(&Line, json!({"x": 0, "y": 0, "x2": 10, "y2": 0, "color": "#00ff00"}));
    assert_eq!(ops.len(), 1);
    let SurfaceOp::StrokePath { color, width, .. } = &ops[0] else {
        panic!("expected stroke");
    };
    assert_eq!(*color, Rgba8::new(0, 255, 0, 255));
    assert_eq!(*width, 2.0);
}

#[test]
fn arrow_draws_shaft_and_head() {
    let ops = draw(&Arrow, json!({"x": 0, "y": 0, "x2": 100, "y2": 0}));
    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[1], SurfaceOp::FillPath { .. }));
}

#[test]
fn degenerate_arrow_skips_head() {
    let ops = draw(&Arrow, json!({"x": 5, "y": 5, "x2": 5, "y2": 5}));
    assert_eq!(ops.len(), 1);
}

#[test]
fn text_bounds_follow_alignment() {
    let b = bounds(&Text, json!({"x": 100, "y": 0, "text": "abcd", "size": 10, "align": "center"}));
    assert!((b.x0 - 88.0).abs() < 1e-9);
    assert!((b.x1 - 112.0).abs() < 1e-9);
    assert!((b.height() - 12.0).abs() < 1e-9);
}

#[test]
fn text_measure_uses_the_surface_and_counts_lines() {
    let props = props_for(&Text, json!({"x": 0, "y": 0, "text": "ab\nabcd", "size": 10}));
    let overlay = Props::new();
    let view = PropsView::new(&props, &overlay);
    let mut surface = RecordingSurface::new(100, 100);
    let measured = Text.measure(&view, &mut surface).unwrap();
    assert_eq!(measured, Text.local_bounds(&view));
    assert!((measured.width() - 24.0).abs() < 1e-9);
    assert!((measured.height() - 24.0).abs() < 1e-9);

    let empty = props_for(&Text, json!({}));
    assert!(Text.measure(&PropsView::new(&empty, &overlay), &mut surface).is_none());
    assert!(Circle.measure(&view, &mut surface).is_none());
}

#[test]
fn empty_text_draws_nothing() {
    assert!(draw(&Text, json!({})).is_empty());
}

#[test]
fn polygon_and_star_fill_closed_paths() {
    assert_eq!(draw(&Polygon, json!({"sides": 3})).len(), 1);
    let ops = draw(&Star, json!({"x": 0, "y": 0}));
    let SurfaceOp::FillPath { bounds, .. } = &ops[0] else {
        panic!("expected fill");
    };
    assert!(bounds.y0 < -39.0 && bounds.y0 > -41.0);
}

#[test]
fn wave_with_zero_wavelength_is_flat() {
    let ops = draw(&Wave, json!({"x": 0, "y": 50, "wavelength": 0}));
    let SurfaceOp::StrokePath { bounds, .. } = &ops[0] else {
        panic!("expected stroke");
    };
    assert_eq!(bounds.height(), 0.0);
}

#[test]
fn bezier_is_quadratic_without_second_control() {
    let overlay = Props::new();
    let quad = props_for(&Bezier, json!({}));
    assert!(!Bezier::is_cubic(&PropsView::new(&quad, &overlay)));
    let cubic = props_for(&Bezier, json!({"cx2": 1, "cy2": 2}));
    assert!(Bezier::is_cubic(&PropsView::new(&cubic, &overlay)));
}

#[test]
fn particles_are_deterministic_and_inside_radius() {
    let props = props_for(&Particles, json!({"x": 0, "y": 0, "count": 50, "radius": 10}));
    let overlay = Props::new();
    let view = PropsView::new(&props, &overlay);
    let a = Particles::positions(&view);
    let b = Particles::positions(&view);
    assert_eq!(a, b);
    assert_eq!(a.len(), 50);
    assert!(a.iter().all(|p| p.to_vec2().hypot() <= 10.0 + 1e-9));
}

#[test]
fn gradient_interpolates_bands() {
    let ops = draw(&Gradient, json!({"x": 0, "y": 0, "width": 4, "height": 4, "color": "#000000", "color2": "#ffffff"}));
    assert_eq!(ops.len(), 4);
    let SurfaceOp::FillRect { color: first, .. } = ops[0] else {
        panic!("expected rect");
    };
    let SurfaceOp::FillRect { color: last, .. } = ops[3] else {
        panic!("expected rect");
    };
    assert_eq!(first, Rgba8::BLACK);
    assert_eq!(last, Rgba8::WHITE);
}

#[test]
fn path_from_svg_is_offset_by_position() {
    let b = bounds(&Path, json!({"x": 10, "y": 10, "d": "M0 0 L20 0 L20 5 Z"}));
    assert_eq!(b, Rect::new(10.0, 10.0, 30.0, 15.0));
}

#[test]
fn invalid_svg_fails_draw_but_not_bounds() {
    let props = props_for(&Path, json!({"d": "M 0 0 Q"}));
    let overlay = Props::new();
    let view = PropsView::new(&props, &overlay);
    let mut surface = RecordingSurface::new(10, 10);
    assert!(Path.draw(&view, &mut surface).is_err());
    assert_eq!(Path.local_bounds(&view), Rect::ZERO);
}

#[test]
fn open_polyline_path_is_stroked() {
    let ops = draw(&Path, json!({"points": [[0, 0], [10, 10]]}));
    assert!(matches!(ops[0], SurfaceOp::StrokePath { width, .. } if width == 2.0));
}
