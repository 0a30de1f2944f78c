use super::*;
use crate::scene::model::ShapeSpec;
use crate::shape::registry::ShapeRegistry;

fn circle() -> Shape {
    ShapeRegistry::with_builtins()
        .try_create(&ShapeSpec::new("circle").with_id("c"), "c")
        .unwrap()
        .shape
}

fn x_motion(from: f64, to: f64) -> Motion {
    Motion::Property(PropertyMotion {
        property: "x".into(),
        from: PropValue::Number(from),
        to: PropValue::Number(to),
    })
}

fn x_of(shape: &Shape) -> f64 {
    shape.view().number("x")
}

#[test]
fn linear_property_midpoint() {
    let mut shape = circle();
    let mut a = Animator::new("c", x_motion(100.0, 400.0))
        .with_timing(1000.0, 0.0)
        .with_ease(Ease::Linear);
    a.start(0.0);
    assert!(a.update(500.0, &mut shape));
    assert!((x_of(&shape) - 250.0).abs() < 1e-9);
}

#[test]
fn delay_holds_until_start_time() {
    let mut shape = circle();
    let mut a = Animator::new("c", x_motion(0.0, 10.0))
        .with_timing(100.0, 50.0)
        .with_ease(Ease::Linear);
    a.start(0.0);
    assert!(a.update(25.0, &mut shape));
    assert!(shape.overlay().is_empty());
    a.update(100.0, &mut shape);
    assert!((x_of(&shape) - 5.0).abs() < 1e-9);
}

#[test]
fn non_looping_completes_at_end_value() {
    let mut shape = circle();
    let mut a = Animator::new("c", x_motion(0.0, 10.0))
        .with_timing(100.0, 0.0)
        .with_ease(Ease::OutBounce);
    a.start(0.0);
    assert!(!a.update(150.0, &mut shape));
    assert!(a.is_complete());
    assert_eq!(x_of(&shape), 10.0);
    assert!(!a.update(200.0, &mut shape));
}

#[test]
fn zero_duration_jumps_to_end() {
    let mut shape = circle();
    let mut a = Animator::new("c", x_motion(0.0, 10.0)).with_timing(0.0, 0.0);
    a.start(0.0);
    assert!(!a.update(0.0, &mut shape));
    assert_eq!(x_of(&shape), 10.0);
}

#[test]
fn loop_wraps_to_start() {
    let mut shape = circle();
    let mut a = Animator::new("c", x_motion(0.0, 10.0))
        .with_timing(100.0, 0.0)
        .with_ease(Ease::Linear)
        .with_loop_mode(LoopMode::Loop);
    a.start(0.0);
    assert!(a.update(100.0, &mut shape));
    assert_eq!(x_of(&shape), 0.0);
    a.update(150.0, &mut shape);
    assert!((x_of(&shape) - 5.0).abs() < 1e-9);
}

#[test]
fn ping_pong_reverses() {
    let mut shape = circle();
    let mut a = Animator::new("c", x_motion(0.0, 10.0))
        .with_timing(100.0, 0.0)
        .with_ease(Ease::Linear)
        .with_loop_mode(LoopMode::PingPong);
    a.start(0.0);
    a.update(100.0, &mut shape);
    assert_eq!(a.direction(), -1.0);
    assert_eq!(x_of(&shape), 10.0);
    a.update(125.0, &mut shape);
    assert!((x_of(&shape) - 7.5).abs() < 1e-9);
}

#[test]
fn seek_lands_on_continuous_phase() {
    let mut shape = circle();
    let mut a = Animator::new("c", x_motion(0.0, 10.0))
        .with_timing(100.0, 0.0)
        .with_ease(Ease::Linear)
        .with_loop_mode(LoopMode::PingPong);
    a.seek(130.0, &mut shape);
    assert!((x_of(&shape) - 7.0).abs() < 1e-9);
    a.seek(230.0, &mut shape);
    assert!((x_of(&shape) - 3.0).abs() < 1e-9);
}

#[test]
fn color_property_interpolates() {
    let m = PropertyMotion {
        property: "color".into(),
        from: PropValue::Color(Rgba8::BLACK),
        to: PropValue::Color(Rgba8::WHITE),
    };
    assert_eq!(m.value_at(0.5), PropValue::Color(Rgba8::new(128, 128, 128, 255)));
}

#[test]
fn text_property_steps_at_completion() {
    let m = PropertyMotion {
        property: "text".into(),
        from: PropValue::Text("a".into()),
        to: PropValue::Text("b".into()),
    };
    assert_eq!(m.value_at(0.99), PropValue::Text("a".into()));
    assert_eq!(m.value_at(1.0), PropValue::Text("b".into()));
}

#[test]
fn orbit_stays_on_circle() {
    let orbit = OrbitMotion {
        center: Point::new(100.0, 100.0),
        radius: 50.0,
        start_angle: 0.3,
        clockwise: false,
    };
    for i in 0..=20 {
        let p = orbit.point_at(i as f64 / 20.0);
        assert!((p.distance(orbit.center) - 50.0).abs() < 1e-9);
    }
}

#[test]
fn orbit_quarter_turn_clockwise() {
    let mut shape = circle();
    let mut a = Animator::new(
        "c",
        Motion::Orbit(OrbitMotion {
            center: Point::new(100.0, 100.0),
            radius: 50.0,
            start_angle: 0.0,
            clockwise: true,
        }),
    )
    .with_timing(2000.0, 0.0)
    .with_ease(Ease::Linear);
    a.start(0.0);
    a.update(500.0, &mut shape);
    let p = shape.view().position();
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 150.0).abs() < 1e-9);
}

#[test]
fn zero_radius_orbit_is_the_center() {
    let orbit = OrbitMotion {
        center: Point::new(3.0, 4.0),
        radius: 0.0,
        start_angle: 0.0,
        clockwise: true,
    };
    assert_eq!(orbit.point_at(0.37), Point::new(3.0, 4.0));
}

#[test]
fn path_endpoints_and_arc_length() {
    let path = PathMotion::new(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 30.0),
    ])
    .unwrap();
    assert_eq!(path.total_length(), 40.0);
    assert_eq!(path.point_at(0.0), Point::new(0.0, 0.0));
    assert_eq!(path.point_at(1.0), Point::new(10.0, 30.0));
    assert_eq!(path.point_at(0.25), Point::new(10.0, 0.0));
    let mid = path.point_at(0.5);
    assert!((mid.x - 10.0).abs() < 1e-9 && (mid.y - 10.0).abs() < 1e-9);
}

#[test]
fn degenerate_paths_hold_their_point() {
    assert!(PathMotion::new(Vec::new()).is_none());
    let single = PathMotion::new(vec![Point::new(7.0, 8.0)]).unwrap();
    assert_eq!(single.point_at(0.6), Point::new(7.0, 8.0));
    let coincident = PathMotion::new(vec![Point::new(1.0, 1.0); 3]).unwrap();
    assert_eq!(coincident.point_at(1.0), Point::new(1.0, 1.0));
}

#[test]
fn later_writer_wins_on_shared_axis() {
    let mut shape = circle();
    let mut prop = Animator::new("c", x_motion(0.0, 10.0))
        .with_timing(100.0, 0.0)
        .with_ease(Ease::Linear);
    let mut orbit = Animator::new(
        "c",
        Motion::Orbit(OrbitMotion {
            center: Point::new(0.0, 0.0),
            radius: 5.0,
            start_angle: 0.0,
            clockwise: true,
        }),
    )
    .with_timing(100.0, 0.0)
    .with_ease(Ease::Linear);
    prop.start(0.0);
    orbit.start(0.0);
    prop.update(0.0, &mut shape);
    orbit.update(0.0, &mut shape);
    assert_eq!(x_of(&shape), 5.0);
}
