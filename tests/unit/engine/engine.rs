use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::render::surface::RecordingSurface;
use crate::timeline::clock::ManualClock;

fn engine_with(config: EngineConfig) -> (Engine, ManualClock) {
    let clock = ManualClock::new();
    let surface = RecordingSurface::new(config.width, config.height);
    let engine = Engine::new(
        config,
        ShapeRegistry::with_builtins(),
        Box::new(surface),
        Box::new(clock.clone()),
    )
    .unwrap();
    (engine, clock)
}

fn engine() -> (Engine, ManualClock) {
    engine_with(EngineConfig::default())
}

fn scene(v: serde_json::Value) -> SceneSpec {
    SceneSpec::from_value(v).unwrap()
}

fn pos(engine: &Engine, id: &str) -> Point {
    engine.shape(id).unwrap().view().position()
}

fn slide() -> SceneSpec {
    scene(json!({
        "id": "slide",
        "durationMs": 1000,
        "shapes": [{"id": "dot", "type": "circle", "x": 100, "y": 100}],
        "animations": [{
            "target": "#dot", "type": "property", "property": "x",
            "from": 100, "to": 400, "duration": 1000, "easing": "linear"
        }]
    }))
}

#[test]
fn property_animation_follows_the_clock() {
    let (mut e, clock) = engine();
    let report = e.load_from_spec(&slide()).unwrap();
    assert_eq!(report.shapes_created, 1);
    assert_eq!(report.animators_created, 1);
    assert!(report.warnings.is_empty());

    e.play().unwrap();
    clock.advance(500.0);
    assert!(e.frame().unwrap());
    assert!((pos(&e, "dot").x - 250.0).abs() < 1e-9);
}

#[test]
fn orbit_quarter_turn_after_seek() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&scene(json!({
        "durationMs": 2000,
        "shapes": [{"id": "moon", "type": "circle"}],
        "animations": [{
            "target": "moon", "type": "orbit", "centerX": 100, "centerY": 100,
            "radius": 50, "duration": 2000, "easing": "linear", "clockwise": true
        }]
    })))
    .unwrap();
    e.seek(500.0).unwrap();
    let p = pos(&e, "moon");
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 150.0).abs() < 1e-9);
}

#[test]
fn unknown_shape_type_warns_and_continues() {
    let (mut e, _clock) = engine();
    let report = e
        .load_from_spec(&scene(json!({
            "shapes": [
                {"id": "ghost", "type": "hexagram"},
                {"id": "ok", "type": "circle"}
            ]
        })))
        .unwrap();
    assert_eq!(report.shapes_created, 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, LoadWarningKind::UnknownShapeType);
    assert!(e.shape("ghost").is_none());
    assert_eq!(e.warnings(), report.warnings.as_slice());
}

#[test]
fn invalid_scene_fails_and_reports() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let (e, _clock) = engine();
    let mut e = e.with_callbacks(
        EngineCallbacks::new().on_error(move |err| sink.borrow_mut().push(err.to_string())),
    );

    let err = e
        .load_from_spec(&scene(json!({"durationMs": -5})))
        .unwrap_err();
    assert!(matches!(err, TweenError::InvalidScene(_)));
    assert!(e.load_from_json("not json").is_err());
    assert_eq!(errors.borrow().len(), 2);
}

#[test]
fn unresolved_target_and_unknown_easing_are_warnings() {
    let (mut e, _clock) = engine();
    let report = e
        .load_from_spec(&scene(json!({
            "shapes": [{"id": "a", "type": "circle"}],
            "animations": [
                {"target": "#missing", "type": "property", "property": "x", "to": 1},
                {"target": "#a", "type": "property", "property": "x", "to": 1, "easing": "wobble"}
            ]
        })))
        .unwrap();
    let kinds: Vec<_> = report.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![LoadWarningKind::UnresolvedTarget, LoadWarningKind::UnknownEasing]
    );
    assert_eq!(report.animators_created, 1);
    assert_eq!(e.animators()[0].ease, Ease::default());
}

#[test]
fn class_selector_fans_out_to_every_match() {
    let (mut e, _clock) = engine();
    let report = e
        .load_from_spec(&scene(json!({
            "shapes": [
                {"id": "a", "type": "circle", "class": "dots"},
                {"id": "b", "type": "circle", "className": "dots big"},
                {"id": "c", "type": "rectangle"}
            ],
            "animations": [
                {"target": [".dots", {"type": "rectangle"}], "type": "property", "property": "opacity", "to": 0}
            ]
        })))
        .unwrap();
    assert_eq!(report.animators_created, 3);
}

#[test]
fn later_orbit_overrides_earlier_x_animation() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&scene(json!({
        "durationMs": 1000,
        "shapes": [{"id": "s", "type": "circle"}],
        "animations": [
            {"target": "#s", "type": "property", "property": "x", "to": 700, "easing": "linear"},
            {"target": "#s", "type": "orbit", "cx": 0, "cy": 0, "radius": 10, "easing": "linear"}
        ]
    })))
    .unwrap();
    e.seek(250.0).unwrap();
    let p = pos(&e, "s");
    assert!(p.x.abs() < 1e-9);
    assert!((p.y - 10.0).abs() < 1e-9);
}

#[test]
fn missing_from_uses_static_value_and_aliases() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&scene(json!({
        "durationMs": 1000,
        "shapes": [{"id": "c", "type": "circle", "r": 10}],
        "animations": [{"target": "#c", "type": "property", "property": "r", "to": 30, "easing": "linear"}]
    })))
    .unwrap();
    e.seek(500.0).unwrap();
    let c = e.shape("c").unwrap();
    assert_eq!(c.view().number("radius"), 20.0);
    assert_eq!(c.static_props().get("radius"), Some(&PropValue::Number(10.0)));
}

#[test]
fn empty_path_is_skipped_with_warning() {
    let (mut e, _clock) = engine();
    let report = e
        .load_from_spec(&scene(json!({
            "shapes": [{"id": "p", "type": "circle"}],
            "animations": [{"target": "#p", "type": "path", "points": []}]
        })))
        .unwrap();
    assert_eq!(report.animators_created, 0);
    assert_eq!(report.warnings[0].kind, LoadWarningKind::InvalidAnimation);
}

#[test]
fn scene_loop_restarts_animators() {
    let (mut e, clock) = engine();
    let mut spec = slide();
    spec.looping = Some(true);
    e.load_from_spec(&spec).unwrap();
    e.play().unwrap();

    clock.advance(900.0);
    e.frame().unwrap();
    assert!((pos(&e, "dot").x - 370.0).abs() < 1e-9);

    clock.advance(200.0);
    e.frame().unwrap();
    let state = e.get_state().unwrap();
    assert_eq!(state.loop_count, 1);
    assert!((state.current_time_ms - 100.0).abs() < 1e-9);
    assert!((pos(&e, "dot").x - 130.0).abs() < 1e-9);
}

#[test]
fn lifecycle_callbacks_fire() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
    let (e, clock) = engine();
    let mut e = e.with_callbacks(
        EngineCallbacks::new()
            .on_ready(move |r| l1.borrow_mut().push(format!("ready {}", r.shapes_created)))
            .on_start(move || l2.borrow_mut().push("start".into()))
            .on_frame(move |t| l3.borrow_mut().push(format!("frame {t}")))
            .on_complete(move || l4.borrow_mut().push("complete".into())),
    );

    e.load_from_spec(&slide()).unwrap();
    e.play().unwrap();
    clock.advance(400.0);
    assert!(e.frame().unwrap());
    clock.advance(700.0);
    assert!(!e.frame().unwrap());
    assert!(!e.frame_pending());

    assert_eq!(
        *log.borrow(),
        vec!["ready 1", "start", "frame 400", "frame 1000", "complete"]
    );
    assert_eq!(e.get_state().unwrap().state, PlaybackState::Completed);
}

#[test]
fn pause_resume_keeps_position() {
    let (mut e, clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    e.play().unwrap();
    clock.advance(300.0);
    e.frame().unwrap();
    e.pause().unwrap();
    let paused_at = e.get_state().unwrap().current_time_ms;
    assert_eq!(paused_at, 300.0);

    clock.advance(5000.0);
    assert!(!e.frame().unwrap());
    e.play().unwrap();
    clock.advance(100.0);
    e.frame().unwrap();
    assert_eq!(e.get_state().unwrap().current_time_ms, 400.0);
}

#[test]
fn stop_resets_to_start() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    e.seek(800.0).unwrap();
    e.stop().unwrap();
    let state = e.get_state().unwrap();
    assert_eq!(state.state, PlaybackState::Stopped);
    assert_eq!(state.current_time_ms, 0.0);
    assert_eq!(pos(&e, "dot").x, 100.0);
}

#[test]
fn seek_twice_is_idempotent() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    e.seek(640.0).unwrap();
    let first = (e.get_state().unwrap(), pos(&e, "dot"));
    e.seek(640.0).unwrap();
    assert_eq!((e.get_state().unwrap(), pos(&e, "dot")), first);
}

#[test]
fn invalid_playback_rate_changes_nothing() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    e.set_playback_rate(2.0).unwrap();
    assert!(matches!(
        e.set_playback_rate(0.0),
        Err(TweenError::InvalidPlaybackRate(_))
    ));
    assert_eq!(e.get_state().unwrap().playback_rate, 2.0);
}

#[test]
fn export_sequence_restores_paused_state() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    e.play().unwrap();
    e.pause().unwrap();
    e.seek(250.0).unwrap();
    let before = e.get_state().unwrap();

    let frames = e
        .export_sequence(0.0, 1000.0, 30.0, ExportFormat::Png)
        .unwrap();
    assert_eq!(frames.len(), 31);
    assert_eq!(frames[0].time_ms, 0.0);
    assert_eq!(frames[30].time_ms, 1000.0);
    assert!(frames.iter().all(|f| f.bytes.starts_with(b"\x89PNG")));

    assert_eq!(e.get_state().unwrap(), before);
    assert!((pos(&e, "dot").x - 175.0).abs() < 1e-9);
}

#[test]
fn export_sequence_resumes_live_playback() {
    let (mut e, clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    e.play().unwrap();
    clock.advance(200.0);
    e.frame().unwrap();

    e.export_sequence(0.0, 100.0, 10.0, ExportFormat::Jpeg)
        .unwrap();
    assert!(e.frame_pending());
    assert_eq!(e.get_state().unwrap().state, PlaybackState::Playing);
    clock.advance(100.0);
    e.frame().unwrap();
    assert_eq!(e.get_state().unwrap().current_time_ms, 300.0);
}

#[test]
fn add_and_remove_shapes_between_ticks() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    let id = e
        .add_shape(&ShapeSpec::new("star").with_property("x", json!(50)))
        .unwrap();
    assert_eq!(id, "star-1");
    assert!(e.add_shape(&ShapeSpec::new("circle").with_id("dot")).is_err());
    assert_eq!(e.layers().next().map(|(_, ids)| ids.len()), Some(2));

    assert!(e.remove_shape("dot").unwrap());
    assert!(!e.remove_shape("dot").unwrap());
    assert!(e.animators().is_empty());
    assert_eq!(e.shape("star-1").unwrap().id(), "star-1");
    assert_eq!(e.get_state().unwrap().shape_count, 1);
}

#[test]
fn destroy_is_idempotent() {
    let (mut e, _clock) = engine();
    e.load_from_spec(&slide()).unwrap();
    e.destroy();
    e.destroy();
    assert!(e.is_destroyed());
    assert!(e.shapes().is_empty());
    assert!(!e.frame_pending());
    assert!(matches!(e.play(), Err(TweenError::Destroyed)));
    assert!(matches!(e.frame(), Err(TweenError::Destroyed)));
    assert!(matches!(e.get_state(), Err(TweenError::Destroyed)));
    assert!(matches!(e.load_from_spec(&slide()), Err(TweenError::Destroyed)));
}

#[test]
fn scene_normalization_maps_shapes_and_motion() {
    let (mut e, _clock) = engine_with(EngineConfig {
        width: 200,
        height: 200,
        normalize_padding: 0.0,
        ..EngineConfig::default()
    });
    e.load_from_spec(&scene(json!({
        "normalizeCoordinates": true,
        "shapes": [
            {"id": "a", "type": "circle", "x": 0, "y": 0},
            {"id": "b", "type": "circle", "x": 1000, "y": 1000}
        ],
        "animations": [{"target": "#a", "type": "property", "property": "x", "from": 0, "to": 500, "easing": "linear"}]
    })))
    .unwrap();
    assert_eq!(pos(&e, "b"), Point::new(200.0, 200.0));
    e.seek(1000.0).unwrap();
    assert!((pos(&e, "a").x - 100.0).abs() < 1e-9);
}

#[test]
fn auto_play_starts_after_load() {
    let (mut e, _clock) = engine_with(EngineConfig {
        auto_play: true,
        ..EngineConfig::default()
    });
    e.load_from_spec(&slide()).unwrap();
    assert_eq!(e.get_state().unwrap().state, PlaybackState::Playing);
    assert!(e.frame_pending());
}

#[test]
fn viewport_culling_shows_in_stats() {
    let (mut e, _clock) = engine_with(EngineConfig {
        width: 100,
        height: 100,
        ..EngineConfig::default()
    });
    e.load_from_spec(&scene(json!({
        "shapes": [
            {"id": "near", "type": "circle", "x": 50, "y": 50},
            {"id": "far", "type": "circle", "x": 900, "y": 900}
        ]
    })))
    .unwrap();
    let stats = e.get_performance_stats().unwrap();
    assert_eq!((stats.rendered, stats.culled), (1, 1));

    e.set_viewport(850.0, 850.0, 1.0).unwrap();
    let stats = e.get_performance_stats().unwrap();
    assert_eq!((stats.rendered, stats.culled), (1, 1));
    assert!(e.set_viewport(0.0, 0.0, -1.0).is_err());
}

#[test]
fn resize_rejects_zero() {
    let (mut e, _clock) = engine();
    assert!(e.resize(0, 10).is_err());
    e.resize(320, 240).unwrap();
    assert_eq!(e.get_state().unwrap().viewport.width, 320.0);
}
