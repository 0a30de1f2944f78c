use std::collections::{HashMap, VecDeque};

use crate::animation::animator::{
    Animator, LoopMode, Motion, OrbitMotion, PathMotion, PropertyMotion,
};
use crate::animation::ease::Ease;
use crate::config::EngineConfig;
use crate::engine::callbacks::EngineCallbacks;
use crate::foundation::core::Point;
use crate::foundation::error::{TweenError, TweenResult};
use crate::render::cpu::CpuSurface;
use crate::render::export::{ExportFormat, ExportedFrame, encode_frame, sequence_times};
use crate::render::renderer::{RenderStats, Renderer, Viewport};
use crate::render::surface::Surface;
use crate::scene::model::{AnimationSpec, MotionSpec, SceneSpec, ShapeSpec};
use crate::scene::normalize::{CoordinateMapping, apply_mapping, compute_mapping};
use crate::shape::model::Shape;
use crate::shape::props::{PropValue, canonical_key, json_to_prop};
use crate::shape::registry::ShapeRegistry;
use crate::timeline::clock::{Clock, SystemClock};
use crate::timeline::timeline::{PlaybackState, Timeline, TimelineEvent};

const DEFAULT_ORBIT_RADIUS: f64 = 50.0;
const SEQUENCE_QUALITY: f64 = 0.92;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadWarningKind {
    UnknownShapeType,
    InvalidProperty,
    DuplicateShapeId,
    UnresolvedTarget,
    UnknownEasing,
    InvalidAnimation,
}

/// A recoverable problem found while loading a scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LoadWarning {
    pub kind: LoadWarningKind,
    pub message: String,
}

impl LoadWarning {
    fn new(kind: LoadWarningKind, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(kind = ?kind, "{message}");
        Self { kind, message }
    }
}

/// Outcome of a successful load.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct LoadReport {
    pub scene_id: Option<String>,
    pub shapes_created: usize,
    pub animators_created: usize,
    pub warnings: Vec<LoadWarning>,
}

/// Playback and content summary returned by [`Engine::get_state`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EngineState {
    pub scene_id: Option<String>,
    pub state: PlaybackState,
    pub current_time_ms: f64,
    pub duration_ms: f64,
    pub playback_rate: f64,
    pub looping: bool,
    pub loop_count: u64,
    pub shape_count: usize,
    pub animator_count: usize,
    pub active_animator_count: usize,
    pub layer_count: usize,
    pub viewport: Viewport,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct PerformanceStats {
    pub fps: f64,
    pub target_fps: f64,
    pub frame_count: u64,
    pub dropped_frames: u64,
    pub last_render_ms: f64,
    pub avg_render_ms: f64,
    pub rendered: usize,
    pub culled: usize,
    pub hidden: usize,
    pub failed: usize,
}

/// Scene orchestrator: owns shapes and animators, drives the timeline and renders each frame.
///
/// All work happens on the caller's thread. The host calls [`Engine::frame`] from its
/// display-refresh callback while [`Engine::frame_pending`] is true.
pub struct Engine {
    config: EngineConfig,
    registry: ShapeRegistry,
    surface: Box<dyn Surface>,
    // `None` once destroyed.
    timeline: Option<Timeline>,
    shapes: Vec<Shape>,
    index: HashMap<String, usize>,
    animators: Vec<Animator>,
    renderer: Renderer,
    callbacks: EngineCallbacks,
    warnings: Vec<LoadWarning>,
    scene_id: Option<String>,
    render_times: VecDeque<f64>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scene_id", &self.scene_id)
            .field("timeline", &self.timeline)
            .field("shapes", &self.shapes.len())
            .field("animators", &self.animators.len())
            .field("renderer", &self.renderer)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        registry: ShapeRegistry,
        surface: Box<dyn Surface>,
        clock: Box<dyn Clock>,
    ) -> TweenResult<Self> {
        config.validate()?;
        let (w, h) = surface.size();
        let mut renderer = Renderer::new(f64::from(w), f64::from(h));
        renderer.set_background(config.background_color()?);
        renderer.set_dirty_tracking(config.dirty_regions);
        let timeline = Timeline::new(
            clock,
            config.default_duration_ms,
            config.default_fps,
            config.default_loop,
        )
        .with_fps_window(config.fps_sample_window);

        Ok(Self {
            config,
            registry,
            surface,
            timeline: Some(timeline),
            shapes: Vec::new(),
            index: HashMap::new(),
            animators: Vec::new(),
            renderer,
            callbacks: EngineCallbacks::default(),
            warnings: Vec::new(),
            scene_id: None,
            render_times: VecDeque::new(),
        })
    }

    /// CPU raster surface, wall clock and the built-in shape kinds.
    pub fn headless(config: EngineConfig) -> TweenResult<Self> {
        config.validate()?;
        let mut surface = CpuSurface::new(config.width, config.height, config.pixel_ratio)?;
        if let Some(path) = &config.font_path {
            surface = surface.with_font_file(path)?;
        }
        Self::new(
            config,
            ShapeRegistry::with_builtins(),
            Box::new(surface),
            Box::new(SystemClock::new()),
        )
    }

    pub fn with_callbacks(mut self, callbacks: EngineCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn set_callbacks(&mut self, callbacks: EngineCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn is_destroyed(&self) -> bool {
        self.timeline.is_none()
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.index.get(id).map(|&i| &self.shapes[i])
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn animators(&self) -> &[Animator] {
        &self.animators
    }

    pub fn layers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.renderer
            .layer_names()
            .filter_map(|name| self.renderer.layer(name).map(|ids| (name, ids)))
    }

    /// Warnings from the most recent load.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn frame_pending(&self) -> bool {
        self.timeline.as_ref().is_some_and(Timeline::frame_pending)
    }

    pub fn load_from_json(&mut self, json: &str) -> TweenResult<LoadReport> {
        self.ensure_live()?;
        match SceneSpec::from_json(json) {
            Ok(spec) => self.load_from_spec(&spec),
            Err(err) => self.fail(err),
        }
    }

    /// Replace the current scene.
    ///
    /// Structural problems fail the whole load. Unknown shape types, unresolved targets and
    /// similar per-entry problems are logged, collected into the report and skipped.
    #[tracing::instrument(skip_all, fields(scene = spec.id.as_deref().unwrap_or("")))]
    pub fn load_from_spec(&mut self, spec: &SceneSpec) -> TweenResult<LoadReport> {
        self.ensure_live()?;
        if let Err(err) = spec.validate() {
            return self.fail(err);
        }

        self.shapes.clear();
        self.index.clear();
        self.animators.clear();
        self.renderer.clear_all();
        self.warnings.clear();
        self.scene_id = spec.id.clone();

        let duration = spec.duration_ms.unwrap_or(self.config.default_duration_ms);
        let fps = spec.fps.unwrap_or(self.config.default_fps);
        let looping = spec.looping.unwrap_or(self.config.default_loop);
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.configure(duration, fps, looping);
            timeline.drain_events();
        }

        let mut warnings = Vec::new();
        for (i, shape_spec) in spec.shapes.iter().enumerate() {
            let fallback = format!("{}-{i}", shape_spec.kind.trim().to_ascii_lowercase());
            match self.registry.try_create(shape_spec, &fallback) {
                Ok(created) => {
                    let id = created.shape.id().to_owned();
                    warnings.extend(created.warnings.into_iter().map(|w| {
                        LoadWarning::new(LoadWarningKind::InvalidProperty, format!("{id}: {w}"))
                    }));
                    if self.index.contains_key(&id) {
                        warnings.push(LoadWarning::new(
                            LoadWarningKind::DuplicateShapeId,
                            format!("shape id '{id}' already used, entry #{i} skipped"),
                        ));
                        continue;
                    }
                    self.index.insert(id, self.shapes.len());
                    self.shapes.push(created.shape);
                }
                Err(err @ TweenError::UnknownShapeType(_)) => {
                    warnings.push(LoadWarning::new(
                        LoadWarningKind::UnknownShapeType,
                        format!("{err} (entry #{i} skipped)"),
                    ));
                }
                Err(err) => {
                    warnings.push(LoadWarning::new(
                        LoadWarningKind::InvalidProperty,
                        format!("entry #{i} skipped: {err}"),
                    ));
                }
            }
        }

        let mapping = if spec
            .normalize_coordinates
            .unwrap_or(self.config.normalize_coordinates)
        {
            let vp = self.renderer.viewport();
            compute_mapping(
                &self.shapes,
                vp.width,
                vp.height,
                self.config.normalize_padding,
            )
        } else {
            None
        };
        if let Some(m) = &mapping {
            tracing::debug!(scale = ?m.scale(), "normalizing scene coordinates");
            apply_mapping(&mut self.shapes, m);
        }

        for shape in &self.shapes {
            self.renderer.add_to_layer(&shape.layer, shape.id());
        }

        for (i, anim) in spec.animations.iter().enumerate() {
            self.add_animation(i, anim, mapping.as_ref(), &mut warnings);
        }

        self.evaluate_at(0.0);
        self.warnings = warnings.clone();
        let report = LoadReport {
            scene_id: self.scene_id.clone(),
            shapes_created: self.shapes.len(),
            animators_created: self.animators.len(),
            warnings,
        };
        tracing::debug!(
            shapes = report.shapes_created,
            animators = report.animators_created,
            warnings = report.warnings.len(),
            "scene loaded"
        );

        if let Err(err) = self.draw(true) {
            return self.fail(err);
        }
        self.callbacks.ready(&report);
        if self.config.auto_play {
            self.play()?;
        }
        Ok(report)
    }

    fn add_animation(
        &mut self,
        i: usize,
        anim: &AnimationSpec,
        mapping: Option<&CoordinateMapping>,
        warnings: &mut Vec<LoadWarning>,
    ) {
        let targets = anim.target.resolve(&self.shapes);
        if targets.is_empty() {
            let err = TweenError::unresolved_target(anim.target.describe());
            warnings.push(LoadWarning::new(
                LoadWarningKind::UnresolvedTarget,
                format!("animation #{i} skipped: {err}"),
            ));
            return;
        }

        let ease = match anim.easing.as_deref() {
            None => Ease::default(),
            Some(name) => Ease::from_name(name).unwrap_or_else(|| {
                warnings.push(LoadWarning::new(
                    LoadWarningKind::UnknownEasing,
                    format!("animation #{i}: unknown easing '{name}', using default"),
                ));
                Ease::default()
            }),
        };
        let loop_mode = if anim.alternate {
            LoopMode::PingPong
        } else if anim.looping {
            LoopMode::Loop
        } else {
            LoopMode::None
        };

        for id in targets {
            let Some(&idx) = self.index.get(&id) else {
                continue;
            };
            match build_motion(&anim.motion, &self.shapes[idx], mapping) {
                Ok(motion) => self.animators.push(
                    Animator::new(id, motion)
                        .with_timing(anim.duration, anim.delay)
                        .with_ease(ease)
                        .with_loop_mode(loop_mode),
                ),
                Err(msg) => warnings.push(LoadWarning::new(
                    LoadWarningKind::InvalidAnimation,
                    format!("animation #{i} on '{id}' skipped: {msg}"),
                )),
            }
        }
    }

    /// Frame-callback entry point. Returns whether another frame is requested.
    pub fn frame(&mut self) -> TweenResult<bool> {
        let timeline = self.live_timeline()?;
        let Some(t) = timeline.tick() else {
            return Ok(timeline.frame_pending());
        };
        let events = timeline.drain_events();

        if events
            .iter()
            .any(|e| matches!(e, TimelineEvent::Looped(_)))
        {
            self.evaluate_at(t);
        } else {
            self.advance_to(t);
        }
        if let Err(err) = self.draw(false) {
            return self.fail(err);
        }
        self.callbacks.frame(t);
        if events.contains(&TimelineEvent::Completed) {
            self.callbacks.complete();
        }
        Ok(self.frame_pending())
    }

    pub fn play(&mut self) -> TweenResult<()> {
        let timeline = self.live_timeline()?;
        timeline.play();
        let t = timeline.current_time();
        if timeline.drain_events().contains(&TimelineEvent::Started) {
            self.evaluate_at(t);
            self.callbacks.start();
        }
        Ok(())
    }

    pub fn pause(&mut self) -> TweenResult<()> {
        let timeline = self.live_timeline()?;
        timeline.pause();
        let t = timeline.current_time();
        if timeline.drain_events().contains(&TimelineEvent::Paused) {
            self.advance_to(t);
            self.draw(true)?;
        }
        Ok(())
    }

    pub fn stop(&mut self) -> TweenResult<()> {
        let timeline = self.live_timeline()?;
        timeline.stop();
        timeline.drain_events();
        self.evaluate_at(0.0);
        self.draw(true)?;
        Ok(())
    }

    /// Jump to `time_ms` (clamped to the scene) and redraw, in any playback state.
    pub fn seek(&mut self, time_ms: f64) -> TweenResult<()> {
        let timeline = self.live_timeline()?;
        timeline.seek(time_ms);
        timeline.drain_events();
        let t = timeline.current_time();
        self.evaluate_at(t);
        self.draw(true)?;
        self.callbacks.frame(t);
        Ok(())
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> TweenResult<()> {
        self.live_timeline()?.set_playback_rate(rate)
    }

    pub fn set_loop(&mut self, looping: bool) -> TweenResult<()> {
        self.live_timeline()?.set_loop(looping);
        Ok(())
    }

    pub fn set_dirty_regions(&mut self, enabled: bool) -> TweenResult<()> {
        self.ensure_live()?;
        self.config.dirty_regions = enabled;
        self.renderer.set_dirty_tracking(enabled);
        Ok(())
    }

    /// Resize the drawing surface. Device scaling is reapplied at the configured pixel ratio.
    pub fn resize(&mut self, width: u32, height: u32) -> TweenResult<()> {
        self.ensure_live()?;
        if width == 0 || height == 0 {
            return Err(TweenError::validation(format!(
                "surface size must be non-zero, got {width}x{height}"
            )));
        }
        self.surface
            .resize(width, height, self.config.pixel_ratio)?;
        self.config.width = width;
        self.config.height = height;
        self.renderer
            .set_surface_size(f64::from(width), f64::from(height));
        self.draw(true)?;
        Ok(())
    }

    pub fn set_viewport(&mut self, x: f64, y: f64, scale: f64) -> TweenResult<()> {
        self.ensure_live()?;
        self.renderer.set_viewport(x, y, scale)?;
        self.draw(true)?;
        Ok(())
    }

    pub fn get_state(&self) -> TweenResult<EngineState> {
        let timeline = self.timeline.as_ref().ok_or(TweenError::Destroyed)?;
        Ok(EngineState {
            scene_id: self.scene_id.clone(),
            state: timeline.state(),
            current_time_ms: timeline.current_time(),
            duration_ms: timeline.duration(),
            playback_rate: timeline.playback_rate(),
            looping: timeline.is_looping(),
            loop_count: timeline.loop_count(),
            shape_count: self.shapes.len(),
            animator_count: self.animators.len(),
            active_animator_count: self.animators.iter().filter(|a| !a.is_complete()).count(),
            layer_count: self.renderer.layer_names().count(),
            viewport: self.renderer.viewport(),
        })
    }

    pub fn get_performance_stats(&self) -> TweenResult<PerformanceStats> {
        let timeline = self.timeline.as_ref().ok_or(TweenError::Destroyed)?;
        let last = self.renderer.last_stats();
        let avg = if self.render_times.is_empty() {
            0.0
        } else {
            self.render_times.iter().sum::<f64>() / self.render_times.len() as f64
        };
        Ok(PerformanceStats {
            fps: timeline.fps(),
            target_fps: timeline.target_fps(),
            frame_count: timeline.frame_count(),
            dropped_frames: timeline.dropped_frame_count(),
            last_render_ms: last.render_ms,
            avg_render_ms: avg,
            rendered: last.rendered,
            culled: last.culled,
            hidden: last.hidden,
            failed: last.failed,
        })
    }

    /// Capture the current frame. `quality` (0..1) only affects JPEG.
    pub fn export_frame(&mut self, format: ExportFormat, quality: f64) -> TweenResult<ExportedFrame> {
        let t = self.live_timeline()?.current_time();
        self.draw(true)?;
        self.capture(t, format, quality)
    }

    /// Render `start_ms..=end_ms` at `frame_rate` without disturbing live playback.
    ///
    /// Playback is suspended for the duration of the export and restored afterwards, with
    /// the scene re-evaluated at the time it was left at. No frame callbacks fire.
    #[tracing::instrument(skip(self))]
    pub fn export_sequence(
        &mut self,
        start_ms: f64,
        end_ms: f64,
        frame_rate: f64,
        format: ExportFormat,
    ) -> TweenResult<Vec<ExportedFrame>> {
        let times = sequence_times(start_ms, end_ms, frame_rate)?;
        let timeline = self.live_timeline()?;
        let saved = timeline.snapshot();
        timeline.pause();

        let result = self.capture_sequence(&times, format);

        if let Some(timeline) = self.timeline.as_mut() {
            timeline.restore(saved);
            timeline.drain_events();
        }
        self.evaluate_at(saved.current_time_ms);
        self.draw(true)?;
        tracing::debug!(frames = times.len(), "sequence exported");
        result
    }

    fn capture_sequence(
        &mut self,
        times: &[f64],
        format: ExportFormat,
    ) -> TweenResult<Vec<ExportedFrame>> {
        let mut frames = Vec::with_capacity(times.len());
        for &time in times {
            let timeline = self.live_timeline()?;
            timeline.seek(time);
            timeline.drain_events();
            let t = timeline.current_time();
            self.evaluate_at(t);
            self.draw(true)?;
            frames.push(self.capture(t, format, SEQUENCE_QUALITY)?);
        }
        Ok(frames)
    }

    fn capture(&mut self, time_ms: f64, format: ExportFormat, quality: f64) -> TweenResult<ExportedFrame> {
        let frame = self.surface.snapshot()?;
        let bytes = encode_frame(&frame, format, quality)?;
        Ok(ExportedFrame {
            time_ms,
            format,
            width: frame.width,
            height: frame.height,
            bytes,
        })
    }

    /// Add one shape between ticks. Returns its id.
    pub fn add_shape(&mut self, spec: &ShapeSpec) -> TweenResult<String> {
        self.ensure_live()?;
        let kind = spec.kind.trim().to_ascii_lowercase();
        let mut n = self.shapes.len();
        let mut fallback = format!("{kind}-{n}");
        while self.index.contains_key(&fallback) {
            n += 1;
            fallback = format!("{kind}-{n}");
        }

        let created = self.registry.try_create(spec, &fallback)?;
        let id = created.shape.id().to_owned();
        if self.index.contains_key(&id) {
            return Err(TweenError::validation(format!("shape id '{id}' already exists")));
        }
        for w in &created.warnings {
            tracing::warn!(shape_id = %id, "{w}");
        }
        self.renderer.add_to_layer(&created.shape.layer, &id);
        self.index.insert(id.clone(), self.shapes.len());
        self.shapes.push(created.shape);
        Ok(id)
    }

    /// Remove a shape, its animators and its layer membership.
    pub fn remove_shape(&mut self, id: &str) -> TweenResult<bool> {
        self.ensure_live()?;
        let Some(idx) = self.index.remove(id) else {
            return Ok(false);
        };
        self.shapes.remove(idx);
        self.reindex();
        self.animators.retain(|a| a.target() != id);
        self.renderer.remove_shape(id);
        Ok(true)
    }

    /// Release the scene and the timeline. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.timeline.take().is_none() {
            return;
        }
        self.shapes.clear();
        self.index.clear();
        self.animators.clear();
        self.renderer.clear_all();
        self.warnings.clear();
        self.render_times.clear();
        self.callbacks = EngineCallbacks::default();
        tracing::debug!("engine destroyed");
    }

    fn ensure_live(&self) -> TweenResult<()> {
        if self.timeline.is_some() {
            Ok(())
        } else {
            Err(TweenError::Destroyed)
        }
    }

    fn live_timeline(&mut self) -> TweenResult<&mut Timeline> {
        self.timeline.as_mut().ok_or(TweenError::Destroyed)
    }

    fn fail<T>(&mut self, err: TweenError) -> TweenResult<T> {
        tracing::warn!(error = %err, "engine error");
        self.callbacks.error(&err);
        Err(err)
    }

    fn reindex(&mut self) {
        self.index = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id().to_owned(), i))
            .collect();
    }

    /// Reset overlays and evaluate every animator from scratch at `time`.
    fn evaluate_at(&mut self, time: f64) {
        for shape in &mut self.shapes {
            shape.reset_animated_properties();
        }
        for anim in &mut self.animators {
            if let Some(&i) = self.index.get(anim.target()) {
                anim.seek(time, &mut self.shapes[i]);
            }
        }
    }

    fn advance_to(&mut self, time: f64) {
        for anim in &mut self.animators {
            if let Some(&i) = self.index.get(anim.target()) {
                anim.update(time, &mut self.shapes[i]);
            }
        }
    }

    fn draw(&mut self, force_full: bool) -> TweenResult<RenderStats> {
        let shapes = &self.shapes;
        let index = &self.index;
        let stats = self.renderer.render(
            self.surface.as_mut(),
            |id| index.get(id).map(|&i| &shapes[i]),
            None,
            force_full,
        )?;
        if self.render_times.len() == self.config.fps_sample_window {
            self.render_times.pop_front();
        }
        self.render_times.push_back(stats.render_ms);
        Ok(stats)
    }
}

fn build_motion(
    spec: &MotionSpec,
    shape: &Shape,
    mapping: Option<&CoordinateMapping>,
) -> Result<Motion, String> {
    let map_point = |p: Point| mapping.map_or(p, |m| m.map_point(p));
    match spec {
        MotionSpec::Property { property, from, to } => {
            let key = canonical_key(shape.type_name(), property);
            let convert = |v: &serde_json::Value| -> Result<PropValue, String> {
                let value = json_to_prop(&key, v)?
                    .ok_or_else(|| format!("property '{key}' has no usable value"))?;
                Ok(match mapping {
                    Some(m) => m.map_property(&key, value),
                    None => value,
                })
            };
            let to = convert(to)?;
            let from = match from {
                Some(v) => convert(v)?,
                None => shape
                    .static_props()
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| format!("'{key}' has no 'from' and no current value"))?,
            };
            Ok(Motion::Property(PropertyMotion {
                property: key,
                from,
                to,
            }))
        }
        MotionSpec::Orbit {
            center_x,
            center_y,
            radius,
            start_angle,
            clockwise,
        } => {
            let pos = shape.view().position();
            let center = match (center_x, center_y) {
                (None, None) => pos,
                (x, y) => map_point(Point::new(x.unwrap_or(pos.x), y.unwrap_or(pos.y))),
            };
            let radius = radius.unwrap_or(DEFAULT_ORBIT_RADIUS);
            if !(radius.is_finite() && start_angle.is_finite()) {
                return Err("orbit radius and start angle must be finite".to_owned());
            }
            Ok(Motion::Orbit(OrbitMotion {
                center,
                radius: radius.abs(),
                start_angle: *start_angle,
                clockwise: *clockwise,
            }))
        }
        MotionSpec::Path { points } => {
            let points: Vec<Point> = points.iter().map(|p| map_point((*p).into())).collect();
            if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
                return Err("path points must be finite".to_owned());
            }
            PathMotion::new(points)
                .map(Motion::Path)
                .ok_or_else(|| "path has no points".to_owned())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/engine.rs"]
mod tests;
