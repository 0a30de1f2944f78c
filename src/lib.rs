//! Tweenline is a declarative 2D animation engine.
//!
//! A scene description (shapes with static properties plus time-based animations) is loaded
//! into an [`Engine`], which drives a playback [`Timeline`], applies [`Animator`]s to shapes on
//! every tick and draws the result onto a [`Surface`].
//!
//! # Frame pipeline
//!
//! 1. **Tick**: the timeline turns a [`Clock`] reading into a scene time in `[0, duration]`
//! 2. **Animate**: every animator writes its eased value into its target shape's overlay
//! 3. **Render**: the [`Renderer`] clears (fully or by dirty region), culls against the
//!    viewport and draws each layer in name order, z-sorted within the layer
//! 4. **Export** (optional): frames are read back and encoded as PNG or JPEG
//!
//! Execution is single-threaded: the host calls [`Engine::frame`] from its refresh callback
//! while [`Engine::frame_pending`] is true. [`ManualClock`] plus [`RecordingSurface`] give a
//! fully deterministic headless setup for tests.
//!
//! # Example
//!
//! ```no_run
//! use tweenline::{Engine, EngineConfig};
//!
//! # fn main() -> Result<(), tweenline::TweenError> {
//! let mut engine = Engine::headless(EngineConfig::default())?;
//! engine.load_from_json(r##"{
//!     "durationMs": 1000,
//!     "shapes": [{"id": "dot", "type": "circle", "x": 100, "y": 100}],
//!     "animations": [{"target": "#dot", "type": "property", "property": "x", "to": 400}]
//! }"##)?;
//! engine.seek(500.0)?;
//! let png = engine.export_frame(tweenline::ExportFormat::Png, 1.0)?;
//! # let _ = png;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod animation;
mod config;
mod engine;
mod foundation;
mod render;
mod scene;
mod shape;
mod timeline;

pub use animation::animator::{
    Animator, AnimatorState, LoopMode, Motion, OrbitMotion, PathMotion, PropertyMotion,
};
pub use animation::ease::Ease;
pub use config::EngineConfig;
pub use engine::callbacks::EngineCallbacks;
pub use engine::engine::{
    Engine, EngineState, LoadReport, LoadWarning, LoadWarningKind, PerformanceStats,
};
pub use foundation::core::{
    Affine, BezPath, FrameRGBA, Lerp, Point, Rect, Rgba8, Vec2, rects_intersect,
};
pub use foundation::error::{TweenError, TweenResult};
pub use render::cpu::CpuSurface;
pub use render::export::{ExportFormat, ExportedFrame, encode_frame, jpeg_quality, sequence_times};
pub use render::renderer::{RenderStats, Renderer, Viewport};
pub use render::surface::{
    RecordingSurface, Surface, SurfaceOp, TextAlign, TextMetrics, heuristic_text_metrics,
};
pub use scene::model::{
    AnimationSpec, ClassTokens, MotionSpec, PointSpec, SceneSpec, Selector, ShapeSpec,
    TargetSpec,
};
pub use scene::normalize::{CoordinateMapping, apply_mapping, compute_mapping};
pub use shape::kinds::{
    Arrow, Bezier, Circle, CircularArc, Ellipse, Gradient, Line, Particles, Path, Polygon,
    Rectangle, Spiral, Star, Text, Wave,
};
pub use shape::model::{Shape, ShapeKind};
pub use shape::props::{
    DEFAULT_COLOR, NormalizedProps, PropValue, Props, PropsView, canonical_key, common_defaults,
    json_to_prop, normalize_properties,
};
pub use shape::registry::{CreatedShape, ShapeFactory, ShapeRegistry, builtin};
pub use timeline::clock::{Clock, ManualClock, SystemClock};
pub use timeline::timeline::{PlaybackSnapshot, PlaybackState, Timeline, TimelineEvent};
