use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{TweenError, TweenResult};
use crate::render::surface::Surface;
use crate::shape::props::{PropValue, Props, PropsView};

/// Behavior shared by every shape type.
///
/// Implementations are stateless: all per-instance data lives in the shape's property record.
pub trait ShapeKind: fmt::Debug {
    /// Registry name, e.g. `"circle"`.
    fn type_name(&self) -> &'static str;

    /// Kind-specific defaults merged into every instance.
    fn defaults(&self) -> Vec<(&'static str, PropValue)>;

    /// Unrotated bounds, before stroke padding.
    fn local_bounds(&self, props: &PropsView<'_>) -> Rect;

    /// Unrotated bounds measured with the surface's text engine, for kinds whose extent
    /// depends on text layout. `None` means [`ShapeKind::local_bounds`] is exact.
    fn measure(&self, _props: &PropsView<'_>, _surface: &mut dyn Surface) -> Option<Rect> {
        None
    }

    /// Draw in logical coordinates. Rotation and opacity are already applied.
    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()>;
}

/// A renderable scene item.
///
/// `props` holds the values from the scene description and never changes during playback.
/// Animators write into `overlay`; reads go through [`Shape::view`], where the overlay wins.
pub struct Shape {
    id: String,
    kind: Arc<dyn ShapeKind>,
    props: Props,
    overlay: Props,
    pub visible: bool,
    pub z_index: i32,
    pub layer: String,
    pub classes: Vec<String>,
    // `None` marks the cache dirty.
    bounds_cache: Cell<Option<Rect>>,
    measured: Cell<Option<Rect>>,
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("id", &self.id)
            .field("type", &self.kind.type_name())
            .field("layer", &self.layer)
            .field("z_index", &self.z_index)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Shape {
    pub fn new(id: impl Into<String>, kind: Arc<dyn ShapeKind>, props: Props) -> Self {
        Self {
            id: id.into(),
            kind,
            props,
            overlay: Props::new(),
            visible: true,
            z_index: 0,
            layer: "default".to_owned(),
            classes: Vec::new(),
            bounds_cache: Cell::new(None),
            measured: Cell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn static_props(&self) -> &Props {
        &self.props
    }

    pub fn overlay(&self) -> &Props {
        &self.overlay
    }

    pub fn view(&self) -> PropsView<'_> {
        PropsView::new(&self.props, &self.overlay)
    }

    /// Rewrite a static property outside of playback (coordinate normalization, editing).
    pub fn set_static_property(&mut self, key: impl Into<String>, value: PropValue) {
        self.props.set(key, value);
        self.invalidate_bounds();
    }

    /// Write an animated value; static properties are untouched.
    pub fn set_animated_property(&mut self, key: impl Into<String>, value: PropValue) {
        self.overlay.set(key, value);
        self.invalidate_bounds();
    }

    /// Drop every animated value so the shape reads its scene-description state again.
    pub fn reset_animated_properties(&mut self) {
        if !self.overlay.is_empty() {
            self.overlay.clear();
            self.invalidate_bounds();
        }
    }

    pub fn invalidate_bounds(&self) {
        self.bounds_cache.set(None);
        self.measured.set(None);
    }

    /// Refresh layout-dependent bounds against `surface`. Cheap once measured; any property
    /// change drops the measurement.
    pub fn measure(&self, surface: &mut dyn Surface) {
        if self.measured.get().is_some() {
            return;
        }
        if let Some(local) = self.kind.measure(&self.view(), surface) {
            self.measured.set(Some(local));
            self.bounds_cache.set(None);
        }
    }

    /// World-space bounds including rotation and stroke, cached until a property changes.
    pub fn bounds(&self) -> Rect {
        if let Some(b) = self.bounds_cache.get() {
            return b;
        }
        let view = self.view();
        let mut b = self
            .measured
            .get()
            .unwrap_or_else(|| self.kind.local_bounds(&view));
        let rotation = view.number("rotation");
        if rotation != 0.0 {
            b = Affine::rotate_about(rotation, view.position()).transform_rect_bbox(b);
        }
        let pad = view.number("stroke_width").max(0.0) / 2.0;
        if pad > 0.0 {
            b = b.inflate(pad, pad);
        }
        if !(b.x0.is_finite() && b.y0.is_finite() && b.x1.is_finite() && b.y1.is_finite()) {
            let p = view.position();
            b = Rect::from_points(p, p);
        }
        self.bounds_cache.set(Some(b));
        b
    }

    /// Draw with the shape's opacity and rotation applied. Callers own save/restore.
    pub fn render(&self, surface: &mut dyn Surface) -> TweenResult<()> {
        let view = self.view();
        let opacity = match view.get("opacity").and_then(PropValue::as_number) {
            Some(o) if o.is_finite() => o.clamp(0.0, 1.0),
            _ => 1.0,
        };
        if opacity <= 0.0 {
            return Ok(());
        }
        surface.set_global_alpha(surface.global_alpha() * opacity);

        let rotation = view.number("rotation");
        if rotation != 0.0 {
            surface.concat_transform(Affine::rotate_about(rotation, view.position()));
        }

        self.kind.draw(&view, surface).map_err(|err| match err {
            TweenError::Render { .. } => err,
            other => TweenError::render(&self.id, other.to_string()),
        })
    }

    /// Center of the current bounds.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/model.rs"]
mod tests;
