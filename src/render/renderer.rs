use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::foundation::core::{Affine, Rect, Rgba8, rects_intersect};
use crate::foundation::error::{TweenError, TweenResult};
use crate::render::surface::Surface;
use crate::shape::model::Shape;

/// Logical camera: shapes at `(x, y)` land at the surface origin, scaled by `scale`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            width,
            height,
        }
    }

    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale) * Affine::translate((-self.x, -self.y))
    }

    /// Scene-space rectangle to surface space.
    pub fn to_screen(&self, r: Rect) -> Rect {
        self.transform().transform_rect_bbox(r)
    }

    pub fn screen_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Counters for one `render` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct RenderStats {
    pub rendered: usize,
    pub culled: usize,
    pub hidden: usize,
    pub failed: usize,
    pub full_clear: bool,
    pub regions_cleared: usize,
    pub render_ms: f64,
}

/// Draws shapes layer by layer with culling and optional dirty-region clearing.
///
/// Layers hold shape ids; the shapes themselves are owned by the caller.
#[derive(Debug)]
pub struct Renderer {
    viewport: Viewport,
    layers: BTreeMap<String, Vec<String>>,
    // shape id -> layer name
    membership: HashMap<String, String>,
    background: Rgba8,
    dirty_tracking: bool,
    dirty_regions: Vec<Rect>,
    needs_full_clear: bool,
    last_stats: RenderStats,
}

const DIRTY_PADDING: f64 = 2.0;

impl Renderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            layers: BTreeMap::new(),
            membership: HashMap::new(),
            background: Rgba8::TRANSPARENT,
            dirty_tracking: false,
            dirty_regions: Vec::new(),
            needs_full_clear: true,
            last_stats: RenderStats::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, x: f64, y: f64, scale: f64) -> TweenResult<()> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(TweenError::validation("viewport origin must be finite"));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(TweenError::validation(format!(
                "viewport scale must be finite and > 0, got {scale}"
            )));
        }
        self.viewport.x = x;
        self.viewport.y = y;
        self.viewport.scale = scale;
        self.needs_full_clear = true;
        Ok(())
    }

    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.needs_full_clear = true;
    }

    pub fn set_background(&mut self, color: Rgba8) {
        self.background = color;
        self.needs_full_clear = true;
    }

    pub fn dirty_tracking(&self) -> bool {
        self.dirty_tracking
    }

    pub fn set_dirty_tracking(&mut self, enabled: bool) {
        self.dirty_tracking = enabled;
        self.dirty_regions.clear();
        self.needs_full_clear = true;
    }

    pub fn dirty_regions(&self) -> &[Rect] {
        &self.dirty_regions
    }

    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Put `shape_id` in `layer`, removing it from any other layer first.
    pub fn add_to_layer(&mut self, layer: &str, shape_id: &str) {
        self.remove_shape(shape_id);
        self.layers
            .entry(layer.to_owned())
            .or_default()
            .push(shape_id.to_owned());
        self.membership.insert(shape_id.to_owned(), layer.to_owned());
        self.needs_full_clear = true;
    }

    pub fn remove_from_layer(&mut self, layer: &str, shape_id: &str) -> bool {
        let Some(ids) = self.layers.get_mut(layer) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|id| id != shape_id);
        let removed = ids.len() != before;
        if ids.is_empty() {
            self.layers.remove(layer);
        }
        if removed {
            self.membership.remove(shape_id);
            self.needs_full_clear = true;
        }
        removed
    }

    pub fn clear_layer(&mut self, layer: &str) {
        if let Some(ids) = self.layers.remove(layer) {
            for id in &ids {
                self.membership.remove(id);
            }
            self.needs_full_clear = true;
        }
    }

    /// Drop `shape_id` from whichever layer holds it.
    pub fn remove_shape(&mut self, shape_id: &str) {
        if let Some(layer) = self.membership.get(shape_id).cloned() {
            self.remove_from_layer(&layer, shape_id);
        }
    }

    pub fn layer_of(&self, shape_id: &str) -> Option<&str> {
        self.membership.get(shape_id).map(String::as_str)
    }

    pub fn clear_all(&mut self) {
        self.layers.clear();
        self.membership.clear();
        self.dirty_regions.clear();
        self.needs_full_clear = true;
    }

    /// Layer names in draw order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn layer(&self, name: &str) -> Option<&[String]> {
        self.layers.get(name).map(Vec::as_slice)
    }

    pub fn is_visible(&self, shape: &Shape) -> bool {
        rects_intersect(
            self.viewport.to_screen(shape.bounds()),
            self.viewport.screen_rect(),
        )
    }

    /// Draw one frame.
    ///
    /// With `explicit`, only those shapes are drawn, in z order; otherwise every layer is
    /// drawn in sorted-name order, each stably sorted by z index. `lookup` resolves ids to
    /// shapes. A shape that fails to draw is logged and skipped.
    #[tracing::instrument(level = "debug", skip_all, fields(force_full = force_full))]
    pub fn render<'a>(
        &mut self,
        surface: &mut dyn Surface,
        lookup: impl Fn(&str) -> Option<&'a Shape>,
        explicit: Option<&[&'a Shape]>,
        force_full: bool,
    ) -> TweenResult<RenderStats> {
        let started = Instant::now();
        let mut stats = RenderStats::default();

        let partial = self.dirty_tracking && !force_full && !self.needs_full_clear;
        if partial {
            for r in &self.dirty_regions {
                surface.clear_rect(*r, self.background)?;
            }
            stats.regions_cleared = self.dirty_regions.len();
        } else {
            surface.clear(self.background)?;
            stats.full_clear = true;
        }
        self.needs_full_clear = false;

        let draw_list: Vec<&'a Shape> = match explicit {
            Some(shapes) => {
                let mut v = shapes.to_vec();
                v.sort_by_key(|s| s.z_index);
                v
            }
            None => self
                .layers
                .values()
                .flat_map(|ids| {
                    let mut v: Vec<&'a Shape> = ids.iter().filter_map(|id| lookup(id)).collect();
                    v.sort_by_key(|s| s.z_index);
                    v
                })
                .collect(),
        };

        let mut drawn_regions = Vec::new();
        surface.save();
        surface.set_transform(self.viewport.transform());
        for shape in draw_list {
            if !shape.visible {
                stats.hidden += 1;
                continue;
            }
            shape.measure(surface);
            if !self.is_visible(shape) {
                stats.culled += 1;
                continue;
            }
            surface.save();
            let result = shape.render(surface);
            surface.restore();
            match result {
                Ok(()) => {
                    stats.rendered += 1;
                    if self.dirty_tracking {
                        let r = self.viewport.to_screen(shape.bounds());
                        drawn_regions.push(r.inflate(DIRTY_PADDING, DIRTY_PADDING).expand());
                    }
                }
                Err(err) => {
                    stats.failed += 1;
                    tracing::warn!(shape_id = shape.id(), error = %err, "shape failed to render");
                }
            }
        }
        surface.restore();
        surface.present()?;

        self.dirty_regions = drawn_regions;
        stats.render_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.last_stats = stats;
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
