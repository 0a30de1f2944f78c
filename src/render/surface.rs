use kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, FrameRGBA, Point, Rect, Rgba8};
use crate::foundation::error::{TweenError, TweenResult};

/// Horizontal anchoring for [`Surface::fill_text`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "center" | "middle" => Self::Center,
            "right" | "end" => Self::Right,
            _ => Self::Left,
        }
    }

    /// Offset from the anchor x to the left edge of a run of `width`.
    pub fn left_offset(self, width: f64) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => -width / 2.0,
            Self::Right => -width,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Immediate-mode 2D drawing target.
///
/// Coordinates are logical (CSS-pixel) units; implementations apply the device pixel ratio
/// internally. Text is positioned by its top edge, anchored horizontally per [`TextAlign`].
pub trait Surface {
    /// Logical size.
    fn size(&self) -> (u32, u32);
    fn pixel_ratio(&self) -> f64;
    /// Reallocate backing storage. Contents are cleared.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) -> TweenResult<()>;

    fn save(&mut self);
    fn restore(&mut self);
    fn transform(&self) -> Affine;
    fn set_transform(&mut self, transform: Affine);
    fn global_alpha(&self) -> f64;
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_fill(&mut self, color: Rgba8);
    fn set_stroke(&mut self, color: Rgba8, width: f64);

    fn fill_path(&mut self, path: &BezPath) -> TweenResult<()>;
    fn stroke_path(&mut self, path: &BezPath) -> TweenResult<()>;
    fn fill_rect(&mut self, rect: Rect) -> TweenResult<()>;
    fn fill_text(&mut self, text: &str, origin: Point, size: f64, align: TextAlign)
    -> TweenResult<()>;
    fn measure_text(&mut self, text: &str, size: f64) -> TextMetrics;

    /// Replace every pixel with `color`, ignoring the current transform.
    fn clear(&mut self, color: Rgba8) -> TweenResult<()>;
    /// Replace pixels inside a logical-space rectangle with `color`.
    fn clear_rect(&mut self, rect: Rect, color: Rgba8) -> TweenResult<()>;

    /// Make everything drawn so far visible in the backing store.
    fn present(&mut self) -> TweenResult<()>;
    /// Read back the current contents.
    fn snapshot(&mut self) -> TweenResult<FrameRGBA>;

    fn concat_transform(&mut self, transform: Affine) {
        let t = self.transform() * transform;
        self.set_transform(t);
    }
}

/// Width estimate used when no font is available for shaping.
pub fn heuristic_text_metrics(text: &str, size: f64) -> TextMetrics {
    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let lines = text.lines().count().max(1);
    TextMetrics {
        width: 0.6 * size * longest as f64,
        height: size * 1.2 * lines as f64,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PaintState {
    pub transform: Affine,
    pub alpha: f64,
    pub fill: Rgba8,
    pub stroke: Rgba8,
    pub stroke_width: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            fill: Rgba8::BLACK,
            stroke: Rgba8::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// Current paint state plus the save/restore stack shared by surface implementations.
#[derive(Clone, Debug, Default)]
pub(crate) struct PaintStack {
    pub current: PaintState,
    saved: Vec<PaintState>,
}

impl PaintStack {
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(s) = self.saved.pop() {
            self.current = s;
        }
    }

    pub fn reset(&mut self) {
        self.current = PaintState::default();
        self.saved.clear();
    }

    pub fn fill_color(&self) -> Rgba8 {
        self.current.fill.with_opacity(self.current.alpha)
    }

    pub fn stroke_color(&self) -> Rgba8 {
        self.current.stroke.with_opacity(self.current.alpha)
    }
}

/// One recorded drawing call. Geometry is the device-independent bounding box after the
/// current transform was applied.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Clear(Rgba8),
    ClearRect(Rect),
    FillPath { bounds: Rect, color: Rgba8 },
    StrokePath { bounds: Rect, color: Rgba8, width: f64 },
    FillRect { rect: Rect, color: Rgba8 },
    FillText { text: String, origin: Point, size: f64, color: Rgba8 },
    Present,
}

/// Surface that records calls instead of rasterizing.
///
/// Used by tests and by `inspect`-style tooling. Draws with a poisoned color fail, which makes
/// per-shape failure handling observable.
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    paint: PaintStack,
    ops: Vec<SurfaceOp>,
    poisoned: Option<Rgba8>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            paint: PaintStack::default(),
            ops: Vec::new(),
            poisoned: None,
        }
    }

    /// Fail every fill or stroke whose (pre-alpha) color equals `color`.
    pub fn poison_color(mut self, color: Rgba8) -> Self {
        self.poisoned = Some(color);
        self
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of recorded fill and stroke operations.
    pub fn draw_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    SurfaceOp::FillPath { .. }
                        | SurfaceOp::StrokePath { .. }
                        | SurfaceOp::FillRect { .. }
                        | SurfaceOp::FillText { .. }
                )
            })
            .count()
    }

    fn check_poison(&self, color: Rgba8) -> TweenResult<()> {
        match self.poisoned {
            Some(p) if p == color => Err(TweenError::validation(format!(
                "draw with poisoned color {}",
                color.to_hex()
            ))),
            _ => Ok(()),
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) -> TweenResult<()> {
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.paint.reset();
        Ok(())
    }

    fn save(&mut self) {
        self.paint.save();
    }

    fn restore(&mut self) {
        self.paint.restore();
    }

    fn transform(&self) -> Affine {
        self.paint.current.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.paint.current.transform = transform;
    }

    fn global_alpha(&self) -> f64 {
        self.paint.current.alpha
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.paint.current.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_fill(&mut self, color: Rgba8) {
        self.paint.current.fill = color;
    }

    fn set_stroke(&mut self, color: Rgba8, width: f64) {
        self.paint.current.stroke = color;
        self.paint.current.stroke_width = width;
    }

    fn fill_path(&mut self, path: &BezPath) -> TweenResult<()> {
        self.check_poison(self.paint.current.fill)?;
        let bounds = (self.paint.current.transform * path.clone()).bounding_box();
        self.ops.push(SurfaceOp::FillPath {
            bounds,
            color: self.paint.fill_color(),
        });
        Ok(())
    }

    fn stroke_path(&mut self, path: &BezPath) -> TweenResult<()> {
        self.check_poison(self.paint.current.stroke)?;
        let bounds = (self.paint.current.transform * path.clone()).bounding_box();
        self.ops.push(SurfaceOp::StrokePath {
            bounds,
            color: self.paint.stroke_color(),
            width: self.paint.current.stroke_width,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> TweenResult<()> {
        self.check_poison(self.paint.current.fill)?;
        let rect = self.paint.current.transform.transform_rect_bbox(rect);
        self.ops.push(SurfaceOp::FillRect {
            rect,
            color: self.paint.fill_color(),
        });
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f64,
        _align: TextAlign,
    ) -> TweenResult<()> {
        self.check_poison(self.paint.current.fill)?;
        self.ops.push(SurfaceOp::FillText {
            text: text.to_owned(),
            origin: self.paint.current.transform * origin,
            size,
            color: self.paint.fill_color(),
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, size: f64) -> TextMetrics {
        heuristic_text_metrics(text, size)
    }

    fn clear(&mut self, color: Rgba8) -> TweenResult<()> {
        self.ops.push(SurfaceOp::Clear(color));
        Ok(())
    }

    fn clear_rect(&mut self, rect: Rect, _color: Rgba8) -> TweenResult<()> {
        self.ops.push(SurfaceOp::ClearRect(rect));
        Ok(())
    }

    fn present(&mut self) -> TweenResult<()> {
        self.ops.push(SurfaceOp::Present);
        Ok(())
    }

    fn snapshot(&mut self) -> TweenResult<FrameRGBA> {
        let w = (f64::from(self.width) * self.pixel_ratio).round() as u32;
        let h = (f64::from(self.height) * self.pixel_ratio).round() as u32;
        Ok(FrameRGBA::transparent(w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
