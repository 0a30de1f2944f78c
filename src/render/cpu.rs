use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Affine, BezPath, FrameRGBA, Point, Rect, Rgba8};
use crate::foundation::error::{TweenError, TweenResult};
use crate::foundation::math::over_in_place;
use crate::render::surface::{PaintStack, Surface, TextAlign, TextMetrics, heuristic_text_metrics};

/// Raster surface backed by `vello_cpu`.
///
/// The canvas is a retained premultiplied RGBA8 buffer at device resolution. Draw calls are
/// batched into a render context and composited source-over onto the canvas when the batch is
/// flushed (`present`, `snapshot`, `clear_rect`). Text needs a font; without one, text draws
/// are skipped and metrics fall back to a width heuristic.
pub struct CpuSurface {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    device_w: u16,
    device_h: u16,
    canvas: Vec<u8>,
    pending: Option<vello_cpu::RenderContext>,
    paint: PaintStack,
    text: Option<TextShaper>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("has_font", &self.text.is_some())
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> TweenResult<Self> {
        let (device_w, device_h) = device_dims(width, height, pixel_ratio)?;
        Ok(Self {
            width,
            height,
            pixel_ratio,
            device_w,
            device_h,
            canvas: vec![0; usize::from(device_w) * usize::from(device_h) * 4],
            pending: None,
            paint: PaintStack::default(),
            text: None,
        })
    }

    /// Enable text rendering with the given font file contents (TTF/OTF).
    pub fn with_font(mut self, font_bytes: Vec<u8>) -> TweenResult<Self> {
        self.text = Some(TextShaper::new(font_bytes)?);
        Ok(self)
    }

    pub fn with_font_file(self, path: &Path) -> TweenResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        self.with_font(bytes)
    }

    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    fn device_transform(&self) -> Affine {
        Affine::scale(self.pixel_ratio) * self.paint.current.transform
    }

    fn context(&mut self) -> &mut vello_cpu::RenderContext {
        let (w, h) = (self.device_w, self.device_h);
        self.pending
            .get_or_insert_with(|| vello_cpu::RenderContext::new(w, h))
    }

    fn flush(&mut self) -> TweenResult<()> {
        let Some(mut ctx) = self.pending.take() else {
            return Ok(());
        };
        ctx.flush();
        let mut scratch = vello_cpu::Pixmap::new(self.device_w, self.device_h);
        ctx.render_to_pixmap(&mut scratch);
        over_in_place(&mut self.canvas, scratch.data_as_u8_slice())
    }

    fn device_rect(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let r = Affine::scale(self.pixel_ratio).transform_rect_bbox(rect);
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(self.device_w)) as usize;
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(self.device_h)) as usize;
        (
            clamp_x(r.x0.floor()),
            clamp_y(r.y0.floor()),
            clamp_x(r.x1.ceil()),
            clamp_y(r.y1.ceil()),
        )
    }
}

fn device_dims(width: u32, height: u32, pixel_ratio: f64) -> TweenResult<(u16, u16)> {
    if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
        return Err(TweenError::validation(format!(
            "pixel ratio must be finite and > 0, got {pixel_ratio}"
        )));
    }
    let dim = |v: u32| -> TweenResult<u16> {
        let d = (f64::from(v) * pixel_ratio).round();
        if d < 1.0 || d > f64::from(u16::MAX) {
            return Err(TweenError::validation(format!(
                "surface size {width}x{height} at ratio {pixel_ratio} is out of range"
            )));
        }
        Ok(d as u16)
    };
    Ok((dim(width)?, dim(height)?))
}

impl Surface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64) -> TweenResult<()> {
        let (device_w, device_h) = device_dims(width, height, pixel_ratio)?;
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.device_w = device_w;
        self.device_h = device_h;
        self.canvas = vec![0; usize::from(device_w) * usize::from(device_h) * 4];
        self.pending = None;
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
        let transform = affine_to_cpu(self.device_transform());
        let color = color_to_cpu(self.paint.fill_color());
        let path = bezpath_to_cpu(path);
        let ctx = self.context();
        ctx.set_transform(transform);
        ctx.set_paint(color);
        ctx.fill_path(&path);
        Ok(())
    }

    fn stroke_path(&mut self, path: &BezPath) -> TweenResult<()> {
        let width = self.paint.current.stroke_width;
        if !(width.is_finite() && width > 0.0) {
            return Ok(());
        }
        let transform = affine_to_cpu(self.device_transform());
        let color = color_to_cpu(self.paint.stroke_color());
        let path = bezpath_to_cpu(path);
        let ctx = self.context();
        ctx.set_transform(transform);
        ctx.set_paint(color);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        ctx.stroke_path(&path);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) -> TweenResult<()> {
        let transform = affine_to_cpu(self.device_transform());
        let color = color_to_cpu(self.paint.fill_color());
        let ctx = self.context();
        ctx.set_transform(transform);
        ctx.set_paint(color);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        size: f64,
        align: TextAlign,
    ) -> TweenResult<()> {
        let Some(shaper) = self.text.as_mut() else {
            tracing::debug!(text, "no font configured, text skipped");
            return Ok(());
        };
        let layout = shaper.layout(text, size as f32)?;
        let font = shaper.font.clone();

        let left = origin.x + align.left_offset(f64::from(layout.width()));
        let transform = affine_to_cpu(
            self.device_transform() * Affine::translate((left, origin.y)),
        );
        let color = color_to_cpu(self.paint.fill_color());
        let ctx = self.context();
        ctx.set_transform(transform);
        ctx.set_paint(color);

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn measure_text(&mut self, text: &str, size: f64) -> TextMetrics {
        let Some(shaper) = self.text.as_mut() else {
            return heuristic_text_metrics(text, size);
        };
        match shaper.layout(text, size as f32) {
            Ok(layout) => TextMetrics {
                width: f64::from(layout.width()),
                height: f64::from(layout.height()),
            },
            Err(_) => heuristic_text_metrics(text, size),
        }
    }

    fn clear(&mut self, color: Rgba8) -> TweenResult<()> {
        self.pending = None;
        let px = color.to_premul();
        for chunk in self.canvas.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        Ok(())
    }

    fn clear_rect(&mut self, rect: Rect, color: Rgba8) -> TweenResult<()> {
        self.flush()?;
        let (x0, y0, x1, y1) = self.device_rect(rect);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }
        let px = color.to_premul();
        let stride = usize::from(self.device_w) * 4;
        for y in y0..y1 {
            let row = &mut self.canvas[y * stride + x0 * 4..y * stride + x1 * 4];
            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
        Ok(())
    }

    fn present(&mut self) -> TweenResult<()> {
        self.flush()
    }

    fn snapshot(&mut self) -> TweenResult<FrameRGBA> {
        self.flush()?;
        Ok(FrameRGBA {
            width: u32::from(self.device_w),
            height: u32::from(self.device_h),
            data: self.canvas.clone(),
            premultiplied: true,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrush;

/// Parley shaping state for one registered font.
struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl TextShaper {
    fn new(font_bytes: Vec<u8>) -> TweenResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| TweenError::validation("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TweenError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
        })
    }

    fn layout(&mut self, text: &str, size_px: f32) -> TweenResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TweenError::validation("font size must be finite and > 0"));
        }
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
