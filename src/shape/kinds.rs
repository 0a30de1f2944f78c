//! Built-in shape kinds.
//!
//! Positions follow one convention per kind: centered kinds (circle, ellipse, polygon, star,
//! spiral, arc, particles) use `(x, y)` as the center; box kinds (rectangle, gradient, wave)
//! use it as the top-left or left anchor; line-like kinds run from `(x, y)` to `(x2, y2)`;
//! paths are offset by `(x, y)`.

use std::f64::consts::{PI, TAU};

use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Lerp, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{TweenError, TweenResult};
use crate::render::surface::{Surface, TextAlign, TextMetrics, heuristic_text_metrics};
use crate::shape::model::ShapeKind;
use crate::shape::props::{PropValue, PropsView};

const TOLERANCE: f64 = 0.1;

fn num(v: f64) -> PropValue {
    PropValue::Number(v)
}

fn fill_and_stroke(
    props: &PropsView<'_>,
    surface: &mut dyn Surface,
    path: &BezPath,
) -> TweenResult<()> {
    let fill = props.color("color");
    if fill.a > 0 {
        surface.set_fill(fill);
        surface.fill_path(path)?;
    }
    outline(props, surface, path)
}

fn outline(props: &PropsView<'_>, surface: &mut dyn Surface, path: &BezPath) -> TweenResult<()> {
    let width = props.number("stroke_width");
    let color = props.color("stroke_color");
    if width > 0.0 && color.a > 0 {
        surface.set_stroke(color, width);
        surface.stroke_path(path)?;
    }
    Ok(())
}

// Line-like kinds stroke with `stroke_color` when set, else with their main color.
fn line_art(props: &PropsView<'_>, surface: &mut dyn Surface, path: &BezPath) -> TweenResult<()> {
    stroke_with_width(props, surface, path, props.number("stroke_width"))
}

fn stroke_with_width(
    props: &PropsView<'_>,
    surface: &mut dyn Surface,
    path: &BezPath,
    width: f64,
) -> TweenResult<()> {
    let color = line_color(props);
    if width <= 0.0 || color.a == 0 {
        return Ok(());
    }
    surface.set_stroke(color, width);
    surface.stroke_path(path)
}

fn line_color(props: &PropsView<'_>) -> Rgba8 {
    let stroke = props.color("stroke_color");
    if stroke.a > 0 {
        stroke
    } else {
        props.color("color")
    }
}

fn polyline(points: impl IntoIterator<Item = Point>, closed: bool) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    if closed && !path.elements().is_empty() {
        path.close_path();
    }
    path
}

fn square_around(center: Point, r: f64) -> Rect {
    let r = r.abs();
    Rect::new(center.x - r, center.y - r, center.x + r, center.y + r)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Circle;

impl ShapeKind for Circle {
    fn type_name(&self) -> &'static str {
        "circle"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![("radius", num(20.0))]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        square_around(props.position(), props.number("radius"))
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let r = props.number("radius").abs();
        if r == 0.0 {
            return Ok(());
        }
        let path = kurbo::Circle::new(props.position(), r).to_path(TOLERANCE);
        fill_and_stroke(props, surface, &path)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Rectangle;

impl Rectangle {
    fn rect(props: &PropsView<'_>) -> Rect {
        let p = props.position();
        Rect::new(
            p.x,
            p.y,
            p.x + props.number("width"),
            p.y + props.number("height"),
        )
        .abs()
    }
}

impl ShapeKind for Rectangle {
    fn type_name(&self) -> &'static str {
        "rectangle"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("width", num(100.0)),
            ("height", num(60.0)),
            ("corner_radius", num(0.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        Self::rect(props)
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let rect = Self::rect(props);
        let radius = props
            .number("corner_radius")
            .clamp(0.0, rect.width().min(rect.height()) / 2.0);
        let path = rect.to_rounded_rect(radius).to_path(TOLERANCE);
        fill_and_stroke(props, surface, &path)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Ellipse;

impl ShapeKind for Ellipse {
    fn type_name(&self) -> &'static str {
        "ellipse"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![("radius_x", num(40.0)), ("radius_y", num(25.0))]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let c = props.position();
        let rx = props.number("radius_x").abs();
        let ry = props.number("radius_y").abs();
        Rect::new(c.x - rx, c.y - ry, c.x + rx, c.y + ry)
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let radii = Vec2::new(
            props.number("radius_x").abs(),
            props.number("radius_y").abs(),
        );
        let path = kurbo::Ellipse::new(props.position(), radii, 0.0).to_path(TOLERANCE);
        fill_and_stroke(props, surface, &path)
    }
}

fn endpoints(props: &PropsView<'_>) -> (Point, Point) {
    (
        props.position(),
        Point::new(props.number("x2"), props.number("y2")),
    )
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Line;

impl ShapeKind for Line {
    fn type_name(&self) -> &'static str {
        "line"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("x2", num(200.0)),
            ("y2", num(100.0)),
            ("stroke_width", num(2.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let (a, b) = endpoints(props);
        Rect::from_points(a, b)
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let (a, b) = endpoints(props);
        line_art(props, surface, &polyline([a, b], false))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Arrow;

impl Arrow {
    fn head(props: &PropsView<'_>) -> Option<BezPath> {
        let (a, b) = endpoints(props);
        let dir = b - a;
        let len = dir.hypot();
        if len == 0.0 {
            return None;
        }
        let size = props.number("head_size").abs();
        let unit = dir / len;
        let normal = Vec2::new(-unit.y, unit.x);
        let base = b - unit * size;
        Some(polyline(
            [b, base + normal * (size / 2.0), base - normal * (size / 2.0)],
            true,
        ))
    }
}

impl ShapeKind for Arrow {
    fn type_name(&self) -> &'static str {
        "arrow"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("x2", num(200.0)),
            ("y2", num(100.0)),
            ("head_size", num(12.0)),
            ("stroke_width", num(2.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let (a, b) = endpoints(props);
        let pad = props.number("head_size").abs() / 2.0;
        Rect::from_points(a, b).inflate(pad, pad)
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let (a, b) = endpoints(props);
        line_art(props, surface, &polyline([a, b], false))?;
        if let Some(head) = Self::head(props) {
            surface.set_fill(line_color(props));
            surface.fill_path(&head)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Text;

impl ShapeKind for Text {
    fn type_name(&self) -> &'static str {
        "text"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("text", PropValue::Text(String::new())),
            ("font_size", num(16.0)),
            ("align", PropValue::Text("left".to_owned())),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let size = props.number("font_size").max(0.0);
        text_box(props, heuristic_text_metrics(props.text("text"), size))
    }

    fn measure(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> Option<Rect> {
        let text = props.text("text");
        let size = props.number("font_size");
        if text.is_empty() || !(size.is_finite() && size > 0.0) {
            return None;
        }
        Some(text_box(props, surface.measure_text(text, size)))
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let text = props.text("text");
        let size = props.number("font_size");
        if text.is_empty() || size <= 0.0 {
            return Ok(());
        }
        surface.set_fill(props.color("color"));
        surface.fill_text(
            text,
            props.position(),
            size,
            TextAlign::from_name(props.text("align")),
        )
    }
}

// `y` is the top edge of the layout box.
fn text_box(props: &PropsView<'_>, m: TextMetrics) -> Rect {
    let p = props.position();
    let x0 = p.x + TextAlign::from_name(props.text("align")).left_offset(m.width);
    Rect::new(x0, p.y, x0 + m.width, p.y + m.height)
}

fn regular_vertices(center: Point, radii: &[f64], count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = -PI / 2.0 + TAU * i as f64 / count as f64;
            let r = radii[i % radii.len()];
            center + Vec2::from_angle(angle) * r
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Polygon;

impl ShapeKind for Polygon {
    fn type_name(&self) -> &'static str {
        "polygon"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![("radius", num(40.0)), ("sides", num(6.0))]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        square_around(props.position(), props.number("radius"))
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let sides = props.number("sides").round().clamp(3.0, 1024.0) as usize;
        let r = props.number("radius").abs();
        let path = polyline(regular_vertices(props.position(), &[r], sides), true);
        fill_and_stroke(props, surface, &path)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Star;

impl ShapeKind for Star {
    fn type_name(&self) -> &'static str {
        "star"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("outer_radius", num(40.0)),
            ("inner_radius", num(18.0)),
            ("points", num(5.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let r = props
            .number("outer_radius")
            .abs()
            .max(props.number("inner_radius").abs());
        square_around(props.position(), r)
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let spikes = props.number("points").round().clamp(2.0, 512.0) as usize;
        let radii = [
            props.number("outer_radius").abs(),
            props.number("inner_radius").abs(),
        ];
        let path = polyline(regular_vertices(props.position(), &radii, spikes * 2), true);
        fill_and_stroke(props, surface, &path)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Wave;

impl ShapeKind for Wave {
    fn type_name(&self) -> &'static str {
        "wave"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("width", num(200.0)),
            ("amplitude", num(20.0)),
            ("wavelength", num(50.0)),
            ("phase", num(0.0)),
            ("stroke_width", num(2.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let p = props.position();
        let amp = props.number("amplitude").abs();
        Rect::new(p.x, p.y - amp, p.x + props.number("width"), p.y + amp).abs()
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let p = props.position();
        let width = props.number("width");
        let amp = props.number("amplitude");
        let wavelength = props.number("wavelength");
        let phase = props.number("phase");
        let samples = ((width.abs() / 4.0).ceil() as usize).clamp(2, 4096);
        let pts = (0..=samples).map(|i| {
            let dx = width * i as f64 / samples as f64;
            let dy = if wavelength.abs() > f64::EPSILON {
                amp * (TAU * dx / wavelength + phase).sin()
            } else {
                0.0
            };
            Point::new(p.x + dx, p.y + dy)
        });
        line_art(props, surface, &polyline(pts, false))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Spiral;

impl ShapeKind for Spiral {
    fn type_name(&self) -> &'static str {
        "spiral"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("radius", num(60.0)),
            ("turns", num(3.0)),
            ("stroke_width", num(2.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        square_around(props.position(), props.number("radius"))
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let c = props.position();
        let radius = props.number("radius").abs();
        let turns = props.number("turns").abs().min(256.0);
        if turns == 0.0 || radius == 0.0 {
            return Ok(());
        }
        let samples = ((turns * 48.0).ceil() as usize).max(2);
        let pts = (0..=samples).map(|i| {
            let f = i as f64 / samples as f64;
            c + Vec2::from_angle(f * turns * TAU) * (f * radius)
        });
        line_art(props, surface, &polyline(pts, false))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CircularArc;

impl ShapeKind for CircularArc {
    fn type_name(&self) -> &'static str {
        "arc"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("radius", num(40.0)),
            ("start_angle", num(0.0)),
            ("end_angle", num(PI)),
            ("stroke_width", num(2.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        square_around(props.position(), props.number("radius"))
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let r = props.number("radius").abs();
        let start = props.number("start_angle");
        let sweep = props.number("end_angle") - start;
        let arc = kurbo::Arc::new(props.position(), Vec2::new(r, r), start, sweep, 0.0);
        let path = arc.to_path(TOLERANCE);
        if props.flag("filled") {
            fill_and_stroke(props, surface, &path)
        } else {
            line_art(props, surface, &path)
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Bezier;

impl Bezier {
    fn control_points(props: &PropsView<'_>) -> Vec<Point> {
        let (a, b) = endpoints(props);
        let c1 = Point::new(props.number("cx1"), props.number("cy1"));
        if Self::is_cubic(props) {
            let c2 = Point::new(props.number("cx2"), props.number("cy2"));
            vec![a, c1, c2, b]
        } else {
            vec![a, c1, b]
        }
    }

    fn is_cubic(props: &PropsView<'_>) -> bool {
        props.get("cx2").is_some() && props.get("cy2").is_some()
    }
}

impl ShapeKind for Bezier {
    fn type_name(&self) -> &'static str {
        "bezier"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("x2", num(300.0)),
            ("y2", num(100.0)),
            ("cx1", num(200.0)),
            ("cy1", num(20.0)),
            ("stroke_width", num(2.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let pts = Self::control_points(props);
        pts.iter()
            .skip(1)
            .fold(Rect::from_points(pts[0], pts[0]), |r, p| r.union_pt(*p))
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let pts = Self::control_points(props);
        let mut path = BezPath::new();
        path.move_to(pts[0]);
        match pts.as_slice() {
            [_, c1, c2, b] => path.curve_to(*c1, *c2, *b),
            [_, c1, b] => path.quad_to(*c1, *b),
            _ => {}
        }
        line_art(props, surface, &path)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Particles;

impl Particles {
    /// Deterministic particle centers for the current props.
    pub fn positions(props: &PropsView<'_>) -> Vec<Point> {
        let count = props.number("count").round().clamp(0.0, 10_000.0) as usize;
        let radius = props.number("radius").abs();
        let center = props.position();
        let mut state = props.number("seed").to_bits();
        (0..count)
            .map(|_| {
                let angle = unit_f64(&mut state) * TAU;
                let dist = unit_f64(&mut state).sqrt() * radius;
                center + Vec2::from_angle(angle) * dist
            })
            .collect()
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit_f64(state: &mut u64) -> f64 {
    (splitmix64(state) >> 11) as f64 / (1u64 << 53) as f64
}

impl ShapeKind for Particles {
    fn type_name(&self) -> &'static str {
        "particles"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("count", num(24.0)),
            ("radius", num(60.0)),
            ("particle_size", num(3.0)),
            ("seed", num(1.0)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        let r = props.number("radius").abs() + props.number("particle_size").abs();
        square_around(props.position(), r)
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let size = props.number("particle_size").abs();
        if size == 0.0 {
            return Ok(());
        }
        let mut path = BezPath::new();
        for p in Self::positions(props) {
            path.extend(kurbo::Circle::new(p, size).path_elements(TOLERANCE));
        }
        fill_and_stroke(props, surface, &path)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Gradient;

impl ShapeKind for Gradient {
    fn type_name(&self) -> &'static str {
        "gradient"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("width", num(200.0)),
            ("height", num(100.0)),
            ("color2", PropValue::Color(Rgba8::new(0xe7, 0x4c, 0x3c, 0xff))),
            ("vertical", PropValue::Bool(false)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        Rectangle::rect(props)
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let rect = Rectangle::rect(props);
        let vertical = props.flag("vertical");
        let extent = if vertical {
            rect.height()
        } else {
            rect.width()
        };
        if extent <= 0.0 {
            return Ok(());
        }
        let from = props.color("color");
        let to = props.color("color2");
        let bands = (extent.ceil() as usize).clamp(1, 64);
        let step = extent / bands as f64;
        for i in 0..bands {
            let t = if bands == 1 {
                0.0
            } else {
                i as f64 / (bands - 1) as f64
            };
            surface.set_fill(Rgba8::lerp(&from, &to, t));
            // Bands overlap by half a pixel so antialiased edges don't leave seams.
            let lo = i as f64 * step;
            let hi = ((i + 1) as f64 * step + 0.5).min(extent);
            let band = if vertical {
                Rect::new(rect.x0, rect.y0 + lo, rect.x1, rect.y0 + hi)
            } else {
                Rect::new(rect.x0 + lo, rect.y0, rect.x0 + hi, rect.y1)
            };
            surface.fill_rect(band)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Path;

impl Path {
    fn build(props: &PropsView<'_>) -> TweenResult<BezPath> {
        let offset = props.position().to_vec2();
        let d = props.text("d");
        let local = if d.trim().is_empty() {
            polyline(props.points("points").iter().copied(), props.flag("closed"))
        } else {
            BezPath::from_svg(d)
                .map_err(|e| TweenError::validation(format!("invalid path data: {e}")))?
        };
        Ok(kurbo::Affine::translate(offset) * local)
    }

    fn is_closed(props: &PropsView<'_>) -> bool {
        !props.text("d").trim().is_empty() || props.flag("closed")
    }
}

impl ShapeKind for Path {
    fn type_name(&self) -> &'static str {
        "path"
    }

    fn defaults(&self) -> Vec<(&'static str, PropValue)> {
        vec![
            ("x", num(0.0)),
            ("y", num(0.0)),
            ("d", PropValue::Text(String::new())),
            ("points", PropValue::Points(Vec::new())),
            ("closed", PropValue::Bool(false)),
        ]
    }

    fn local_bounds(&self, props: &PropsView<'_>) -> Rect {
        match Self::build(props) {
            Ok(path) if !path.elements().is_empty() => path.bounding_box(),
            _ => {
                let p = props.position();
                Rect::from_points(p, p)
            }
        }
    }

    fn draw(&self, props: &PropsView<'_>, surface: &mut dyn Surface) -> TweenResult<()> {
        let path = Self::build(props)?;
        if path.elements().is_empty() {
            return Ok(());
        }
        if Self::is_closed(props) {
            fill_and_stroke(props, surface, &path)
        } else {
            // Open polylines are always visible, even without an explicit stroke width.
            let width = props.number("stroke_width");
            stroke_with_width(props, surface, &path, if width > 0.0 { width } else { 2.0 })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/kinds.rs"]
mod tests;
