//! Legacy coordinate auto-normalization.
//!
//! Scenes authored in arbitrary coordinate ranges are mapped onto the drawing surface. X and Y
//! are scaled independently, so a scene whose aspect ratio differs from the surface's is
//! stretched (circles keep their radius but their centers spread unevenly). This matches the
//! behavior long-standing scenes were authored against.

use crate::foundation::core::{Point, Rect};
use crate::shape::model::Shape;
use crate::shape::props::PropValue;

const X_KEYS: &[&str] = &["x", "x2", "cx1", "cx2"];
const Y_KEYS: &[&str] = &["y", "y2", "cy1", "cy2"];

#[derive(Clone, Copy, Debug, PartialEq)]
struct AxisMap {
    min: f64,
    scale: f64,
    offset: f64,
}

impl AxisMap {
    fn new(min: f64, max: f64, size: f64, padding: f64) -> Self {
        let extent = max - min;
        if extent <= f64::EPSILON {
            // Degenerate axis: center the data instead of dividing by zero.
            return Self {
                min,
                scale: 1.0,
                offset: size / 2.0,
            };
        }
        let usable = (size - 2.0 * padding).max(1.0);
        Self {
            min,
            scale: usable / extent,
            offset: padding,
        }
    }

    fn apply(&self, v: f64) -> f64 {
        self.offset + (v - self.min) * self.scale
    }
}

/// Mapping from scene coordinates to surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapping {
    x: AxisMap,
    y: AxisMap,
}

impl CoordinateMapping {
    pub fn map_x(&self, v: f64) -> f64 {
        self.x.apply(v)
    }

    pub fn map_y(&self, v: f64) -> f64 {
        self.y.apply(v)
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(self.map_x(p.x), self.map_y(p.y))
    }

    pub fn scale(&self) -> (f64, f64) {
        (self.x.scale, self.y.scale)
    }

    /// Map a value written to coordinate property `key`; other properties pass through.
    pub fn map_property(&self, key: &str, value: PropValue) -> PropValue {
        match value {
            PropValue::Number(v) if X_KEYS.contains(&key) => PropValue::Number(self.map_x(v)),
            PropValue::Number(v) if Y_KEYS.contains(&key) => PropValue::Number(self.map_y(v)),
            PropValue::Points(points) if key == "points" => {
                PropValue::Points(points.into_iter().map(|p| self.map_point(p)).collect())
            }
            other => other,
        }
    }
}

fn coordinate_extent(shapes: &[Shape]) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    let mut add = |p: Point| {
        acc = Some(match acc {
            Some(r) => r.union_pt(p),
            None => Rect::from_points(p, p),
        });
    };
    for shape in shapes {
        let props = shape.static_props();
        let num = |k: &str| props.get(k).and_then(PropValue::as_number);
        for (kx, ky) in X_KEYS.iter().zip(Y_KEYS) {
            if let (Some(x), Some(y)) = (num(kx), num(ky)) {
                add(Point::new(x, y));
            }
        }
        if let Some(points) = props.get("points").and_then(PropValue::as_points) {
            points.iter().copied().for_each(&mut add);
        }
    }
    acc
}

/// Compute the mapping for `shapes`, or `None` when every coordinate already lies within the
/// surface.
pub fn compute_mapping(
    shapes: &[Shape],
    width: f64,
    height: f64,
    padding: f64,
) -> Option<CoordinateMapping> {
    let extent = coordinate_extent(shapes)?;
    let inside = extent.x0 >= 0.0 && extent.y0 >= 0.0 && extent.x1 <= width && extent.y1 <= height;
    if inside {
        return None;
    }
    Some(CoordinateMapping {
        x: AxisMap::new(extent.x0, extent.x1, width, padding),
        y: AxisMap::new(extent.y0, extent.y1, height, padding),
    })
}

/// Rewrite the static coordinates of `shapes` in place.
pub fn apply_mapping(shapes: &mut [Shape], mapping: &CoordinateMapping) {
    for shape in shapes {
        for key in X_KEYS {
            if let Some(v) = shape.static_props().get(key).and_then(PropValue::as_number) {
                shape.set_static_property(*key, PropValue::Number(mapping.map_x(v)));
            }
        }
        for key in Y_KEYS {
            if let Some(v) = shape.static_props().get(key).and_then(PropValue::as_number) {
                shape.set_static_property(*key, PropValue::Number(mapping.map_y(v)));
            }
        }
        if let Some(points) = shape
            .static_props()
            .get("points")
            .and_then(PropValue::as_points)
        {
            let mapped = points.iter().map(|p| mapping.map_point(*p)).collect();
            shape.set_static_property("points", PropValue::Points(mapped));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/normalize.rs"]
mod tests;
