use std::collections::BTreeMap;

use serde_json::Value;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::math::finite_or;

/// A single shape property value after normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Number(f64),
    Bool(bool),
    Color(Rgba8),
    Text(String),
    Points(Vec<Point>),
}

impl PropValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba8> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            Self::Points(p) => Some(p),
            _ => None,
        }
    }

    /// JSON rendering used by inspection output.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(v) => serde_json::json!(v),
            Self::Bool(b) => Value::Bool(*b),
            Self::Color(c) => Value::String(c.to_hex()),
            Self::Text(s) => Value::String(s.clone()),
            Self::Points(pts) => Value::Array(
                pts.iter()
                    .map(|p| serde_json::json!({ "x": p.x, "y": p.y }))
                    .collect(),
            ),
        }
    }
}

/// Alias-free property record keyed by canonical snake_case names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    values: BTreeMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: PropValue) {
        self.values.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.values.iter()
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PropValue> {
        self.values.get_mut(key)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

/// Read-only view of a shape's effective properties: overlay values win over static ones.
#[derive(Clone, Copy, Debug)]
pub struct PropsView<'a> {
    base: &'a Props,
    overlay: &'a Props,
}

impl<'a> PropsView<'a> {
    pub fn new(base: &'a Props, overlay: &'a Props) -> Self {
        Self { base, overlay }
    }

    pub fn get(&self, key: &str) -> Option<&'a PropValue> {
        self.overlay.get(key).or_else(|| self.base.get(key))
    }

    /// Numeric value, or `0.0` when missing or non-numeric. Non-finite values read as `0.0`.
    pub fn number(&self, key: &str) -> f64 {
        finite_or(self.get(key).and_then(PropValue::as_number).unwrap_or(0.0), 0.0)
    }

    pub fn color(&self, key: &str) -> Rgba8 {
        self.get(key)
            .and_then(PropValue::as_color)
            .unwrap_or(Rgba8::TRANSPARENT)
    }

    pub fn text(&self, key: &str) -> &'a str {
        self.get(key).and_then(PropValue::as_text).unwrap_or("")
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(PropValue::as_bool).unwrap_or(false)
    }

    pub fn points(&self, key: &str) -> &'a [Point] {
        self.get(key).and_then(PropValue::as_points).unwrap_or(&[])
    }

    pub fn position(&self) -> Point {
        Point::new(self.number("x"), self.number("y"))
    }
}

const COLOR_KEYS: &[&str] = &["color", "color2", "stroke_color", "background"];
const TEXT_KEYS: &[&str] = &["text", "d", "align", "font_family"];

/// Default fill used by every shape kind unless overridden.
pub const DEFAULT_COLOR: Rgba8 = Rgba8::new(0x34, 0x98, 0xdb, 0xff);

/// Defaults shared by every shape kind. Kind defaults take precedence.
pub fn common_defaults() -> Vec<(&'static str, PropValue)> {
    vec![
        ("x", PropValue::Number(100.0)),
        ("y", PropValue::Number(100.0)),
        ("color", PropValue::Color(DEFAULT_COLOR)),
        ("stroke_color", PropValue::Color(Rgba8::TRANSPARENT)),
        ("stroke_width", PropValue::Number(0.0)),
        ("opacity", PropValue::Number(1.0)),
        ("rotation", PropValue::Number(0.0)),
    ]
}

/// Map a property name (any historical alias, camelCase or snake_case) to its canonical key.
///
/// `kind` disambiguates aliases whose meaning depends on the shape type (`size`).
pub fn canonical_key(kind: &str, key: &str) -> String {
    let snake = to_snake_case(key);
    let canonical = match snake.as_str() {
        "r" => "radius",
        "fill" | "fill_color" | "color1" | "from_color" => "color",
        "to_color" | "end_color" => "color2",
        "stroke" => "stroke_color",
        "line_width" => "stroke_width",
        "cx" | "x1" | "left" => "x",
        "cy" | "y1" | "top" => "y",
        "rx" => "radius_x",
        "ry" => "radius_y",
        "w" => "width",
        "h" => "height",
        "alpha" => "opacity",
        "angle" => "rotation",
        "label" | "content" => "text",
        "size" if kind == "text" => "font_size",
        "size" if kind == "particles" => "particle_size",
        "num_points" | "spikes" if kind == "star" => "points",
        _ => return snake,
    };
    canonical.to_owned()
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '-' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a JSON value to a [`PropValue`] for the given canonical key.
pub fn json_to_prop(key: &str, value: &Value) -> Result<Option<PropValue>, String> {
    let v = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => PropValue::Bool(*b),
        Value::Number(n) => {
            let f = n
                .as_f64()
                .ok_or_else(|| format!("property '{key}' is not representable as f64"))?;
            PropValue::Number(f)
        }
        Value::String(s) if COLOR_KEYS.contains(&key) => PropValue::Color(
            Rgba8::parse(s).map_err(|e| format!("property '{key}': {e}"))?,
        ),
        Value::String(s) if TEXT_KEYS.contains(&key) => PropValue::Text(s.clone()),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => PropValue::Number(f),
            Err(_) => PropValue::Text(s.clone()),
        },
        Value::Array(items) => PropValue::Points(parse_points(key, items)?),
        Value::Object(_) => {
            return Err(format!("property '{key}' has an unsupported object value"));
        }
    };
    Ok(Some(v))
}

fn parse_points(key: &str, items: &[Value]) -> Result<Vec<Point>, String> {
    items
        .iter()
        .map(|item| match item {
            Value::Array(pair) if pair.len() == 2 => {
                match (pair[0].as_f64(), pair[1].as_f64()) {
                    (Some(x), Some(y)) => Ok(Point::new(x, y)),
                    _ => Err(format!("property '{key}' has a non-numeric point")),
                }
            }
            Value::Object(obj) => match (
                obj.get("x").and_then(Value::as_f64),
                obj.get("y").and_then(Value::as_f64),
            ) {
                (Some(x), Some(y)) => Ok(Point::new(x, y)),
                _ => Err(format!("property '{key}' has a point without numeric x/y")),
            },
            _ => Err(format!(
                "property '{key}' must be a list of [x, y] pairs or {{x, y}} objects"
            )),
        })
        .collect()
}

/// Result of the alias-normalization pass.
#[derive(Clone, Debug, Default)]
pub struct NormalizedProps {
    pub props: Props,
    /// Human-readable notes about values that were dropped in favor of defaults.
    pub warnings: Vec<String>,
}

/// Produce a fully-populated, alias-free property record.
///
/// Canonical keys win over aliases when both are present; missing keys are filled from
/// `kind_defaults` first and [`common_defaults`] second. Values that fail to convert are
/// reported and replaced by the default.
pub fn normalize_properties(
    kind: &str,
    raw: &serde_json::Map<String, Value>,
    kind_defaults: &[(&'static str, PropValue)],
) -> NormalizedProps {
    let mut out = NormalizedProps::default();

    let mut aliased: Vec<(String, &Value)> = Vec::new();
    let mut direct: Vec<(String, &Value)> = Vec::new();
    for (k, v) in raw {
        let canonical = canonical_key(kind, k);
        if canonical == to_snake_case(k) {
            direct.push((canonical, v));
        } else {
            aliased.push((canonical, v));
        }
    }

    for (key, value) in aliased.into_iter().chain(direct) {
        match json_to_prop(&key, value) {
            Ok(Some(v)) => out.props.set(key, v),
            Ok(None) => {}
            Err(msg) => out.warnings.push(msg),
        }
    }

    for (key, value) in kind_defaults.iter().cloned().chain(common_defaults()) {
        if !out.props.contains(key) {
            out.props.set(key, value);
        }
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/shape/props.rs"]
mod tests;
