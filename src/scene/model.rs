use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::foundation::core::Point;
use crate::foundation::error::{TweenError, TweenResult};

/// Declarative scene description: shapes plus time-based animations.
///
/// Fields missing here fall back to [`crate::EngineConfig`] defaults at load time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "duration")]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default, rename = "loop")]
    pub looping: Option<bool>,
    #[serde(default)]
    pub normalize_coordinates: Option<bool>,
    #[serde(default)]
    pub shapes: Vec<ShapeSpec>,
    #[serde(default)]
    pub animations: Vec<AnimationSpec>,
}

impl SceneSpec {
    pub fn from_json(json: &str) -> TweenResult<Self> {
        serde_json::from_str(json).map_err(|e| TweenError::invalid_scene(e.to_string()))
    }

    pub fn from_value(value: Value) -> TweenResult<Self> {
        serde_json::from_value(value).map_err(|e| TweenError::invalid_scene(e.to_string()))
    }

    /// Structural checks that fail the whole load.
    pub fn validate(&self) -> TweenResult<()> {
        if let Some(d) = self.duration_ms
            && !(d.is_finite() && d > 0.0)
        {
            return Err(TweenError::invalid_scene(format!(
                "durationMs must be finite and > 0, got {d}"
            )));
        }
        if let Some(fps) = self.fps
            && !(fps.is_finite() && fps > 0.0)
        {
            return Err(TweenError::invalid_scene(format!(
                "fps must be finite and > 0, got {fps}"
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for (i, s) in self.shapes.iter().enumerate() {
            if s.kind.trim().is_empty() {
                return Err(TweenError::invalid_scene(format!(
                    "shape #{i} has an empty type"
                )));
            }
            if let Some(id) = &s.id
                && !seen.insert(id.as_str())
            {
                return Err(TweenError::invalid_scene(format!("duplicate shape id \"{id}\"")));
            }
        }
        for (i, a) in self.animations.iter().enumerate() {
            if !(a.duration.is_finite() && a.duration >= 0.0) {
                return Err(TweenError::invalid_scene(format!(
                    "animation #{i} has invalid duration {}",
                    a.duration
                )));
            }
            if !(a.delay.is_finite() && a.delay >= 0.0) {
                return Err(TweenError::invalid_scene(format!(
                    "animation #{i} has invalid delay {}",
                    a.delay
                )));
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// One shape entry. Properties may be nested under `properties` or written inline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, alias = "props")]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub layer: Option<String>,
    #[serde(default, alias = "classes", alias = "className")]
    pub class: Option<ClassTokens>,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Inline legacy properties (`{"type": "circle", "r": 5}`).
    #[serde(flatten)]
    pub inline: Map<String, Value>,
}

impl ShapeSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            properties: Map::new(),
            layer: None,
            class: None,
            z_index: 0,
            visible: true,
            inline: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Inline properties overlaid by the explicit `properties` object.
    pub fn merged_properties(&self) -> Map<String, Value> {
        let mut out = self.inline.clone();
        for (k, v) in &self.properties {
            out.insert(k.clone(), v.clone());
        }
        out
    }

    pub fn class_tokens(&self) -> Vec<String> {
        match &self.class {
            None => Vec::new(),
            Some(ClassTokens::One(s)) => s.split_whitespace().map(str::to_owned).collect(),
            Some(ClassTokens::Many(v)) => v
                .iter()
                .flat_map(|s| s.split_whitespace())
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// `"a b"` or `["a", "b"]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassTokens {
    One(String),
    Many(Vec<String>),
}

fn default_animation_duration() -> f64 {
    1000.0
}

/// One animation entry; `target` may resolve to several shapes, each gets its own animator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSpec {
    pub target: TargetSpec,
    #[serde(default = "default_animation_duration")]
    pub duration: f64,
    #[serde(default)]
    pub delay: f64,
    #[serde(default, alias = "ease")]
    pub easing: Option<String>,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default, alias = "pingPong", alias = "yoyo")]
    pub alternate: bool,
    #[serde(flatten)]
    pub motion: MotionSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MotionSpec {
    Property {
        #[serde(alias = "prop", alias = "attribute")]
        property: String,
        #[serde(default)]
        from: Option<Value>,
        to: Value,
    },
    Orbit {
        #[serde(default, alias = "centerX", alias = "cx")]
        center_x: Option<f64>,
        #[serde(default, alias = "centerY", alias = "cy")]
        center_y: Option<f64>,
        #[serde(default, alias = "r")]
        radius: Option<f64>,
        #[serde(default, alias = "startAngle")]
        start_angle: f64,
        #[serde(default = "default_true")]
        clockwise: bool,
    },
    Path {
        #[serde(default)]
        points: Vec<PointSpec>,
    },
}

/// `[x, y]` or `{"x": .., "y": ..}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointSpec {
    Pair([f64; 2]),
    Object { x: f64, y: f64 },
}

impl From<PointSpec> for Point {
    fn from(p: PointSpec) -> Self {
        match p {
            PointSpec::Pair([x, y]) | PointSpec::Object { x, y } => Point::new(x, y),
        }
    }
}

/// Animation target: a selector or a list of selectors whose matches are unioned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetSpec {
    Many(Vec<Selector>),
    One(Selector),
}

/// Shape selector.
///
/// The string shorthand accepts `"#id"`, `".class"`, `"*"` (every shape) or a bare id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    Shorthand(String),
    Id {
        id: String,
    },
    Class {
        #[serde(alias = "className")]
        class: String,
    },
    Type {
        #[serde(rename = "type")]
        kind: String,
    },
    Match {
        #[serde(rename = "match", alias = "where", alias = "properties")]
        properties: Map<String, Value>,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
