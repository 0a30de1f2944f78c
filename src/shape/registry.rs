use std::collections::BTreeMap;
use std::sync::Arc;

use crate::foundation::core::Rect;
use crate::foundation::error::{TweenError, TweenResult};
use crate::scene::model::ShapeSpec;
use crate::shape::kinds;
use crate::shape::model::{Shape, ShapeKind};
use crate::shape::props::{Props, PropsView, normalize_properties};

/// Constructor for a shape kind. Called once at registration.
pub type ShapeFactory = fn() -> Arc<dyn ShapeKind>;

/// Factory for a [`ShapeKind`] with a `Default` impl.
pub fn builtin<K: ShapeKind + Default + 'static>() -> Arc<dyn ShapeKind> {
    Arc::new(K::default())
}

/// Type name to shape kind table.
///
/// Engines take a registry instance rather than reading a global, so tests can register
/// custom kinds without leaking into each other.
#[derive(Clone, Default)]
pub struct ShapeRegistry {
    kinds: BTreeMap<String, Arc<dyn ShapeKind>>,
}

impl std::fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A freshly created shape and the non-fatal notes produced while normalizing its properties.
#[derive(Debug)]
pub struct CreatedShape {
    pub shape: Shape,
    pub warnings: Vec<String>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        let builtins: [(&str, ShapeFactory); 15] = [
            ("circle", builtin::<kinds::Circle>),
            ("rectangle", builtin::<kinds::Rectangle>),
            ("ellipse", builtin::<kinds::Ellipse>),
            ("line", builtin::<kinds::Line>),
            ("arrow", builtin::<kinds::Arrow>),
            ("text", builtin::<kinds::Text>),
            ("polygon", builtin::<kinds::Polygon>),
            ("star", builtin::<kinds::Star>),
            ("wave", builtin::<kinds::Wave>),
            ("spiral", builtin::<kinds::Spiral>),
            ("arc", builtin::<kinds::CircularArc>),
            ("bezier", builtin::<kinds::Bezier>),
            ("particles", builtin::<kinds::Particles>),
            ("gradient", builtin::<kinds::Gradient>),
            ("path", builtin::<kinds::Path>),
        ];
        for (name, factory) in builtins {
            // Built-ins satisfy the contract checked by `register`.
            if let Err(err) = reg.register(name, factory) {
                tracing::warn!(kind = name, error = %err, "built-in shape kind rejected");
            }
        }
        reg
    }

    /// Register `factory` under `name`, replacing any previous entry.
    ///
    /// The produced kind is checked against its own defaults; a kind whose name disagrees with
    /// `name` or whose default bounds are not finite is rejected.
    pub fn register(&mut self, name: &str, factory: ShapeFactory) -> TweenResult<()> {
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !valid_name {
            return Err(TweenError::invalid_shape_class(format!(
                "\"{name}\" is not a valid type name"
            )));
        }

        let kind = factory();
        if kind.type_name() != name {
            return Err(TweenError::invalid_shape_class(format!(
                "factory for \"{name}\" produced kind \"{}\"",
                kind.type_name()
            )));
        }

        let sample = normalize_properties(name, &serde_json::Map::new(), &kind.defaults());
        let b = kind.local_bounds(&PropsView::new(&sample.props, &Props::new()));
        if !rect_is_finite(b) {
            return Err(TweenError::invalid_shape_class(format!(
                "\"{name}\" produced non-finite bounds for its defaults"
            )));
        }

        self.kinds.insert(name.to_owned(), kind);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Build a shape from its description.
    ///
    /// `fallback_id` is used when the description carries no id.
    pub fn try_create(&self, spec: &ShapeSpec, fallback_id: &str) -> TweenResult<CreatedShape> {
        let type_name = spec.kind.trim().to_ascii_lowercase();
        let kind = self
            .kinds
            .get(&type_name)
            .cloned()
            .ok_or_else(|| TweenError::unknown_shape_type(spec.kind.clone()))?;

        let raw = spec.merged_properties();
        let normalized = normalize_properties(&type_name, &raw, &kind.defaults());

        let id = spec.id.clone().unwrap_or_else(|| fallback_id.to_owned());
        let mut shape = Shape::new(id, kind, normalized.props);
        shape.visible = spec.visible;
        shape.z_index = spec.z_index;
        if let Some(layer) = &spec.layer {
            shape.layer = layer.clone();
        }
        shape.classes = spec.class_tokens();

        Ok(CreatedShape {
            shape,
            warnings: normalized.warnings,
        })
    }

    /// Soft-failing variant of [`ShapeRegistry::try_create`]: logs and returns `None` on an
    /// unknown type.
    pub fn create(&self, spec: &ShapeSpec, fallback_id: &str) -> Option<Shape> {
        match self.try_create(spec, fallback_id) {
            Ok(created) => {
                for w in &created.warnings {
                    tracing::warn!(shape_id = created.shape.id(), "{w}");
                }
                Some(created.shape)
            }
            Err(err) => {
                tracing::warn!(error = %err, "shape skipped");
                None
            }
        }
    }
}

fn rect_is_finite(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/shape/registry.rs"]
mod tests;
