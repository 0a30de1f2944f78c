use serde_json::{Map, Value};

use crate::scene::model::{Selector, TargetSpec};
use crate::shape::model::Shape;
use crate::shape::props::{canonical_key, json_to_prop};

impl Selector {
    /// Whether `shape` is selected.
    pub fn matches(&self, shape: &Shape) -> bool {
        match self {
            Self::Shorthand(s) => match s.trim() {
                "*" => true,
                s => match (s.strip_prefix('#'), s.strip_prefix('.')) {
                    (Some(id), _) => shape.id() == id,
                    (_, Some(class)) => shape.has_class(class),
                    _ => shape.id() == s,
                },
            },
            Self::Id { id } => shape.id() == id,
            Self::Class { class } => shape.has_class(class),
            Self::Type { kind } => shape.type_name().eq_ignore_ascii_case(kind),
            Self::Match { properties } => matches_properties(shape, properties),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Shorthand(s) => s.clone(),
            Self::Id { id } => format!("#{id}"),
            Self::Class { class } => format!(".{class}"),
            Self::Type { kind } => format!("type={kind}"),
            Self::Match { properties } => format!("match={}", Value::Object(properties.clone())),
        }
    }
}

// Every listed property must equal the shape's static value after normalization.
fn matches_properties(shape: &Shape, properties: &Map<String, Value>) -> bool {
    properties.iter().all(|(key, expected)| {
        let key = canonical_key(shape.type_name(), key);
        match json_to_prop(&key, expected) {
            Ok(Some(expected)) => shape.static_props().get(&key) == Some(&expected),
            _ => false,
        }
    })
}

impl TargetSpec {
    pub fn selectors(&self) -> &[Selector] {
        match self {
            Self::Many(v) => v,
            Self::One(s) => std::slice::from_ref(s),
        }
    }

    pub fn describe(&self) -> String {
        self.selectors()
            .iter()
            .map(Selector::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Ids of every selected shape, in shape order, without duplicates.
    pub fn resolve<'a>(&self, shapes: impl IntoIterator<Item = &'a Shape>) -> Vec<String> {
        let selectors = self.selectors();
        shapes
            .into_iter()
            .filter(|shape| selectors.iter().any(|sel| sel.matches(shape)))
            .map(|shape| shape.id().to_owned())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/selector.rs"]
mod tests;
