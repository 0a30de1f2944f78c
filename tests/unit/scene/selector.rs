use super::*;
use crate::scene::model::ShapeSpec;
use crate::shape::registry::ShapeRegistry;
use serde_json::json;

fn shapes() -> Vec<Shape> {
    let reg = ShapeRegistry::with_builtins();
    [
        json!({"id": "a", "type": "circle", "class": "dot", "properties": {"fill": "red", "r": 5}}),
        json!({"id": "b", "type": "circle", "class": ["dot", "big"], "properties": {"r": 9}}),
        json!({"id": "c", "type": "text", "properties": {"text": "hi"}}),
    ]
    .into_iter()
    .map(|v| {
        let spec: ShapeSpec = serde_json::from_value(v).unwrap();
        reg.try_create(&spec, "x").unwrap().shape
    })
    .collect()
}

fn resolve(target: serde_json::Value) -> Vec<String> {
    let target: TargetSpec = serde_json::from_value(target).unwrap();
    target.resolve(&shapes())
}

#[test]
fn by_id_class_and_type() {
    assert_eq!(resolve(json!("b")), vec!["b"]);
    assert_eq!(resolve(json!("#c")), vec!["c"]);
    assert_eq!(resolve(json!({"id": "a"})), vec!["a"]);
    assert_eq!(resolve(json!(".dot")), vec!["a", "b"]);
    assert_eq!(resolve(json!({"class": "big"})), vec!["b"]);
    assert_eq!(resolve(json!({"type": "text"})), vec!["c"]);
    assert_eq!(resolve(json!("*")).len(), 3);
}

#[test]
fn property_match_uses_normalized_values() {
    assert_eq!(resolve(json!({"match": {"radius": 9}})), vec!["b"]);
    assert_eq!(resolve(json!({"match": {"color": "#ff0000"}})), vec!["a"]);
    assert_eq!(resolve(json!({"match": {"r": 5, "fill": "red"}})), vec!["a"]);
    assert!(resolve(json!({"match": {"r": 6}})).is_empty());
}

#[test]
fn arrays_union_without_duplicates_in_shape_order() {
    assert_eq!(resolve(json!(["c", ".dot", "a"])), vec!["a", "b", "c"]);
}

#[test]
fn unknown_selectors_resolve_to_nothing() {
    assert!(resolve(json!("nope")).is_empty());
    assert!(resolve(json!({"type": "star"})).is_empty());
}

#[test]
fn describe_is_readable() {
    let target: TargetSpec = serde_json::from_value(json!([{"id": "a"}, ".dot"])).unwrap();
    assert_eq!(target.describe(), "#a, .dot");
}
