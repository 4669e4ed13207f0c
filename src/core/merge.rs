//! Shape completion against the default configuration.
//!
//! Completion is one-directional: keys missing from the target are copied from
//! the defaults, nested objects are completed recursively, and values the user
//! already set are never overwritten. Arrays count as leaves.

use serde_json::{Map, Value};

/// Fill every key of `defaults` that is missing from `target`, recursively.
///
/// Returns `true` if anything was added.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use settings_store::core::complete_shape;
///
/// let defaults = json!({ "java": { "path": "", "args": "--version" } });
/// let mut target = json!({ "java": { "path": "/usr/bin/java" } });
///
/// assert!(complete_shape(target.as_object_mut().unwrap(), defaults.as_object().unwrap()));
/// assert_eq!(target, json!({ "java": { "path": "/usr/bin/java", "args": "--version" } }));
/// ```
pub fn complete_shape(target: &mut Map<String, Value>, defaults: &Map<String, Value>) -> bool {
    let mut changed = false;
    for (key, default_value) in defaults {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), default_value.clone());
                changed = true;
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(nested_defaults) = default_value {
                    changed |= complete_shape(existing, nested_defaults);
                }
            }
            // A leaf (or a type the user changed) is left alone.
            Some(_) => {}
        }
    }
    changed
}

/// Return a shape-completed copy of `value`.
///
/// Non-object values are returned unchanged.
pub fn completed(value: &Value, defaults: &Map<String, Value>) -> Value {
    let mut copy = value.clone();
    if let Value::Object(map) = &mut copy {
        complete_shape(map, defaults);
    }
    copy
}

/// One-level equality.
///
/// Objects are equal when they have the same key set and each pair of direct
/// children is equal; arrays compare element-wise one level down. Owned JSON
/// values carry no identity, so nested children compare by value.
pub fn shallow_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, value)| right.get(key).is_some_and(|other| value == other))
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l == r)
        }
        _ => a == b,
    }
}
