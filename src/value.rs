//! Helpers over [`serde_json::Value`] documents.
//!
//! # Structural merge
//!
//! Writing a value into a target location that already holds something
//! follows one rule, applied recursively:
//!
//! - object into object: merge property by property
//! - array into array: the incoming elements followed by the existing ones
//! - anything else: replace with a copy of the incoming value
//!
//! ```
//! use jmap_lang::value::merge_into;
//! use serde_json::json;
//!
//! let mut existing = json!({"a": {"x": 1}, "list": [3], "s": "old"});
//! merge_into(&mut existing, &json!({"a": {"y": 2}, "list": [1, 2], "s": "new"}));
//! assert_eq!(existing, json!({"a": {"x": 1, "y": 2}, "list": [1, 2, 3], "s": "new"}));
//! ```

use serde_json::{Map, Value};

/// Merges `incoming` into `existing` in place.
pub fn merge_into(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Object(ours), Value::Object(theirs)) => {
            for (name, value) in theirs {
                merge_property(ours, name, value);
            }
        }
        (Value::Array(ours), Value::Array(theirs)) => {
            let mut merged = theirs.clone();
            merged.append(ours);
            *ours = merged;
        }
        (existing, incoming) => *existing = incoming.clone(),
    }
}

/// Merges `incoming` into property `name` of `target`, creating it if absent.
pub fn merge_property(target: &mut Map<String, Value>, name: &str, incoming: &Value) {
    match target.get_mut(name) {
        Some(existing) => merge_into(existing, incoming),
        None => {
            target.insert(name.to_string(), incoming.clone());
        }
    }
}

/// Text of a scalar, `None` for arrays and objects.
///
/// Null becomes the empty string.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Follows property names from `value`; every step needs an object.
pub fn walk<'a, S: AsRef<str>>(value: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, name| current.as_object()?.get(name.as_ref()))
}

/// JSON type name for messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
