use crate::core::model_path::ModelPath;
use serde_json::Value;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
        }
    }
}

/// Children of an object (insertion order) or array (index order). Every
/// other value has none.
pub fn child_entries(value: &Value) -> Vec<(Cow<'_, str>, &Value)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| (Cow::Borrowed(key.as_str()), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, child)| (Cow::Owned(index.to_string()), child))
            .collect(),
        _ => Vec::new(),
    }
}

/// A branch is a value with at least one child entry.
pub fn is_branch(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

pub fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

pub fn get<'a>(root: &'a Value, path: &ModelPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| child(current, segment))
}

pub fn get_mut<'a>(root: &'a mut Value, path: &ModelPath) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match current {
            Value::Object(map) => map.get_mut(segment.as_str())?,
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Only the canonical decimal form addresses an element: `"01"` and `"+1"`
/// are not keys that `child_entries` would produce.
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    let index = segment.parse::<usize>().ok()?;
    (index.to_string() == segment).then_some(index)
}

pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Object(map) if map.is_empty() => "{ }".to_string(),
        Value::Array(items) if items.is_empty() => "[ ]".to_string(),
        Value::Null => "null".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
