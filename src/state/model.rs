use crate::core::json_text::{self, ParseFailure};
use crate::core::model_path::ModelPath;
use crate::core::value::{self, parse_index};
use crate::state::store::{Store, SubscriptionId};
use serde_json::Value;
use tracing::debug;

/// New content for the text form. Raw text is kept exactly as typed; a
/// value is pretty-printed first.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorText {
    Raw(String),
    Value(Value),
}

impl From<String> for EditorText {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<&str> for EditorText {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string())
    }
}

impl From<Value> for EditorText {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no value at {0}")]
    PathNotFound(ModelPath),
    #[error("the root node cannot be removed")]
    RootRemoval,
    #[error("no node is being edited")]
    NoActiveEdit,
}

/// Owns the model value and its text form and keeps them in step.
#[derive(Debug)]
pub struct ModelStore {
    model: Store<Value>,
    text: Store<String>,
    indent: usize,
}

impl ModelStore {
    pub fn new(indent: usize) -> Self {
        Self::with_value(Value::Null, indent)
    }

    pub fn with_value(value: Value, indent: usize) -> Self {
        let text = json_text::serialize(&value, indent);
        Self {
            model: Store::new(value),
            text: Store::new(text),
            indent,
        }
    }

    pub fn model(&self) -> &Value {
        self.model.get()
    }

    pub fn text(&self) -> &str {
        self.text.get().as_str()
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn subscribe_model(
        &mut self,
        subscriber: impl FnMut(&Value) + 'static,
    ) -> SubscriptionId {
        self.model.subscribe(subscriber)
    }

    pub fn subscribe_text(
        &mut self,
        subscriber: impl FnMut(&String) + 'static,
    ) -> SubscriptionId {
        self.text.subscribe(subscriber)
    }

    pub fn parse(&self, text: &str) -> Result<Value, ParseFailure> {
        json_text::parse(text)
    }

    pub fn serialize(&self, value: &Value) -> String {
        json_text::serialize(value, self.indent)
    }

    pub fn set_editor_text(&mut self, text: impl Into<EditorText>) {
        let next = match text.into() {
            EditorText::Raw(raw) => raw,
            EditorText::Value(value) => self.serialize(&value),
        };
        self.text.set(next);
    }

    /// Takes text from the editor. The text form always becomes `raw`; the
    /// model only changes when `raw` parses, otherwise the last good model
    /// stays in place.
    pub fn apply_editor_text(&mut self, raw: impl Into<String>) -> Result<(), ParseFailure> {
        let raw = raw.into();
        let parsed = json_text::parse(&raw);
        self.set_editor_text(EditorText::Raw(raw));
        let value = parsed?;
        debug!("model replaced from editor text");
        self.model.set(value);
        Ok(())
    }

    /// Replaces the model from a non-editor source; the text is rewritten in
    /// canonical form.
    pub fn replace_model(&mut self, value: Value) {
        self.set_editor_text(EditorText::Value(value.clone()));
        self.model.set(value);
    }

    pub fn set_value_at(&mut self, path: &ModelPath, new_value: Value) -> Result<(), EditError> {
        let mut next = self.model().clone();
        let slot = value::get_mut(&mut next, path)
            .ok_or_else(|| EditError::PathNotFound(path.clone()))?;
        *slot = new_value;
        debug!(path = %path, "value replaced");
        self.replace_model(next);
        Ok(())
    }

    /// Removes an object member or array element. Later array elements shift
    /// down by one.
    pub fn remove_at(&mut self, path: &ModelPath) -> Result<Value, EditError> {
        let (Some(parent), Some(segment)) = (path.parent(), path.last()) else {
            return Err(EditError::RootRemoval);
        };
        let mut next = self.model().clone();
        let removed = match value::get_mut(&mut next, &parent) {
            Some(Value::Object(map)) => map.shift_remove(segment),
            Some(Value::Array(items)) => parse_index(segment)
                .filter(|index| *index < items.len())
                .map(|index| items.remove(index)),
            _ => None,
        };
        let removed = removed.ok_or_else(|| EditError::PathNotFound(path.clone()))?;
        debug!(path = %path, "value removed");
        self.replace_model(next);
        Ok(removed)
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(json_text::DEFAULT_INDENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_text_is_kept_verbatim() {
        let mut store = ModelStore::default();
        let raw = "{ \"a\" :1 }";
        store.apply_editor_text(raw).expect("valid json");

        assert_eq!(store.text(), raw);
        assert_eq!(store.model(), &json!({"a": 1}));
    }

    #[test]
    fn value_text_is_canonical() {
        let mut store = ModelStore::default();
        store.set_editor_text(json!({"a": [1]}));
        assert_eq!(store.text(), "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn parse_failure_keeps_last_good_model() {
        let mut store = ModelStore::with_value(json!({"a": 1}), 2);
        let err = store.apply_editor_text("{\"a\": ").expect_err("incomplete json");

        assert!(!err.message.is_empty());
        assert_eq!(store.model(), &json!({"a": 1}));
        assert_eq!(store.text(), "{\"a\": ");
    }

    #[test]
    fn set_value_at_rewrites_text() {
        let mut store = ModelStore::with_value(json!({"a": {"b": 0}}), 2);
        store
            .set_value_at(&ModelPath::from(["a", "b"]), json!("x"))
            .expect("path exists");

        assert_eq!(store.model(), &json!({"a": {"b": "x"}}));
        assert_eq!(store.text(), "{\n  \"a\": {\n    \"b\": \"x\"\n  }\n}");
    }

    #[test]
    fn set_value_at_root_replaces_model() {
        let mut store = ModelStore::with_value(json!({"a": 1}), 2);
        store.set_value_at(&ModelPath::root(), json!([true])).expect("root");
        assert_eq!(store.model(), &json!([true]));
    }

    #[test]
    fn set_value_at_missing_path_fails_soft() {
        let mut store = ModelStore::with_value(json!({"a": 1}), 2);
        let before = store.text().to_string();
        let err = store
            .set_value_at(&ModelPath::from(["a", "b"]), json!(2))
            .expect_err("a is a scalar");

        assert_eq!(err, EditError::PathNotFound(ModelPath::from(["a", "b"])));
        assert_eq!(store.text(), before);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut store = ModelStore::with_value(json!({"z": 1, "a": 2, "m": [1, 2, 3]}), 2);
        let removed = store.remove_at(&ModelPath::from(["a"])).expect("member");
        assert_eq!(removed, json!(2));
        let keys: Vec<&String> = store.model().as_object().expect("object").keys().collect();
        assert_eq!(keys, vec!["z", "m"]);

        store.remove_at(&ModelPath::from(["m", "0"])).expect("element");
        assert_eq!(store.model(), &json!({"z": 1, "m": [2, 3]}));
    }

    #[test]
    fn remove_rejects_root_and_misses() {
        let mut store = ModelStore::with_value(json!([1]), 2);
        assert_eq!(store.remove_at(&ModelPath::root()), Err(EditError::RootRemoval));
        assert_eq!(
            store.remove_at(&ModelPath::from(["3"])),
            Err(EditError::PathNotFound(ModelPath::from(["3"])))
        );
    }

    #[test]
    fn text_subscribers_see_each_write() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut store = ModelStore::with_value(json!(1), 2);
        store.subscribe_text(move |text| sink.borrow_mut().push(text.clone()));
        store.replace_model(json!(2));

        assert_eq!(*seen.borrow(), vec!["1".to_string(), "2".to_string()]);
    }
}
