//! # Parameter Store
//!
//! Request-scoped nested key-value data addressed by dot-separated paths
//! (`"billing.plan.name"`). The store has no persistence; it lives for the
//! duration of one request and is discarded with it.
//!
//! [`ParamStore::only`] deliberately drops falsy leaf values (`null`, `false`,
//! numeric zero, empty string, empty container) while [`ParamStore::except`]
//! does not — callers relying on `only` for projection of flags must keep that
//! asymmetry in mind. [`ParamStore::has`] is existence-based and treats an
//! explicit `null` as present.

use serde_json::{Map, Value};

/// Nested mapping with dotted-path accessors.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParamStore {
    data: Map<String, Value>,
}

/// A falsy leaf for the purposes of [`ParamStore::only`].
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object (e.g. a record's `params` attribute).
    /// Non-object values yield an empty store.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(data) => Self { data },
            _ => Self::default(),
        }
    }

    /// Consume the store back into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    /// Set a value at a dotted path, creating intermediate objects as needed.
    /// A scalar sitting at an intermediate level is overwritten by an object.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut segments = path.split('.').peekable();
        let mut current = &mut self.data;

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value.into());
                return;
            }
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = slot.as_object_mut().unwrap();
        }
    }

    /// Shallow-replace the top-level keys present in `values`, leaving the
    /// rest of the store untouched.
    pub fn set_many(&mut self, values: Map<String, Value>) {
        for (key, value) in values {
            self.data.insert(key, value);
        }
    }

    /// Remove the leaf at a dotted path. Missing paths are a no-op.
    pub fn unset(&mut self, path: &str) {
        let mut segments = path.split('.').peekable();
        let mut current = &mut self.data;

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.remove(segment);
                return;
            }
            match current.get_mut(segment).and_then(Value::as_object_mut) {
                Some(next) => current = next,
                None => return,
            }
        }
    }

    /// The value at a dotted path, if every segment resolves.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current: Option<&Value> = None;
        let mut map = Some(&self.data);

        for segment in path.split('.') {
            let value = map?.get(segment)?;
            map = value.as_object();
            current = Some(value);
        }
        current
    }

    /// The value at a dotted path, or `default` if any segment is missing.
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).cloned().unwrap_or(default)
    }

    /// True iff every segment of the path resolves to an existing entry,
    /// including an entry holding an explicit `null`.
    pub fn has(&self, path: &str) -> bool {
        let mut map = Some(&self.data);
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let Some(current) = map else { return false };
            let Some(value) = current.get(segment) else {
                return false;
            };
            if segments.peek().is_none() {
                return true;
            }
            map = value.as_object();
        }
        false
    }

    /// A new top-level mapping containing only the given paths.
    ///
    /// Falsy leaf values are silently dropped; see the module docs.
    pub fn only(&self, paths: &[&str]) -> Map<String, Value> {
        let mut projected = ParamStore::new();
        for path in paths {
            if let Some(value) = self.get(path) {
                if !is_falsy(value) {
                    projected.set(path, value.clone());
                }
            }
        }
        projected.data
    }

    /// A new top-level mapping containing everything but the given paths.
    pub fn except(&self, paths: &[&str]) -> Map<String, Value> {
        let mut remaining = self.clone();
        for path in paths {
            remaining.unset(path);
        }
        remaining.data
    }

    /// Owned snapshot of the full backing mapping.
    pub fn all(&self) -> Map<String, Value> {
        self.data.clone()
    }
}
