//! Attribute type casts.
//!
//! A cast pins the read-side type of a field. Null never survives a cast:
//! the declared type's zero value is substituted instead, so explicitly-typed
//! fields are never nullable from the caller's point of view.

use serde_json::{Map, Number, Value};

/// Declared type for a cast field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Integer,
    Float,
    Str,
    Bool,
    Object,
    Array,
}

impl CastType {
    /// Canonical zero value for the type.
    pub fn zero_value(self) -> Value {
        match self {
            CastType::Integer => Value::from(0),
            CastType::Float => Value::from(0.0),
            CastType::Str => Value::String(String::new()),
            CastType::Bool => Value::Bool(false),
            CastType::Object => Value::Object(Map::new()),
            CastType::Array => Value::Array(Vec::new()),
        }
    }

    /// Coerce a stored value to the declared type. Null always becomes the
    /// zero value; anything that cannot be coerced does too.
    pub fn cast(self, value: Value) -> Value {
        if value.is_null() {
            return self.zero_value();
        }
        match self {
            CastType::Integer => match &value {
                Value::Number(number) => number
                    .as_i64()
                    .or_else(|| number.as_f64().map(|f| f as i64))
                    .map(Value::from)
                    .unwrap_or_else(|| self.zero_value()),
                Value::String(text) => text
                    .trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| self.zero_value()),
                Value::Bool(flag) => Value::from(*flag as i64),
                _ => self.zero_value(),
            },
            CastType::Float => match &value {
                Value::Number(number) => number
                    .as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| self.zero_value()),
                Value::String(text) => text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| self.zero_value()),
                _ => self.zero_value(),
            },
            CastType::Str => match value {
                Value::String(_) => value,
                Value::Number(number) => Value::String(number.to_string()),
                Value::Bool(flag) => Value::String(flag.to_string()),
                _ => self.zero_value(),
            },
            CastType::Bool => match &value {
                Value::Bool(_) => value,
                Value::Number(number) => Value::Bool(number.as_f64() != Some(0.0)),
                Value::String(text) => {
                    Value::Bool(!text.is_empty() && text != "0" && text != "false")
                }
                _ => self.zero_value(),
            },
            CastType::Object => match value {
                Value::Object(_) => value,
                Value::String(text) => serde_json::from_str::<Value>(&text)
                    .ok()
                    .filter(Value::is_object)
                    .unwrap_or_else(|| self.zero_value()),
                _ => self.zero_value(),
            },
            CastType::Array => match value {
                Value::Array(_) => value,
                Value::String(text) => serde_json::from_str::<Value>(&text)
                    .ok()
                    .filter(Value::is_array)
                    .unwrap_or_else(|| self.zero_value()),
                _ => self.zero_value(),
            },
        }
    }
}
