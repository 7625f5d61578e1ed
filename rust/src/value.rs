//! Typed views over the dynamically-typed settings map.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::StoreError;

/// The JSON shape of a stored value, used in type-mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn mismatch(key: &str, expected: ValueKind, value: &Value) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_owned(),
        expected,
        actual: ValueKind::of(value),
    }
}

pub(crate) fn into_string(key: &str, value: Value) -> Result<String, StoreError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(mismatch(key, ValueKind::String, &other)),
    }
}

/// Integers come back as-is. Any other number is truncated toward zero, and
/// values outside `i64` saturate; JSON has no separate integer type, so
/// `8080.0` must read as `8080`.
pub(crate) fn into_int(key: &str, value: Value) -> Result<i64, StoreError> {
    match &value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i),
            None => n
                .as_f64()
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| mismatch(key, ValueKind::Number, &value)),
        },
        other => Err(mismatch(key, ValueKind::Number, other)),
    }
}

pub(crate) fn into_float(key: &str, value: Value) -> Result<f64, StoreError> {
    match &value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| mismatch(key, ValueKind::Number, &value)),
        other => Err(mismatch(key, ValueKind::Number, other)),
    }
}

pub(crate) fn into_bool(key: &str, value: Value) -> Result<bool, StoreError> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(key, ValueKind::Bool, &other)),
    }
}

pub(crate) fn into_map(key: &str, value: Value) -> Result<Map<String, Value>, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(mismatch(key, ValueKind::Object, &other)),
    }
}

pub(crate) fn into_array(key: &str, value: Value) -> Result<Vec<Value>, StoreError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(mismatch(key, ValueKind::Array, &other)),
    }
}
