//! Value classification: one JSON example value → one field type.
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::naming;

/// Closed set of field types a schema-by-example can express.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    Number,
    /// A generated model type, by name.
    Ref(String),
    ArrayOf(Box<FieldType>),
}

impl FieldType {
    /// The model type this field ultimately points at, looking through arrays.
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            FieldType::Ref(name) => Some(name),
            FieldType::ArrayOf(inner) => inner.referenced_type(),
            FieldType::String | FieldType::Bool | FieldType::Number => None,
        }
    }
}

pub fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Classify the example `value` found under `key` at dotted `path`.
///
/// Objects become a reference to a type named after `key`. Arrays take the
/// type of their first element; every example array must be non-empty.
pub fn classify(path: &str, key: &str, value: &Value) -> Result<FieldType, SchemaError> {
    match value {
        Value::Null => Err(SchemaError::UntypableValue {
            path: path.to_string(),
            reason: "null carries no type",
        }),
        Value::Bool(_) => Ok(FieldType::Bool),
        Value::Number(_) => Ok(FieldType::Number),
        Value::String(_) => Ok(FieldType::String),
        Value::Object(_) => Ok(FieldType::Ref(naming::to_pascal_case(key))),
        Value::Array(xs) => match xs.first() {
            None => Err(SchemaError::UntypableValue {
                path: path.to_string(),
                reason: "empty array has no element to infer from",
            }),
            Some(first) => Ok(FieldType::ArrayOf(Box::new(classify(path, key, first)?))),
        },
    }
}

/// The object that defines a field's nested model, if any: the value itself,
/// or the first element of (possibly nested) arrays.
pub fn defining_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(m) => Some(m),
        Value::Array(xs) => xs.first().and_then(defining_object),
        _ => None,
    }
}
