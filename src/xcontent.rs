//! Runtime support for generated wire models.
//!
//! Generated code only ever names items through this module, so a consumer
//! depends on `json-wiregen` alone:
//!
//! - [`ToXContent`] writes a value into an [`XContentBuilder`] between
//!   start/end markers, in declared field order.
//! - [`FromXContent`] reads a value back; generated models implement it with
//!   a [`ConstructingObjectParser`], which collects wire values by position
//!   and hands them to the model's `new` in one call.
pub mod builder;
pub mod parser;

use std::collections::BTreeMap;

use thiserror::Error;

pub use builder::XContentBuilder;
pub use parser::{Args, ConstructingObjectParser};
pub use serde_json::{Number, Value};

use crate::classify::kind_of;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XContentError {
    #[error("[{object}] missing required field [{field}]")]
    MissingField { object: String, field: String },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: &'static str, found: &'static str },

    #[error("[{object}] failed to parse field [{field}]: {source}")]
    Field {
        object: String,
        field: String,
        #[source]
        source: Box<XContentError>,
    },

    #[error("failed to parse element [{index}]: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<XContentError>,
    },

    #[error("builder framing error: {0}")]
    Framing(String),

    #[error("invalid JSON: {0}")]
    Json(String),
}

/// Request parameters threaded through every serializer call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub fn empty() -> Self { Self::default() }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> { self.values.get(key).map(String::as_str) }

    /// `"true"`/`"false"` (or a bare flag, which reads as `true`).
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some("" | "true") => true,
            Some(_) => false,
        }
    }
}

pub trait ToXContent {
    fn to_x_content(&self, builder: &mut XContentBuilder, params: &Params) -> Result<(), XContentError>;
}

pub trait FromXContent: Sized {
    fn from_x_content(value: &Value) -> Result<Self, XContentError>;
}

// ------------------------------ Leaf impls -------------------------------- //

fn unexpected(expected: &'static str, found: &Value) -> XContentError {
    XContentError::UnexpectedToken { expected, found: kind_of(found) }
}

impl ToXContent for String {
    fn to_x_content(&self, builder: &mut XContentBuilder, _: &Params) -> Result<(), XContentError> {
        builder.value(Value::String(self.clone()))
    }
}

impl FromXContent for String {
    fn from_x_content(value: &Value) -> Result<Self, XContentError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(unexpected("string", other)),
        }
    }
}

impl ToXContent for bool {
    fn to_x_content(&self, builder: &mut XContentBuilder, _: &Params) -> Result<(), XContentError> {
        builder.value(Value::Bool(*self))
    }
}

impl FromXContent for bool {
    fn from_x_content(value: &Value) -> Result<Self, XContentError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(unexpected("boolean", other)),
        }
    }
}

impl ToXContent for Number {
    fn to_x_content(&self, builder: &mut XContentBuilder, _: &Params) -> Result<(), XContentError> {
        builder.value(Value::Number(self.clone()))
    }
}

impl FromXContent for Number {
    fn from_x_content(value: &Value) -> Result<Self, XContentError> {
        match value {
            Value::Number(n) => Ok(n.clone()),
            other => Err(unexpected("number", other)),
        }
    }
}

impl<T: ToXContent> ToXContent for Vec<T> {
    fn to_x_content(&self, builder: &mut XContentBuilder, params: &Params) -> Result<(), XContentError> {
        builder.start_array()?;
        for item in self {
            item.to_x_content(builder, params)?;
        }
        builder.end_array()
    }
}

impl<T: FromXContent> FromXContent for Vec<T> {
    fn from_x_content(value: &Value) -> Result<Self, XContentError> {
        let Value::Array(xs) = value else {
            return Err(unexpected("array", value));
        };
        xs.iter()
            .enumerate()
            .map(|(index, x)| {
                T::from_x_content(x).map_err(|e| XContentError::Element { index, source: Box::new(e) })
            })
            .collect()
    }
}

// ------------------------------- Front API -------------------------------- //

pub fn to_value<T: ToXContent + ?Sized>(value: &T, params: &Params) -> Result<Value, XContentError> {
    let mut builder = XContentBuilder::new();
    value.to_x_content(&mut builder, params)?;
    builder.finish()
}

pub fn to_json_string<T: ToXContent + ?Sized>(value: &T, params: &Params) -> Result<String, XContentError> {
    let v = to_value(value, params)?;
    let out = if params.get_bool("pretty", false) {
        serde_json::to_string_pretty(&v)
    } else {
        serde_json::to_string(&v)
    };
    out.map_err(|e| XContentError::Json(e.to_string()))
}

/// Order-preserving parse of `src`, then [`FromXContent`].
pub fn from_json_str<T: FromXContent>(src: &str) -> Result<T, XContentError> {
    let v: Value = serde_json::from_str(src).map_err(|e| XContentError::Json(e.to_string()))?;
    T::from_x_content(&v)
}
