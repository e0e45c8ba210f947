//! Error taxonomy for one generation run.
//!
//! Every variant here is fatal to the run that raised it: generation is
//! deterministic, so nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the schema document itself, found while classifying,
/// flattening, or building object models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// `null`, or an empty array whose element type cannot be inferred.
    #[error("cannot infer a type for `{path}`: {reason}")]
    UntypableValue { path: String, reason: &'static str },

    /// A nested object would define the same type as one of its ancestors.
    #[error("`{path}` would make type `{type_name}` contain itself (first defined at `{ancestor}`)")]
    CyclicReference { path: String, type_name: String, ancestor: String },

    #[error("type name `{type_name}` is produced by both `{first}` and `{second}`")]
    DuplicateTypeName { type_name: String, first: String, second: String },

    #[error("keys `{first}` and `{second}` of `{path}` both map to field `{ident}`")]
    DuplicateFieldName { path: String, ident: String, first: String, second: String },

    #[error("the schema root must be a JSON object, found {found}")]
    RootNotObject { found: &'static str },

    #[error("`{0}` is not a valid type name")]
    InvalidTypeName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("field `{field}` of `{model}` references unknown type `{type_name}`")]
    UnknownRef { model: String, field: String, type_name: String },
}

/// Everything the driver can fail with.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in `{path}`: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest `{path}`: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("JSON pointer `{pointer}` selects nothing in `{path}`")]
    PointerNotFound { path: String, pointer: String },

    #[error("jq filter failed on `{path}`: {message}")]
    Jq { path: String, message: String },

    #[error("`{0}` is not a valid module path")]
    InvalidPackage(String),

    #[error("{0}")]
    Input(String),
}

pub type GenerateResult<T> = Result<T, GenerateError>;
