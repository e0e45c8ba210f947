//! Schema-by-example wire-model compiler.
//!
//! An example JSON response is the schema. Its nested objects are flattened
//! into ordered [`model::ObjectModel`]s, and each model is emitted as a Rust
//! source unit carrying a constructor, a positional constructing-parser and
//! an ordered serializer written against [`xcontent`].
//!
//! Pipeline:
//! 1. [`classify`]: one example value → one [`classify::FieldType`]
//! 2. [`flatten`]: object nodes, deepest first
//! 3. [`model`]: one object model per node, fields in schema key order
//! 4. [`emit`]: one source unit per model
//! 5. [`driver`] / [`output`]: read, generate, write (all or nothing)
pub mod classify;
pub mod cli;
pub mod driver;
pub mod emit;
pub mod error;
pub mod flatten;
pub mod jq_exec;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod output;
pub mod xcontent;

pub use driver::{GenerateRequest, generate, generate_with};
pub use emit::{EmitOptions, SourceUnit};
pub use error::{EmitError, GenerateError, SchemaError};
