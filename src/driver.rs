//! Generator driver: schema file → validated models → source units.
//!
//! A run either produces every unit for its schema or fails; nothing is
//! written here. Writing (also all-or-nothing) lives in [`crate::output`].
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;

use crate::emit::{self, EmitOptions, SourceUnit};
use crate::error::{GenerateError, GenerateResult};
use crate::model::{self, ModelSet};
use crate::naming;
use crate::output::{self, OutputLayout};

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub schema_path: PathBuf,
    pub package: String,
    pub type_name: String,
    /// JSON Pointer selecting the schema inside a larger document.
    pub json_pointer: Option<String>,
    /// jq filter applied before the pointer; must yield one document.
    pub jq_expr: Option<String>,
    pub runtime_path: Option<String>,
}

impl GenerateRequest {
    pub fn new(schema_path: impl Into<PathBuf>, package: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            schema_path: schema_path.into(),
            package: package.into(),
            type_name: type_name.into(),
            json_pointer: None,
            jq_expr: None,
            runtime_path: None,
        }
    }

    fn label(&self) -> String { self.schema_path.to_string_lossy().to_string() }

    fn emit_options(&self) -> EmitOptions {
        let mut opts = EmitOptions::new(&self.package, self.label());
        if let Some(rt) = &self.runtime_path {
            opts.runtime_path = rt.clone();
        }
        opts
    }
}

/// Compile the schema file at `schema_path` into units of `package`.
pub fn generate(schema_path: impl AsRef<Path>, package: &str, type_name: &str) -> GenerateResult<Vec<SourceUnit>> {
    generate_with(&GenerateRequest::new(schema_path.as_ref(), package, type_name))
}

pub fn generate_with(req: &GenerateRequest) -> GenerateResult<Vec<SourceUnit>> {
    let document = load_schema(req)?;
    generate_from_value(&document, &req.type_name, &req.emit_options())
}

pub fn generate_from_value(document: &Value, type_name: &str, opts: &EmitOptions) -> GenerateResult<Vec<SourceUnit>> {
    if !naming::is_valid_package(&opts.package) {
        return Err(GenerateError::InvalidPackage(opts.package.clone()));
    }
    let set = model::build_model_set(document, type_name)?;
    let units = emit::emit_models(&set, opts)?;
    tracing::info!(
        schema = %opts.source_label,
        package = %opts.package,
        root = %type_name,
        units = units.len(),
        "generated"
    );
    Ok(units)
}

/// Models only, for inspection.
pub fn models_with(req: &GenerateRequest) -> GenerateResult<ModelSet> {
    let document = load_schema(req)?;
    Ok(model::build_model_set(&document, &req.type_name)?)
}

/// Read, parse (key order preserved), then apply the jq filter and pointer.
pub fn load_schema(req: &GenerateRequest) -> GenerateResult<Value> {
    let label = req.label();
    let source = std::fs::read_to_string(&req.schema_path).map_err(|source| GenerateError::Read {
        path: req.schema_path.clone(),
        source,
    })?;
    let mut document: Value = serde_json::from_str(&source).map_err(|source| GenerateError::Json {
        path: label.clone(),
        source,
    })?;

    if let Some(jq_expr) = &req.jq_expr {
        let mut results = crate::jq_exec::run_jaq(jq_expr, &document).map_err(|e| GenerateError::Jq {
            path: label.clone(),
            message: e.to_string(),
        })?;
        if results.len() != 1 {
            return Err(GenerateError::Jq {
                path: label,
                message: format!("expected exactly one result, got {}", results.len()),
            });
        }
        document = results.remove(0);
    }

    match &req.json_pointer {
        None => Ok(document),
        Some(pointer) => document
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| GenerateError::PointerNotFound { path: label, pointer: pointer.clone() }),
    }
}

/// PascalCase of the file stem: `main_response.json` → `MainResponse`.
pub fn default_type_name(schema_path: &Path) -> String {
    let stem = schema_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    naming::to_pascal_case(&stem)
}

// ------------------------------- Batches ---------------------------------- //

#[derive(Debug, Clone)]
pub struct BatchJob {
    pub request: GenerateRequest,
    pub out_dir: PathBuf,
    pub layout: OutputLayout,
}

/// Run independent jobs on the rayon pool. Each job owns its models and
/// emitter state; results come back in job order.
pub fn run_batch(jobs: &[BatchJob]) -> Vec<GenerateResult<Vec<PathBuf>>> {
    jobs.par_iter()
        .map(|job| {
            let units = generate_with(&job.request)?;
            output::write_units(&units, &job.out_dir, &job.layout)
        })
        .collect()
}
