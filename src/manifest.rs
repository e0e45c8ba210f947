//! Batch manifest: several generation jobs described in one JSON file.
//!
//! ```json
//! {
//!   "runtime_path": "::json_wiregen::xcontent",
//!   "out_dir": "generated",
//!   "jobs": [
//!     { "schema": "schemas/v7/main_response.json", "package": "wire::v7",
//!       "type_name": "MainResponse", "combined": "v7.rs" }
//!   ]
//! }
//! ```
//!
//! Relative paths resolve against the manifest's own directory.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::driver::{self, BatchJob, GenerateRequest};
use crate::error::{GenerateError, GenerateResult};
use crate::output::OutputLayout;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub runtime_path: Option<String>,
    pub out_dir: PathBuf,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub schema: PathBuf,
    pub package: String,
    /// Defaults to the PascalCase file stem of `schema`.
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub json_pointer: Option<String>,
    #[serde(default)]
    pub jq_expr: Option<String>,
    /// Write one combined file instead of one file per type.
    #[serde(default)]
    pub combined: Option<String>,
    /// Per-job output directory, relative to the manifest's `out_dir`.
    #[serde(default)]
    pub out_subdir: Option<PathBuf>,
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

impl Manifest {
    pub fn load(path: &Path) -> GenerateResult<Self> {
        let src = std::fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest: Manifest = from_str_with_path(&src).map_err(|message| GenerateError::Manifest {
            path: path.to_path_buf(),
            message,
        })?;
        let base = path.parent().unwrap_or(Path::new("."));
        manifest.out_dir = base.join(&manifest.out_dir);
        for job in &mut manifest.jobs {
            job.schema = base.join(&job.schema);
        }
        Ok(manifest)
    }

    pub fn batch_jobs(&self) -> Vec<BatchJob> {
        self.jobs
            .iter()
            .map(|job| {
                let type_name = job
                    .type_name
                    .clone()
                    .unwrap_or_else(|| driver::default_type_name(&job.schema));
                let mut request = GenerateRequest::new(&job.schema, &job.package, type_name);
                request.json_pointer = job.json_pointer.clone();
                request.jq_expr = job.jq_expr.clone();
                request.runtime_path = self.runtime_path.clone();
                let out_dir = match &job.out_subdir {
                    Some(sub) => self.out_dir.join(sub),
                    None => self.out_dir.clone(),
                };
                let layout = match &job.combined {
                    Some(name) => OutputLayout::Combined(name.clone()),
                    None => OutputLayout::PerType,
                };
                BatchJob { request, out_dir, layout }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wiregen.json");
        std::fs::write(
            &path,
            r#"{
                "out_dir": "gen",
                "jobs": [
                    {"schema": "schemas/v7/main_response.json", "package": "wire::v7", "combined": "v7.rs"},
                    {"schema": "schemas/v8/main_response.json", "package": "wire::v8", "type_name": "Main", "out_subdir": "v8"}
                ]
            }"#,
        )
        .unwrap();
        let manifest = Manifest::load(&path).unwrap();
        let jobs = manifest.batch_jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].request.schema_path, dir.path().join("schemas/v7/main_response.json"));
        assert_eq!(jobs[0].request.type_name, "MainResponse");
        assert_eq!(jobs[0].layout, OutputLayout::Combined("v7.rs".into()));
        assert_eq!(jobs[0].out_dir, dir.path().join("gen"));
        assert_eq!(jobs[1].request.type_name, "Main");
        assert_eq!(jobs[1].layout, OutputLayout::PerType);
        assert_eq!(jobs[1].out_dir, dir.path().join("gen").join("v8"));
    }

    #[test]
    fn errors_name_the_json_path() {
        let err = from_str_with_path::<Manifest>(r#"{"out_dir": "g", "jobs": [{"schema": "s", "package": 7}]}"#)
            .unwrap_err();
        assert!(err.starts_with("at JSON path jobs[0].package"), "{err}");

        let err = from_str_with_path::<Manifest>(r#"{"out_dir": "g", "jobs": [], "extra": 1}"#).unwrap_err();
        assert!(err.contains("extra"), "{err}");
    }
}
