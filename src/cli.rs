//! CLI: schema-by-example → (models | rust wire units | manifest batch)
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::driver::{self, GenerateRequest};
use crate::emit::SourceUnit;
use crate::manifest::Manifest;
use crate::output::{self, OutputLayout};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile example JSON responses into Rust wire models with positional parsers and ordered serializers
#[derive(Parser, Debug)]
#[command(name = "json-wiregen", version)]
pub struct CommandLineInterface {
    /// more logging (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit Rust source units for each schema
    Generate(GenerateOut),
    /// print the flattened object models as JSON
    Models(ModelsOut),
    /// run every job of a manifest, in parallel
    Batch(BatchIn),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the schema inside each document (e.g. /examples/main)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq pre-process filter for each document; must yield exactly one document
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more schema files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// module path the units belong to (e.g. wire::v8)
    #[arg(long)]
    package: String,

    /// root type name; defaults to the PascalCase file stem (single input only)
    #[arg(long)]
    type_name: Option<String>,

    /// runtime module generated code refers to
    #[arg(long)]
    runtime_path: Option<String>,

    /// output directory (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// write one combined file with this name instead of one file per type
    #[arg(long)]
    combined: Option<String>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ModelsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// root type name; defaults to the PascalCase file stem
    #[arg(long)]
    type_name: Option<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct BatchIn {
    /// manifest file
    #[arg(long, short)]
    manifest: PathBuf,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn requests(&self, package: &str, type_name: Option<&str>) -> anyhow::Result<Vec<GenerateRequest>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        if type_name.is_some() && source_paths.len() > 1 {
            bail!("--type-name needs exactly one input, got {}", source_paths.len());
        }
        Ok(source_paths
            .into_iter()
            .map(|path| {
                let type_name = type_name
                    .map(str::to_string)
                    .unwrap_or_else(|| driver::default_type_name(&path));
                let mut req = GenerateRequest::new(path, package, type_name);
                req.json_pointer = self.json_pointer.clone();
                req.jq_expr = self.jq_expr.clone();
                req
            })
            .collect())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("json_wiregen={level}")));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let mut requests = target
                    .input_settings
                    .requests(&target.package, target.type_name.as_deref())?;
                for req in &mut requests {
                    req.runtime_path = target.runtime_path.clone();
                }

                // independent schemas compile in parallel; results keep input order
                let results: Vec<_> = requests.par_iter().map(driver::generate_with).collect();
                let mut units: Vec<SourceUnit> = Vec::new();
                for (req, result) in requests.iter().zip(results) {
                    let generated = result
                        .with_context(|| format!("generation failed for {}", req.schema_path.display()))?;
                    units.extend(generated);
                }
                check_unique_units(&units)?;

                match target.out.as_ref() {
                    None => println!("{}", output::render_combined(&units)),
                    Some(out) => {
                        let layout = match &target.combined {
                            Some(name) => OutputLayout::Combined(name.clone()),
                            None => OutputLayout::PerType,
                        };
                        let written = output::write_units(&units, out, &layout)?;
                        report_written(&written);
                    }
                }
                Ok(())
            }
            Command::Models(target) => {
                let requests = target.input_settings.requests("models", target.type_name.as_deref())?;
                let mut all = serde_json::Map::new();
                for req in &requests {
                    let set = driver::models_with(req)
                        .with_context(|| format!("model building failed for {}", req.schema_path.display()))?;
                    all.insert(req.type_name.clone(), serde_json::to_value(&set)?);
                }
                let src = serde_json::to_string_pretty(&all)?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(out, &src)?;
                        report_written(std::slice::from_ref(out));
                    }
                    None => println!("{src}"),
                }
                Ok(())
            }
            Command::Batch(target) => {
                let manifest = Manifest::load(&target.manifest)?;
                let jobs = manifest.batch_jobs();
                let results = driver::run_batch(&jobs);
                let mut failed = 0usize;
                for (job, result) in jobs.iter().zip(results) {
                    match result {
                        Ok(written) => report_written(&written),
                        Err(error) => {
                            failed += 1;
                            eprintln!(
                                "{} {}: {error}",
                                "failed".red().bold(),
                                job.request.schema_path.display()
                            );
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} job(s) failed", jobs.len());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report_written(paths: &[PathBuf]) {
    for path in paths {
        eprintln!("{} {}", "wrote".green().bold(), path.display());
    }
}

fn check_unique_units(units: &[SourceUnit]) -> anyhow::Result<()> {
    let mut seen = std::collections::HashSet::new();
    for unit in units {
        if !seen.insert(unit.file_name.as_str()) {
            bail!("more than one input defines type `{}`", unit.type_name);
        }
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(Path::new(pattern).to_path_buf());
            continue;
        }
        let before = out.len();
        for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern `{pattern}`"))? {
            out.push(entry?);
        }
        if out.len() == before {
            bail!("glob pattern matched no files: {pattern}");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_arguments() {
        let cli = CommandLineInterface::try_parse_from([
            "json-wiregen", "-vv", "generate", "-i", "a.json", "--package", "wire::v7",
            "--type-name", "MainResponse", "--out", "gen", "--combined", "v7.rs",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Generate(g) = &cli.cmd else { panic!("expected generate") };
        assert_eq!(g.package, "wire::v7");
        assert_eq!(g.combined.as_deref(), Some("v7.rs"));
        assert_eq!(g.input_settings.input, vec!["a.json".to_string()]);
    }

    #[test]
    fn globs_expand_and_literals_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let paths = resolve_file_path_patterns([pattern.as_str(), "literal.json"]).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], PathBuf::from("literal.json"));

        let none = format!("{}/*.yaml", dir.path().display());
        assert!(resolve_file_path_patterns([none.as_str()]).is_err());
    }

    #[test]
    fn one_type_name_for_many_inputs_is_rejected() {
        let settings = InputSettings {
            json_pointer: None,
            jq_expr: None,
            input: vec!["a.json".into(), "b.json".into()],
        };
        assert!(settings.requests("wire", Some("Main")).is_err());
        let reqs = settings.requests("wire", None).unwrap();
        assert_eq!(reqs[0].type_name, "A");
        assert_eq!(reqs[1].type_name, "B");
    }
}
