//! Source emission: one Rust source unit per object model.
//!
//! Each unit holds a struct, a constructor, a positional constructing-parser
//! and a serializer. All three are rendered from the same list of
//! [`FieldBinding`]s, produced once per model by folding over the declared
//! fields, so parameter order, parser positions and write order cannot
//! disagree.
use serde::Serialize;

use crate::classify::FieldType;
use crate::error::EmitError;
use crate::flatten::ROOT_PATH;
use crate::model::{FieldDef, ModelSet, ObjectModel};
use crate::naming;

pub const DEFAULT_RUNTIME_PATH: &str = "::json_wiregen::xcontent";

// clippy's default `too_many_arguments` threshold
const MAX_QUIET_ARGS: usize = 7;

#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Absolute path of the runtime module generated code is written against.
    pub runtime_path: String,
    /// Module path the units belong to.
    pub package: String,
    /// Where the schema came from; goes into each unit's header.
    pub source_label: String,
}

impl EmitOptions {
    pub fn new(package: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            package: package.into(),
            source_label: source_label.into(),
        }
    }
}

/// One emitted unit, identified by `(package, type_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUnit {
    pub package: String,
    pub type_name: String,
    pub file_name: String,
    pub source: String,
}

/// A field fixed to its constructor/parser position.
#[derive(Debug, Clone, Copy)]
pub struct FieldBinding<'m> {
    pub position: usize,
    pub field: &'m FieldDef,
}

/// Per-model emission state. Built in one step and never mutated.
pub struct EmitterState<'m> {
    model: &'m ObjectModel,
    bindings: Vec<FieldBinding<'m>>,
}

impl<'m> EmitterState<'m> {
    pub fn new(model: &'m ObjectModel) -> Self {
        let bindings = model
            .fields
            .iter()
            .enumerate()
            .map(|(position, field)| FieldBinding { position, field })
            .collect();
        Self { model, bindings }
    }

    pub fn bindings(&self) -> &[FieldBinding<'m>] { &self.bindings }

    fn constructor_params(&self, rt: &str) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| format!("{}: {}", b.field.ident, rust_type(&b.field.ty, rt)))
            .collect()
    }

    fn parser_args(&self) -> Vec<String> {
        self.bindings.iter().map(|b| format!("args.take({})?", b.position)).collect()
    }

    fn parser_declarations(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| format!(".declare_field({}, {:?})", b.position, b.field.name))
            .collect()
    }

    fn serializer_statements(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| format!("builder.field({:?}, &self.{}, params)?;", b.field.name, b.field.ident))
            .collect()
    }
}

/// Leaf types are fully qualified: a model named `String` or `Vec` must not
/// capture the fields of its neighbours.
pub fn rust_type(ty: &FieldType, rt: &str) -> String {
    match ty {
        FieldType::String => "::std::string::String".to_string(),
        FieldType::Bool => "bool".to_string(),
        FieldType::Number => format!("{rt}::Number"),
        FieldType::Ref(name) => name.clone(),
        FieldType::ArrayOf(inner) => format!("::std::vec::Vec<{}>", rust_type(inner, rt)),
    }
}

/// Emit every model of `set`, in the set's (deepest first) order.
pub fn emit_models(set: &ModelSet, opts: &EmitOptions) -> Result<Vec<SourceUnit>, EmitError> {
    set.iter().map(|model| emit_model(set, model, opts)).collect()
}

pub fn emit_model(set: &ModelSet, model: &ObjectModel, opts: &EmitOptions) -> Result<SourceUnit, EmitError> {
    check_refs(set, model)?;
    let state = EmitterState::new(model);
    let source = Codegen::new(&opts.runtime_path).unit(&state, opts);
    tracing::debug!(model = %model.name, fields = state.bindings().len(), "emitted");
    Ok(SourceUnit {
        package: opts.package.clone(),
        type_name: model.name.clone(),
        file_name: naming::file_name_for(&model.name),
        source,
    })
}

fn check_refs(set: &ModelSet, model: &ObjectModel) -> Result<(), EmitError> {
    for field in &model.fields {
        if let Some(target) = field.ty.referenced_type() {
            if !set.contains(target) {
                return Err(EmitError::UnknownRef {
                    model: model.name.clone(),
                    field: field.name.clone(),
                    type_name: target.to_string(),
                });
            }
        }
    }
    Ok(())
}

// ------------------------------- Rendering -------------------------------- //

struct Codegen<'a> {
    rt: &'a str,
    out: String,
}

impl<'a> Codegen<'a> {
    fn new(rt: &'a str) -> Self { Self { rt, out: String::new() } }

    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..depth {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn unit(mut self, state: &EmitterState<'_>, opts: &EmitOptions) -> String {
        let model = state.model;
        self.header(model, opts);
        self.struct_def(state);
        self.line(0, "");
        self.inherent_impl(state);
        self.line(0, "");
        self.from_impl(model);
        self.line(0, "");
        self.to_impl(state);
        self.out
    }

    fn header(&mut self, model: &ObjectModel, opts: &EmitOptions) {
        self.line(0, format!(
            "// @generated by json-wiregen from `{}` at `{}`. Do not edit.",
            opts.source_label.escape_debug(),
            model.path.escape_debug()
        ));
        self.line(0, format!("// unit: {}::{}", opts.package, model.name));
        self.line(0, "");
    }

    fn struct_def(&mut self, state: &EmitterState<'_>) {
        let rt = self.rt;
        self.line(0, "#[derive(Debug, Clone, PartialEq)]");
        self.line(0, format!("pub struct {} {{", state.model.name));
        for b in state.bindings() {
            self.line(1, format!("pub {}: {},", b.field.ident, rust_type(&b.field.ty, rt)));
        }
        self.line(0, "}");
    }

    fn inherent_impl(&mut self, state: &EmitterState<'_>) {
        let rt = self.rt;
        let model = state.model;
        let arity = state.bindings().len();
        let names: Vec<String> = state.bindings().iter().map(|b| format!("{:?}", b.field.name)).collect();
        let idents: Vec<&str> = state.bindings().iter().map(|b| b.field.ident.as_str()).collect();

        self.line(0, format!("impl {} {{", model.name));
        self.line(1, format!(
            "pub const FIELD_NAMES: [&'static str; {arity}] = [{}];",
            names.join(", ")
        ));
        self.line(0, "");

        // constructor
        if arity > MAX_QUIET_ARGS {
            self.line(1, "#[allow(clippy::too_many_arguments)]");
        }
        self.line(1, format!("pub fn new({}) -> Self {{", state.constructor_params(rt).join(", ")));
        if arity == 0 {
            self.line(2, "Self {}");
        } else {
            self.line(2, format!("Self {{ {} }}", idents.join(", ")));
        }
        self.line(1, "}");
        self.line(0, "");

        // positional constructing-parser
        let parser_name = if model.path == ROOT_PATH {
            naming::to_snake_case(&model.name)
        } else {
            model.path.clone()
        };
        let args = if arity == 0 { "_args" } else { "args" };
        self.line(1, format!("pub fn parser() -> {rt}::ConstructingObjectParser<Self> {{"));
        self.line(2, format!(
            "{rt}::ConstructingObjectParser::new({parser_name:?}, {arity}, |{args}| {{"
        ));
        if arity == 0 {
            self.line(3, "::std::result::Result::Ok(Self::new())");
        } else {
            self.line(3, "::std::result::Result::Ok(Self::new(");
            for arg in state.parser_args() {
                self.line(4, format!("{arg},"));
            }
            self.line(3, "))");
        }
        self.line(2, "})");
        for decl in state.parser_declarations() {
            self.line(2, decl);
        }
        self.line(1, "}");
        self.line(0, "}");
    }

    fn from_impl(&mut self, model: &ObjectModel) {
        let rt = self.rt;
        self.line(0, format!("impl {rt}::FromXContent for {} {{", model.name));
        self.line(1, format!(
            "fn from_x_content(value: &{rt}::Value) -> ::std::result::Result<Self, {rt}::XContentError> {{"
        ));
        self.line(2, "Self::parser().parse(value)");
        self.line(1, "}");
        self.line(0, "}");
    }

    fn to_impl(&mut self, state: &EmitterState<'_>) {
        let rt = self.rt;
        let params = if state.bindings().is_empty() { "_params" } else { "params" };
        self.line(0, format!("impl {rt}::ToXContent for {} {{", state.model.name));
        self.line(1, "fn to_x_content(");
        self.line(2, "&self,");
        self.line(2, format!("builder: &mut {rt}::XContentBuilder,"));
        self.line(2, format!("{params}: &{rt}::Params,"));
        self.line(1, format!(") -> ::std::result::Result<(), {rt}::XContentError> {{"));
        self.line(2, "builder.start_object()?;");
        for stmt in state.serializer_statements() {
            self.line(2, stmt);
        }
        self.line(2, "builder.end_object()");
        self.line(1, "}");
        self.line(0, "}");
    }
}
