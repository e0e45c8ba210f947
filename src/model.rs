//! Object models: the typed, ordered description of every generated type.
use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::classify::{self, FieldType};
use crate::error::SchemaError;
use crate::flatten::{self, FlatEntry};
use crate::naming;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Wire name, exactly as it appears in the schema.
    pub name: String,
    /// Rust identifier, possibly raw (`r#type`).
    pub ident: String,
    pub ty: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectModel {
    pub name: String,
    pub path: String,
    /// Type name of the enclosing model.
    pub parent: Option<String>,
    /// Declaration order = schema key order. Never reordered.
    pub fields: Vec<FieldDef>,
}

/// Every model of one generation run, in emission order (deepest first).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ModelSet {
    models: IndexMap<String, ObjectModel>,
}

impl ModelSet {
    pub fn get(&self, type_name: &str) -> Option<&ObjectModel> { self.models.get(type_name) }
    pub fn contains(&self, type_name: &str) -> bool { self.models.contains_key(type_name) }
    pub fn len(&self) -> usize { self.models.len() }
    pub fn is_empty(&self) -> bool { self.models.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &ObjectModel> { self.models.values() }
}

/// Classify every key of every flattened entry into an [`ObjectModel`].
pub fn build_models(entries: &[FlatEntry<'_>]) -> Result<ModelSet, SchemaError> {
    let type_by_path: HashMap<&str, &str> = entries
        .iter()
        .map(|e| (e.path.as_str(), e.type_name.as_str()))
        .collect();

    let mut set = ModelSet::default();
    for entry in entries {
        if let Some(existing) = set.models.get(&entry.type_name) {
            return Err(SchemaError::DuplicateTypeName {
                type_name: entry.type_name.clone(),
                first: existing.path.clone(),
                second: entry.path.clone(),
            });
        }
        let model = ObjectModel {
            name: entry.type_name.clone(),
            path: entry.path.clone(),
            parent: entry
                .parent
                .as_deref()
                .and_then(|p| type_by_path.get(p))
                .map(|t| t.to_string()),
            fields: build_fields(entry)?,
        };
        set.models.insert(model.name.clone(), model);
    }
    Ok(set)
}

fn build_fields(entry: &FlatEntry<'_>) -> Result<Vec<FieldDef>, SchemaError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut fields = Vec::with_capacity(entry.node.len());
    for (key, value) in entry.node {
        let ty = classify::classify(&flatten::join_path(&entry.path, key), key, value)?;
        let ident = naming::field_ident(key);
        if let Some(first) = seen.insert(ident.clone(), key) {
            return Err(SchemaError::DuplicateFieldName {
                path: entry.path.clone(),
                ident,
                first: first.to_string(),
                second: key.clone(),
            });
        }
        fields.push(FieldDef { name: key.clone(), ident, ty });
    }
    Ok(fields)
}

/// Flatten `root` and build its models in one step.
pub fn build_model_set(root: &Value, root_type: &str) -> Result<ModelSet, SchemaError> {
    if !naming::is_valid_type_name(root_type) {
        return Err(SchemaError::InvalidTypeName(root_type.to_string()));
    }
    let entries = flatten::flatten(root, root_type)?;
    build_models(&entries)
}
