//! Schema flattening: one entry per object node, deepest first.
//!
//! Ordering: entries are stably sorted by depth, descending. A type's fields
//! only ever reference types exactly one level deeper, so walking the result
//! left to right always meets a referenced type before its referrer.
use std::borrow::Cow;
use std::cmp::Reverse;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::classify;
use crate::error::SchemaError;
use crate::naming;

pub const ROOT_PATH: &str = "$";

#[derive(Debug, Clone, Serialize)]
pub struct FlatEntry<'a> {
    /// Dotted key path from the root (`$` for the root itself).
    pub path: String,
    pub depth: usize,
    pub type_name: String,
    /// Path of the enclosing entry; `None` for the root.
    pub parent: Option<String>,
    #[serde(skip)]
    pub node: &'a Map<String, Value>,
}

/// One key as a path segment. Backslashes, dots and a leading `$` are
/// escaped with a backslash, so a dotted path splits back into exactly the
/// keys it was joined from.
pub fn escape_segment(key: &str) -> Cow<'_, str> {
    if !key.contains(['.', '\\']) && !key.starts_with('$') {
        return Cow::Borrowed(key);
    }
    let mut out = String::with_capacity(key.len() + 2);
    for (i, c) in key.char_indices() {
        if matches!(c, '.' | '\\') || (i == 0 && c == '$') {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

pub fn join_path(parent: &str, key: &str) -> String {
    let key = escape_segment(key);
    if parent == ROOT_PATH { key.into_owned() } else { format!("{parent}.{key}") }
}

/// The keys a path was joined from; the root has none.
pub fn split_path(path: &str) -> Vec<String> {
    if path == ROOT_PATH {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.extend(chars.next()),
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

pub fn flatten<'a>(root: &'a Value, root_type: &str) -> Result<Vec<FlatEntry<'a>>, SchemaError> {
    let Value::Object(node) = root else {
        return Err(SchemaError::RootNotObject { found: classify::kind_of(root) });
    };
    let mut walker = Walker::default();
    walker.visit(ROOT_PATH.to_string(), 0, root_type.to_string(), None, node)?;
    let mut entries = walker.entries;
    entries.sort_by_key(|e| Reverse(e.depth));
    for e in &entries {
        tracing::debug!(path = %e.path, depth = e.depth, type_name = %e.type_name, "flattened");
    }
    Ok(entries)
}

#[derive(Default)]
struct Walker<'a> {
    entries: Vec<FlatEntry<'a>>,
    // (type name, path) of every object on the way down to the current one
    ancestors: Vec<(String, String)>,
}

impl<'a> Walker<'a> {
    fn visit(
        &mut self,
        path: String,
        depth: usize,
        type_name: String,
        parent: Option<String>,
        node: &'a Map<String, Value>,
    ) -> Result<(), SchemaError> {
        if let Some((_, ancestor)) = self.ancestors.iter().find(|(t, _)| *t == type_name) {
            return Err(SchemaError::CyclicReference {
                path,
                type_name,
                ancestor: ancestor.clone(),
            });
        }
        self.entries.push(FlatEntry {
            path: path.clone(),
            depth,
            type_name: type_name.clone(),
            parent,
            node,
        });
        self.ancestors.push((type_name, path.clone()));
        for (key, value) in node {
            if let Some(child) = classify::defining_object(value) {
                self.visit(
                    join_path(&path, key),
                    depth + 1,
                    naming::to_pascal_case(key),
                    Some(path.clone()),
                    child,
                )?;
            }
        }
        self.ancestors.pop();
        Ok(())
    }
}
