//! Identifier derivation: JSON keys → Rust type names and field identifiers.
use once_cell::sync::Lazy;
use regex::Regex;

static TYPE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("static regex")
});

static PACKAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*(::[a-z_][a-z0-9_]*)*$").expect("static regex")
});

// strict + reserved keywords of the 2024 edition
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
    "priv", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

// cannot be raw identifiers
const NON_RAW: &[&str] = &["self", "Self", "super", "crate"];

// PascalCase words that cannot name a struct
const RESERVED_TYPE_NAMES: &[&str] = &["Self"];

pub fn is_valid_type_name(s: &str) -> bool { TYPE_NAME_RE.is_match(s) && !RESERVED_TYPE_NAMES.contains(&s) }

pub fn is_valid_package(s: &str) -> bool { PACKAGE_RE.is_match(s) }

/// `build_info`, `build-info` and `buildInfo` all become `BuildInfo`.
///
/// Names that would not be a usable struct name (empty, digit-leading,
/// `Self`) get a `T` prefix.
pub fn to_pascal_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for segment in key.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    if out.is_empty()
        || out.starts_with(|c: char| c.is_ascii_digit())
        || RESERVED_TYPE_NAMES.contains(&out.as_str())
    {
        out.insert(0, 'T');
    }
    out
}

/// Lowercase words joined by `_`; camel-case humps split into words.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
        prev = Some(c);
    }
    out.trim_matches('_').to_string()
}

/// A Rust field identifier for a wire key, usable verbatim in emitted code.
pub fn field_ident(key: &str) -> String {
    let mut ident = to_snake_case(key);
    if ident.is_empty() {
        ident.push_str("field");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if NON_RAW.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

pub fn file_name_for(type_name: &str) -> String {
    format!("{}.rs", to_snake_case(type_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_collapses_separators_and_humps() {
        assert_eq!(to_pascal_case("version"), "Version");
        assert_eq!(to_pascal_case("build_info"), "BuildInfo");
        assert_eq!(to_pascal_case("cluster-stats"), "ClusterStats");
        assert_eq!(to_pascal_case("buildInfo"), "BuildInfo");
        assert_eq!(to_pascal_case("2fa"), "T2fa");
        assert_eq!(to_pascal_case("@@"), "T");
    }

    #[test]
    fn pascal_case_never_yields_a_reserved_name() {
        assert_eq!(to_pascal_case("self"), "TSelf");
        assert_eq!(to_pascal_case("Self"), "TSelf");
        assert_eq!(to_pascal_case("selfie"), "Selfie");
        // prelude names are fine: emitted code qualifies every std type
        assert_eq!(to_pascal_case("string"), "String");
        assert!(is_valid_type_name(&to_pascal_case("self")));
    }

    #[test]
    fn field_idents_are_valid_rust() {
        assert_eq!(field_ident("cluster_name"), "cluster_name");
        assert_eq!(field_ident("clusterName"), "cluster_name");
        assert_eq!(field_ident("@timestamp"), "timestamp");
        assert_eq!(field_ident("type"), "r#type");
        assert_eq!(field_ident("gen"), "r#gen");
        assert_eq!(field_ident("self"), "self_");
        assert_eq!(field_ident("1st"), "_1st");
        assert_eq!(field_ident("--"), "field");
    }

    #[test]
    fn validation() {
        assert!(is_valid_type_name("MainResponse"));
        assert!(!is_valid_type_name("mainResponse"));
        assert!(!is_valid_type_name("Self"));
        assert!(is_valid_type_name("String"));
        assert!(is_valid_package("wire::v7"));
        assert!(!is_valid_package("wire::"));
        assert!(!is_valid_package("Wire"));
        assert_eq!(file_name_for("MainResponse"), "main_response.rs");
    }
}
