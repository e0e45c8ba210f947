//! Mapping tables between the domain object and one wire version.
//!
//! The conversion functions themselves live in the per-version modules and
//! destructure both sides exhaustively, so a new field on either side is a
//! compile error until it is mapped or dropped. The tables here describe
//! the same mapping as data: what to do when a peer leaves a field out, and
//! a [`AdapterMapping::lint`] that cross-checks table and generated model.
use json_wiregen::flatten::split_path;
use json_wiregen::xcontent::{Value, XContentError};
use thiserror::Error;

use crate::domain::UNKNOWN;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The field has neither a default nor a sentinel for this version.
    #[error("[v{version}] missing required field [{field}]")]
    MissingRequiredField { version: u8, field: &'static str },

    #[error("unsupported compatible-with version [{0}]")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Wire(#[from] XContentError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Str(&'static str),
    Bool(bool),
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::String(s.to_string()),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    Fail,
    Default(DefaultValue),
    /// The enum-like field decodes to its `Unknown` variant.
    SentinelUnknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeniencyRule {
    /// Dotted wire path; a literal `.` inside a key is written `\.`.
    pub wire_field: &'static str,
    pub on_missing: OnMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintFinding {
    /// A domain field neither mapped nor explicitly dropped.
    UnmappedDomainField(String),
    /// A generated wire field neither mapped nor marked wire-only.
    UnhandledWireField(String),
    /// The table maps to a wire field the generated model does not have.
    UnknownWireField(String),
    /// A wire field without a missing-value rule.
    NoLeniencyRule(String),
}

#[derive(Debug)]
pub struct AdapterMapping {
    pub version: u8,
    /// (domain field, wire field)
    pub mapped: &'static [(&'static str, &'static str)],
    /// Domain fields this version's wire model does not carry.
    pub dropped: &'static [&'static str],
    /// Wire fields with no domain counterpart.
    pub wire_only: &'static [&'static str],
    /// Parents before children.
    pub leniency: &'static [LeniencyRule],
}

impl AdapterMapping {
    /// Fill in documented defaults for fields the peer left out (or sent as
    /// `null`) before the wire model parses the payload.
    pub fn apply_leniency(&self, payload: &mut Value) -> Result<(), AdapterError> {
        for rule in self.leniency {
            let mut segments = split_path(rule.wire_field);
            let Some(key) = segments.pop() else { continue };
            // a missing parent is governed by the parent's own rule
            let Some(Value::Object(parent)) = pointer_mut(payload, &segments) else {
                continue;
            };
            if !matches!(parent.get(&key), None | Some(Value::Null)) {
                continue;
            }
            let filled = match rule.on_missing {
                OnMissing::Fail => {
                    return Err(AdapterError::MissingRequiredField {
                        version: self.version,
                        field: rule.wire_field,
                    });
                }
                OnMissing::Default(v) => v.to_value(),
                OnMissing::SentinelUnknown => Value::String(UNKNOWN.to_string()),
            };
            tracing::debug!(version = self.version, field = rule.wire_field, value = %filled, "filled missing field");
            parent.insert(key, filled);
        }
        Ok(())
    }

    pub fn lint(&self, domain_fields: &[&str], wire_fields: &[String]) -> Vec<LintFinding> {
        let mut findings = Vec::new();
        for field in domain_fields {
            let mapped = self.mapped.iter().any(|(d, _)| d == field);
            if !mapped && !self.dropped.contains(field) {
                findings.push(LintFinding::UnmappedDomainField(field.to_string()));
            }
        }
        for (_, wire) in self.mapped {
            if !wire_fields.iter().any(|w| w.as_str() == *wire) {
                findings.push(LintFinding::UnknownWireField(wire.to_string()));
            }
        }
        for field in wire_fields {
            let prefix = format!("{field}.");
            let handled = self.wire_only.contains(&field.as_str())
                || self.mapped.iter().any(|(_, w)| *w == field.as_str() || w.starts_with(&prefix));
            if !handled {
                findings.push(LintFinding::UnhandledWireField(field.clone()));
            }
            if !self.leniency.iter().any(|r| r.wire_field == field.as_str()) {
                findings.push(LintFinding::NoLeniencyRule(field.clone()));
            }
        }
        findings
    }
}

fn pointer_mut<'v>(value: &'v mut Value, segments: &[String]) -> Option<&'v mut Value> {
    segments.iter().try_fold(value, |v, key| v.get_mut(key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static MAPPING: AdapterMapping = AdapterMapping {
        version: 9,
        mapped: &[("id", "id"), ("info.kind", "info.kind"), ("info.size", "info.size")],
        dropped: &["internal"],
        wire_only: &["banner"],
        leniency: &[
            LeniencyRule { wire_field: "id", on_missing: OnMissing::Fail },
            LeniencyRule { wire_field: "info", on_missing: OnMissing::Fail },
            LeniencyRule { wire_field: "info.kind", on_missing: OnMissing::SentinelUnknown },
            LeniencyRule { wire_field: "info.size", on_missing: OnMissing::Default(DefaultValue::Str("")) },
            LeniencyRule { wire_field: "banner", on_missing: OnMissing::Default(DefaultValue::Bool(true)) },
        ],
    };

    fn wire_fields() -> Vec<String> {
        ["id", "info", "info.kind", "info.size", "banner"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_fields_get_defaults_and_sentinels() {
        let mut v = json!({"id": "a", "info": {"size": null}});
        MAPPING.apply_leniency(&mut v).unwrap();
        assert_eq!(v, json!({"id": "a", "info": {"size": "", "kind": "unknown"}, "banner": true}));
    }

    #[test]
    fn present_fields_are_untouched() {
        let mut v = json!({"id": "a", "info": {"kind": "k", "size": "1"}, "banner": false});
        let before = v.clone();
        MAPPING.apply_leniency(&mut v).unwrap();
        assert_eq!(v, before);
    }

    #[test]
    fn fields_without_default_fail() {
        let mut v = json!({"info": {}});
        assert_eq!(
            MAPPING.apply_leniency(&mut v).unwrap_err(),
            AdapterError::MissingRequiredField { version: 9, field: "id" }
        );
        let mut v = json!({"id": "a"});
        assert_eq!(
            MAPPING.apply_leniency(&mut v).unwrap_err(),
            AdapterError::MissingRequiredField { version: 9, field: "info" }
        );
    }

    #[test]
    fn keys_containing_dots_are_addressed_by_escaped_paths() {
        static DOTTED: AdapterMapping = AdapterMapping {
            version: 9,
            mapped: &[],
            dropped: &[],
            wire_only: &[],
            leniency: &[
                LeniencyRule { wire_field: r"index\.codec", on_missing: OnMissing::Default(DefaultValue::Str("default")) },
                LeniencyRule { wire_field: "index", on_missing: OnMissing::Fail },
                LeniencyRule { wire_field: "index.codec", on_missing: OnMissing::SentinelUnknown },
            ],
        };
        let mut v = json!({"index": {}});
        DOTTED.apply_leniency(&mut v).unwrap();
        assert_eq!(v, json!({"index": {"codec": "unknown"}, "index.codec": "default"}));
    }

    #[test]
    fn lint_is_clean_for_a_complete_table() {
        assert!(MAPPING.lint(&["id", "info.kind", "info.size", "internal"], &wire_fields()).is_empty());
    }

    #[test]
    fn lint_reports_gaps() {
        let mut wire = wire_fields();
        wire.retain(|f| f != "info.size");
        wire.push("info.color".into());
        let findings = MAPPING.lint(&["id", "info.kind", "info.size", "internal", "owner"], &wire);
        assert_eq!(
            findings,
            vec![
                LintFinding::UnmappedDomainField("owner".into()),
                LintFinding::UnknownWireField("info.size".into()),
                LintFinding::UnhandledWireField("info.color".into()),
                LintFinding::NoLeniencyRule("info.color".into()),
            ]
        );
    }
}
