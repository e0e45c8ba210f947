//! 8.x wire format, the current one.
use json_wiregen::flatten::{ROOT_PATH, join_path};

use crate::adapter::{AdapterMapping, DefaultValue, LeniencyRule, OnMissing};
use crate::domain::{Build, BuildFlavor, BuildType, MainResponse, TAGLINE, UNKNOWN};
use crate::wire::v8 as wire;

pub static MAPPING: AdapterMapping = AdapterMapping {
    version: 8,
    mapped: &[
        ("node_name", "name"),
        ("cluster_name", "cluster_name"),
        ("cluster_uuid", "cluster_uuid"),
        ("build.version", "version.number"),
        ("build.flavor", "version.build_flavor"),
        ("build.kind", "version.build_type"),
        ("build.hash", "version.build_hash"),
        ("build.date", "version.build_date"),
        ("build.snapshot", "version.build_snapshot"),
        ("build.lucene_version", "version.lucene_version"),
        ("build.minimum_wire_compatibility_version", "version.minimum_wire_compatibility_version"),
        ("build.minimum_index_compatibility_version", "version.minimum_index_compatibility_version"),
    ],
    dropped: &[],
    wire_only: &["tagline"],
    leniency: &[
        LeniencyRule { wire_field: "name", on_missing: OnMissing::Fail },
        LeniencyRule { wire_field: "cluster_name", on_missing: OnMissing::Fail },
        LeniencyRule { wire_field: "cluster_uuid", on_missing: OnMissing::Default(DefaultValue::Str("_na_")) },
        LeniencyRule { wire_field: "version", on_missing: OnMissing::Fail },
        LeniencyRule { wire_field: "version.number", on_missing: OnMissing::Fail },
        LeniencyRule { wire_field: "version.build_flavor", on_missing: OnMissing::SentinelUnknown },
        LeniencyRule { wire_field: "version.build_type", on_missing: OnMissing::SentinelUnknown },
        LeniencyRule { wire_field: "version.build_hash", on_missing: OnMissing::Default(DefaultValue::Str(UNKNOWN)) },
        LeniencyRule { wire_field: "version.build_date", on_missing: OnMissing::Default(DefaultValue::Str(UNKNOWN)) },
        LeniencyRule { wire_field: "version.build_snapshot", on_missing: OnMissing::Default(DefaultValue::Bool(false)) },
        LeniencyRule { wire_field: "version.lucene_version", on_missing: OnMissing::Default(DefaultValue::Str("")) },
        LeniencyRule {
            wire_field: "version.minimum_wire_compatibility_version",
            on_missing: OnMissing::Default(DefaultValue::Str("")),
        },
        LeniencyRule {
            wire_field: "version.minimum_index_compatibility_version",
            on_missing: OnMissing::Default(DefaultValue::Str("")),
        },
        LeniencyRule { wire_field: "tagline", on_missing: OnMissing::Default(DefaultValue::Str(TAGLINE)) },
    ],
};

pub fn wire_fields() -> Vec<String> {
    let mut out: Vec<String> = wire::MainResponse::FIELD_NAMES.iter().map(|f| join_path(ROOT_PATH, f)).collect();
    let version = join_path(ROOT_PATH, "version");
    out.extend(wire::Version::FIELD_NAMES.iter().map(|f| join_path(&version, f)));
    out
}

pub fn to_wire(domain: &MainResponse) -> wire::MainResponse {
    let MainResponse { node_name, cluster_name, cluster_uuid, build } = domain;
    let Build {
        version,
        flavor,
        kind,
        hash,
        date,
        snapshot,
        lucene_version,
        minimum_wire_compatibility_version,
        minimum_index_compatibility_version,
    } = build;
    wire::MainResponse::new(
        node_name.clone(),
        cluster_name.clone(),
        cluster_uuid.clone(),
        wire::Version::new(
            version.clone(),
            flavor.as_wire().to_string(),
            kind.as_wire().to_string(),
            hash.clone(),
            date.clone(),
            *snapshot,
            lucene_version.clone(),
            minimum_wire_compatibility_version.clone(),
            minimum_index_compatibility_version.clone(),
        ),
        TAGLINE.to_string(),
    )
}

pub fn from_wire(model: wire::MainResponse) -> MainResponse {
    let wire::MainResponse { name, cluster_name, cluster_uuid, version, tagline: _ } = model;
    let wire::Version {
        number,
        build_flavor,
        build_type,
        build_hash,
        build_date,
        build_snapshot,
        lucene_version,
        minimum_wire_compatibility_version,
        minimum_index_compatibility_version,
    } = version;
    MainResponse {
        node_name: name,
        cluster_name,
        cluster_uuid,
        build: Build {
            version: number,
            flavor: BuildFlavor::from_wire(&build_flavor),
            kind: BuildType::from_wire(&build_type),
            hash: build_hash,
            date: build_date,
            snapshot: build_snapshot,
            lucene_version,
            minimum_wire_compatibility_version,
            minimum_index_compatibility_version,
        },
    }
}
