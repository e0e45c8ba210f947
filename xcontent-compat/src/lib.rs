//! Versioned wire compatibility for the node info response.
//!
//! The wire models under [`wire`] are generated at build time from the
//! example responses in `schemas/`. [`v7`] and [`v8`] adapt them to the one
//! domain type in [`domain`], and [`rest`] picks the adapter per request.
pub mod adapter;
pub mod domain;
pub mod rest;
pub mod v7;
pub mod v8;

/// Generated per-version wire models. Do not edit; see `build.rs`.
pub mod wire {
    pub mod v7 {
        include!(concat!(env!("OUT_DIR"), "/v7_main_response.rs"));
    }
    pub mod v8 {
        include!(concat!(env!("OUT_DIR"), "/v8_main_response.rs"));
    }
    /// Not a wire version: keeps std-colliding type names compiling.
    pub mod edge {
        include!(concat!(env!("OUT_DIR"), "/edge_links.rs"));
    }
}

pub use adapter::{AdapterError, AdapterMapping, LintFinding};
pub use domain::{Build, BuildFlavor, BuildType, MainResponse};
pub use rest::CompatibleVersion;
