//! Generates the per-version wire models from the example responses.
use std::path::PathBuf;

use json_wiregen::output::{self, OutputLayout};

// (schema, package, root type, combined output file)
const SCHEMAS: &[(&str, &str, &str, &str)] = &[
    ("schemas/v7/main_response.json", "wire::v7", "MainResponse", "v7_main_response.rs"),
    ("schemas/v8/main_response.json", "wire::v8", "MainResponse", "v8_main_response.rs"),
    // keys that collide with std names and keywords
    ("schemas/edge/links.json", "wire::edge", "Links", "edge_links.rs"),
];

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    for (schema, package, root, file) in SCHEMAS {
        println!("cargo:rerun-if-changed={schema}");
        let units = json_wiregen::generate(schema, package, root)
            .unwrap_or_else(|e| panic!("{schema}: {e}"));
        output::write_units(&units, &out_dir, &OutputLayout::Combined(file.to_string()))
            .unwrap_or_else(|e| panic!("{schema}: {e}"));
    }
}
