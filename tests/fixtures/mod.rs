//! Shared test fixtures for API and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use chroma_palette::config::{Config, StoreKind};
use chroma_palette::models::{ColorToken, Palette};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// A model answer in the expected shape.
pub const SCHEME_ANSWER: &str = r##"{
    "mood": "Coastal Calm",
    "scheme": {
        "primary": { "name": "Deep Harbor", "hex": "#1A334D" },
        "secondary": { "name": "Sea Glass", "hex": "#6FB7A8" },
        "accent": { "name": "Buoy Orange", "hex": "#F97316" },
        "background": { "name": "Sand", "hex": "#FAF7F0" },
        "surface": { "name": "Shell", "hex": "#FFFFFF" },
        "text": { "name": "Driftwood", "hex": "#1F2937" }
    }
}"##;

/// Config with an in-memory usage store.
pub fn memory_config() -> Config {
    let mut config = Config::new();
    config.usage.store = StoreKind::Memory;
    config
}

/// Two-color palette with fixed ids.
pub fn test_palette() -> Palette {
    let mut primary = ColorToken::new("Deep Blue", "#3B82F6", Some("primary"));
    primary.id = "primary-id".to_string();
    let mut text = ColorToken::new("Ink", "#111827", Some("text"));
    text.id = "text-id".to_string();
    Palette::new("Calm", vec![primary, text])
}

/// Palette JSON as the front-end sends it: no ids or dark values.
pub fn partial_palette_json() -> Value {
    json!({
        "mood": "Calm",
        "colors": [
            { "name": "Deep Blue", "hex": "#3B82F6", "role": "primary" },
            { "name": "Ink", "hex": "#111827", "role": "text" }
        ]
    })
}

/// Writes `value` as a JSON file and returns its path.
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}
