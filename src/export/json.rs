//! JSON export: camelCase token name to shade ramp.

use anyhow::{Context, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::naming::to_camel_case;
use crate::models::{ColorToken, ShadeRamp};

/// Name-to-ramp map that keeps first-insertion order. A repeated name keeps
/// its original position and takes the later ramp.
struct ShadeMap(Vec<(String, ShadeRamp)>);

impl ShadeMap {
    fn from_tokens(colors: &[ColorToken]) -> Self {
        let mut entries: Vec<(String, ShadeRamp)> = Vec::with_capacity(colors.len());
        for token in colors {
            let key = to_camel_case(&token.name);
            let ramp = token.shades();
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = ramp,
                None => entries.push((key, ramp)),
            }
        }
        Self(entries)
    }
}

impl Serialize for ShadeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, ramp) in &self.0 {
            map.serialize_entry(name, ramp)?;
        }
        map.end()
    }
}

/// Pretty-printed JSON (two-space indent) of every token's shade ramp.
pub fn generate_json(colors: &[ColorToken]) -> Result<String> {
    serde_json::to_string_pretty(&ShadeMap::from_tokens(colors))
        .context("Failed to serialize shade map")
}
