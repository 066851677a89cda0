//! Export functionality for palettes.
//!
//! Turns a list of color tokens into code a project can paste in: a Tailwind
//! v4 theme, plain CSS custom properties, or a JSON shade map.

pub mod json;
pub mod naming;
pub mod stylesheet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ColorToken;

pub use json::generate_json;
pub use naming::{to_camel_case, to_kebab_case};
pub use stylesheet::{generate_css_variables, generate_tailwind_theme};

/// Output format for [`export_palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Tailwind v4 `@theme` block
    #[default]
    Tailwind,
    /// `:root` custom properties
    #[serde(rename = "css")]
    CssVars,
    /// JSON shade map
    Json,
}

impl ExportFormat {
    /// All formats.
    pub const ALL: [Self; 3] = [Self::Tailwind, Self::CssVars, Self::Json];

    /// Name accepted by `FromStr`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tailwind => "tailwind",
            Self::CssVars => "css",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tailwind" | "tailwind-v4" => Ok(Self::Tailwind),
            "css" | "css-vars" => Ok(Self::CssVars),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown export format '{other}' (expected tailwind, css or json)"),
        }
    }
}

/// Renders `colors` in `format`.
///
/// # Examples
///
/// ```
/// use chroma_palette::export::{export_palette, ExportFormat};
/// use chroma_palette::models::ColorToken;
///
/// let colors = vec![ColorToken::new("Rose", "#F43F5E", Some("accent"))];
/// let css = export_palette(&colors, ExportFormat::CssVars).unwrap();
/// assert!(css.contains("--color-rose: #F43F5E;"));
/// ```
pub fn export_palette(colors: &[ColorToken], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Tailwind => Ok(generate_tailwind_theme(colors)),
        ExportFormat::CssVars => Ok(generate_css_variables(colors)),
        ExportFormat::Json => generate_json(colors),
    }
}
