//! Dark-mode variant command.

use crate::cli::common::{output_json, parse_hex_arg, swatch, CliResult};
use crate::models::{calculate_dark_variant, RoleCategory};
use clap::Args;
use serde::Serialize;

/// Derive the dark-mode value of a color from its role
#[derive(Debug, Clone, Args)]
pub struct DarkArgs {
    /// Light mode color (#RRGGBB)
    #[arg(value_name = "HEX")]
    pub hex: String,

    /// Semantic role (primary, background, surface, text, ...)
    #[arg(long, value_name = "ROLE")]
    pub role: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DarkOutput {
    hex: String,
    role: Option<String>,
    category: RoleCategory,
    dark_hex: String,
}

impl DarkArgs {
    /// Execute the dark command
    pub fn execute(&self) -> CliResult<()> {
        let hex = parse_hex_arg(&self.hex)?.to_hex();
        let role = self.role.as_deref();
        let output = DarkOutput {
            dark_hex: calculate_dark_variant(&hex, role),
            category: RoleCategory::classify(role),
            role: self.role.clone(),
            hex,
        };

        if self.json {
            return output_json(&output);
        }

        println!(
            "{}{} -> {}{}",
            swatch(&output.hex),
            output.hex,
            swatch(&output.dark_hex),
            output.dark_hex
        );
        Ok(())
    }
}
