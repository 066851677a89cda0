//! Contrast rating command.

use crate::cli::common::{load_palette, output_json, parse_hex_arg, CliResult};
use crate::models::{best_text_color, ContrastBaseline, ContrastReport};
use clap::Args;
use std::path::PathBuf;

/// Rate WCAG contrast between two colors, or across a palette
#[derive(Debug, Clone, Args)]
pub struct ContrastArgs {
    /// Foreground color (#RRGGBB)
    #[arg(value_name = "HEX", required_unless_present = "palette")]
    pub foreground: Option<String>,

    /// Background color; defaults to the better of white or black
    #[arg(value_name = "HEX")]
    pub background: Option<String>,

    /// Rate every color of a palette file instead
    #[arg(long, value_name = "FILE", conflicts_with_all = ["foreground", "background"])]
    pub palette: Option<PathBuf>,

    /// What palette colors are compared against: auto, white, black or a token id
    #[arg(long, value_name = "BASELINE", default_value = "auto")]
    pub against: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ContrastArgs {
    /// Execute the contrast command
    pub fn execute(&self) -> CliResult<()> {
        let reports = match (&self.palette, &self.foreground) {
            (Some(path), _) => {
                let palette = load_palette(path)?;
                ContrastBaseline::parse(&self.against).rate_palette(&palette.colors)
            }
            (None, Some(foreground)) => {
                let foreground = parse_hex_arg(foreground)?.to_hex();
                let background = match &self.background {
                    Some(background) => parse_hex_arg(background)?.to_hex(),
                    None => best_text_color(&foreground).to_string(),
                };
                vec![ContrastReport::new(&foreground, &background)]
            }
            (None, None) => Vec::new(),
        };

        if self.json {
            return match reports.as_slice() {
                [single] if self.palette.is_none() => output_json(single),
                _ => output_json(&reports),
            };
        }

        for report in &reports {
            println!(
                "{} on {}: {:.2}:1  {} ({})",
                report.foreground,
                report.background,
                report.ratio,
                report.rating.score,
                report.rating.label
            );
        }
        Ok(())
    }
}
