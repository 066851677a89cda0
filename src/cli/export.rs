//! Export command for generating stylesheet and JSON code from a palette.

use crate::cli::common::{load_palette, CliError, CliResult};
use crate::export::{export_palette, ExportFormat};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Export a palette as Tailwind, CSS variables or JSON
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Palette JSON file (a palette object or an array of tokens)
    #[arg(short, long, value_name = "FILE")]
    pub palette: PathBuf,

    /// Output format: tailwind, css or json
    #[arg(short, long, value_name = "FORMAT", default_value = "tailwind")]
    pub format: String,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also copy the result to the clipboard
    #[arg(long)]
    pub copy: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self) -> CliResult<()> {
        let format: ExportFormat = self
            .format
            .parse()
            .map_err(|e| CliError::validation(format!("{e}")))?;

        let palette = load_palette(&self.palette)?;
        if palette.colors.is_empty() {
            return Err(CliError::validation(format!(
                "Palette file has no colors: {}",
                self.palette.display()
            )));
        }

        let code = export_palette(&palette.colors, format)
            .map_err(|e| CliError::io(format!("Failed to generate {format} export: {e:#}")))?;

        if let Some(output_path) = &self.output {
            fs::write(output_path, &code)
                .map_err(|e| CliError::io(format!("Failed to write output file: {e}")))?;
            println!(
                "Exported {} colors as {format} to {}",
                palette.colors.len(),
                output_path.display()
            );
        } else {
            println!("{code}");
        }

        if self.copy {
            arboard::Clipboard::new()
                .and_then(|mut clipboard| clipboard.set_text(code))
                .map_err(|e| CliError::io(format!("Failed to copy to clipboard: {e}")))?;
            eprintln!("Copied to clipboard");
        }

        Ok(())
    }
}
