//! Shared CLI error type, exit codes and output helpers.

use crossterm::style::{style, Color, Stylize};
use serde::Serialize;
use std::fmt;
use std::io::IsTerminal;
use std::path::Path;

use crate::models::{ColorToken, Palette, RgbColor};

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Bad input: arguments, file contents, colors
    ValidationError = 1,
    /// Reading or writing something failed
    IoError = 2,
}

impl ExitCode {
    /// Numeric code for `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// What kind of failure a [`CliError`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// Invalid input
    Validation,
    /// File system, clipboard or store failure
    Io,
}

/// Error reported by a command before the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Failure kind, decides the exit code
    pub kind: CliErrorKind,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// A validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Validation,
            message: message.into(),
        }
    }

    /// An I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Io,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.kind {
            CliErrorKind::Validation => ExitCode::ValidationError,
            CliErrorKind::Io => ExitCode::IoError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Prints `value` as pretty JSON on stdout.
pub fn output_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize output to JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Parses a color argument strictly, as a validation error on failure.
pub fn parse_hex_arg(hex: &str) -> CliResult<RgbColor> {
    RgbColor::from_hex(hex).map_err(|e| CliError::validation(format!("{e:#}")))
}

/// Palette file contents: a full palette object or a bare token array.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PaletteFile {
    Palette(Palette),
    Tokens(Vec<ColorToken>),
}

/// Loads a palette JSON file, filling in missing ids and dark values.
pub fn load_palette(path: &Path) -> CliResult<Palette> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::io(format!("Failed to read palette file {}: {e}", path.display()))
    })?;

    let parsed: PaletteFile = serde_json::from_str(&content).map_err(|e| {
        CliError::validation(format!("Invalid palette file {}: {e}", path.display()))
    })?;

    Ok(match parsed {
        PaletteFile::Palette(palette) => Palette::from_partial(palette.mood, palette.colors),
        PaletteFile::Tokens(colors) => Palette::from_partial(String::new(), colors),
    })
}

/// A small block of `hex` for terminal output. Empty when stdout is not a
/// terminal so piped output stays plain.
#[must_use]
pub fn swatch(hex: &str) -> String {
    if !std::io::stdout().is_terminal() {
        return String::new();
    }
    let RgbColor { r, g, b } = RgbColor::parse_lenient(hex);
    format!("{} ", style("    ").on(Color::Rgb { r, g, b }))
}
