//! CLI command handlers for Chroma Palette.
//!
//! This module provides headless, scriptable access to the color engine,
//! palette export and the usage quota.

pub mod common;
pub mod config;
pub mod contrast;
pub mod dark;
pub mod export;
pub mod shades;
pub mod usage;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use contrast::ContrastArgs;
pub use dark::DarkArgs;
pub use export::ExportArgs;
pub use shades::ShadesArgs;
pub use usage::UsageArgs;
