//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and version information.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Chroma Palette";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "chroma";

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "ChromaPalette";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CHROMA_CONFIG_DIR";
