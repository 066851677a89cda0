//! Chroma Palette Library
//!
//! This library provides the color-token engine behind the palette editor:
//! hex/RGB/HSL conversion, shade ramps, WCAG contrast scoring and
//! role-aware dark-mode variants, plus palette export, a per-identifier
//! daily usage quota and the generation pipeline around an external
//! image-to-palette model.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod models;
pub mod services;
#[cfg(feature = "web")]
pub mod web;
