//! Data models for colors, palettes and usage quotas.
//!
//! Everything in here is pure: no I/O, no clocks, no global state.
//! Services layer storage and orchestration on top of these types.

pub mod contrast;
pub mod hsl;
pub mod rgb;
pub mod role;
pub mod shades;
pub mod token;
pub mod usage;

// Re-export all model types
pub use contrast::{
    best_text_color, contrast_ratio, wcag_rating, ContrastBaseline, ContrastRating,
    ContrastReport, WcagScore,
};
pub use hsl::Hsl;
pub use rgb::RgbColor;
pub use role::{calculate_dark_variant, RoleCategory};
pub use shades::{generate_shades, ShadeRamp, ShadeStop};
pub use token::{ColorToken, ColorTokenUpdate, Palette};
pub use usage::{BonusOutcome, ConsumeOutcome, UsageLimits, UsageRecord, UsageStatus};
