//! Semantic color roles and dark-mode variant derivation.

use serde::{Deserialize, Serialize};

use super::{Hsl, RgbColor};

/// Near-white used for text that is too dark to read on a dark background (slate-50).
pub const DARK_MODE_TEXT_HEX: &str = "#F8FAFC";

/// Dark-mode page background (slate-950 base).
pub const DARK_MODE_BACKGROUND: Hsl = Hsl::new(222.0, 47.0, 11.0);

/// Dark-mode surface, slightly lighter than the background (slate-900 base).
pub const DARK_MODE_SURFACE: Hsl = Hsl::new(222.0, 47.0, 16.0);

/// Category a free-text role tag falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    /// Page backgrounds ("background", "bg-...")
    Background,
    /// Cards, containers and other raised surfaces
    Surface,
    /// Text, content and foreground colors
    Text,
    /// Everything else: primary, secondary, accent, custom
    Brand,
}

impl RoleCategory {
    /// Classifies a role tag by case-insensitive substring match.
    ///
    /// Checked in order background, surface, text; the first match wins, so
    /// "bg-text" is a background.
    ///
    /// ```
    /// use chroma_palette::models::RoleCategory;
    ///
    /// assert_eq!(RoleCategory::classify(Some("bg-surface")), RoleCategory::Background);
    /// assert_eq!(RoleCategory::classify(Some("Card")), RoleCategory::Surface);
    /// assert_eq!(RoleCategory::classify(None), RoleCategory::Brand);
    /// ```
    #[must_use]
    pub fn classify(role: Option<&str>) -> Self {
        let role = role.unwrap_or_default().to_lowercase();
        let has_any = |needles: &[&str]| needles.iter().any(|needle| role.contains(needle));

        if has_any(&["background", "bg"]) {
            Self::Background
        } else if has_any(&["surface", "container", "card"]) {
            Self::Surface
        } else if has_any(&["text", "content", "foreground"]) {
            Self::Text
        } else {
            Self::Brand
        }
    }

    /// Derives the dark-mode counterpart of `hex` for this category.
    #[must_use]
    pub fn dark_variant(self, hex: &str) -> String {
        match self {
            Self::Background => DARK_MODE_BACKGROUND.to_hex(),
            Self::Surface => DARK_MODE_SURFACE.to_hex(),
            Self::Text => {
                if RgbColor::parse_lenient(hex).to_hsl().l < 50.0 {
                    DARK_MODE_TEXT_HEX.to_string()
                } else {
                    hex.to_string()
                }
            }
            Self::Brand => brand_dark_variant(hex),
        }
    }
}

/// Brand colors are lightened so they still pop on a dark background.
fn brand_dark_variant(hex: &str) -> String {
    let Hsl { h, s, l } = RgbColor::parse_lenient(hex).to_hsl();

    if l < 40.0 {
        // Dark brand color: lift it well up and take a little saturation out
        Hsl::new(h, s * 0.9, 60.0).to_hex()
    } else if l > 70.0 {
        // Already pastel
        hex.to_string()
    } else {
        Hsl::new(h, s, (l + 10.0).min(85.0)).to_hex()
    }
}

/// Derives the dark-mode value of a color from its semantic role.
///
/// ```
/// use chroma_palette::models::calculate_dark_variant;
///
/// assert_eq!(calculate_dark_variant("#FFFFFF", Some("background")), "#0F1729");
/// assert_eq!(calculate_dark_variant("#1F2937", Some("text")), "#F8FAFC");
/// ```
#[must_use]
pub fn calculate_dark_variant(hex: &str, role: Option<&str>) -> String {
    RoleCategory::classify(role).dark_variant(hex)
}
