//! Color tokens and the editable palette that holds them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{calculate_dark_variant, generate_shades, ShadeRamp};

/// Light color given to tokens added by hand.
pub const DEFAULT_CUSTOM_HEX: &str = "#808080";

/// Name given to tokens added by hand.
pub const DEFAULT_CUSTOM_NAME: &str = "New Color";

/// Role tag for tokens added by hand.
pub const CUSTOM_ROLE: &str = "custom";

/// A named color with light and dark mode values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    /// Opaque unique identifier
    #[serde(default)]
    pub id: String,
    /// Human readable name (e.g., "Midnight Blue")
    pub name: String,
    /// Light mode hex value
    pub hex: String,
    /// Dark mode hex value
    #[serde(default)]
    pub dark_hex: String,
    /// Semantic role (e.g., "primary", "background")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ColorToken {
    /// Creates a token with a fresh id and a dark value derived from its role.
    #[must_use]
    pub fn new(name: impl Into<String>, hex: impl Into<String>, role: Option<&str>) -> Self {
        let hex = hex.into();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            dark_hex: calculate_dark_variant(&hex, role),
            hex,
            role: role.map(str::to_string),
        }
    }

    /// The token every "add color" action starts from.
    #[must_use]
    pub fn custom() -> Self {
        Self::new(DEFAULT_CUSTOM_NAME, DEFAULT_CUSTOM_HEX, Some(CUSTOM_ROLE))
    }

    /// Shade ramp of the light value.
    #[must_use]
    pub fn shades(&self) -> ShadeRamp {
        generate_shades(&self.hex)
    }

    /// Role label for display, `Custom` when untagged.
    #[must_use]
    pub fn role_label(&self) -> &str {
        self.role
            .as_deref()
            .filter(|role| !role.is_empty())
            .unwrap_or("Custom")
    }
}

/// Partial update to a token. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTokenUpdate {
    /// New name
    pub name: Option<String>,
    /// New light value
    pub hex: Option<String>,
    /// New dark value
    pub dark_hex: Option<String>,
    /// New role
    pub role: Option<String>,
}

/// An ordered set of color tokens plus the mood the palette was generated with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// One or two word mood description
    #[serde(default)]
    pub mood: String,
    /// Tokens in display order
    #[serde(default)]
    pub colors: Vec<ColorToken>,
}

impl Palette {
    /// Creates a palette from already built tokens.
    #[must_use]
    pub fn new(mood: impl Into<String>, colors: Vec<ColorToken>) -> Self {
        Self {
            mood: mood.into(),
            colors,
        }
    }

    /// Builds a palette from hand-written tokens, filling in a fresh id and
    /// a derived dark value wherever they were left empty.
    #[must_use]
    pub fn from_partial(mood: impl Into<String>, mut colors: Vec<ColorToken>) -> Self {
        for token in &mut colors {
            if token.id.is_empty() {
                token.id = Uuid::new_v4().to_string();
            }
            if token.dark_hex.is_empty() {
                token.dark_hex = calculate_dark_variant(&token.hex, token.role.as_deref());
            }
        }
        Self::new(mood, colors)
    }

    /// Looks up a token by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ColorToken> {
        self.colors.iter().find(|token| token.id == id)
    }

    /// Appends a default custom token and returns its id.
    pub fn add_color(&mut self) -> String {
        let token = ColorToken::custom();
        let id = token.id.clone();
        self.colors.push(token);
        id
    }

    /// Applies a partial update. Returns false if no token has that id.
    ///
    /// Changing `hex` leaves `dark_hex` as it was; see
    /// [`Palette::recompute_dark_variant`].
    pub fn update_color(&mut self, id: &str, update: ColorTokenUpdate) -> bool {
        let Some(token) = self.colors.iter_mut().find(|token| token.id == id) else {
            return false;
        };

        if let Some(name) = update.name {
            token.name = name;
        }
        if let Some(hex) = update.hex {
            token.hex = hex;
        }
        if let Some(dark_hex) = update.dark_hex {
            token.dark_hex = dark_hex;
        }
        if let Some(role) = update.role {
            token.role = Some(role);
        }
        true
    }

    /// Re-derives a token's dark value from its current light value and role.
    pub fn recompute_dark_variant(&mut self, id: &str) -> bool {
        match self.colors.iter_mut().find(|token| token.id == id) {
            Some(token) => {
                token.dark_hex = calculate_dark_variant(&token.hex, token.role.as_deref());
                true
            }
            None => false,
        }
    }

    /// Removes a token. Returns false if no token has that id.
    pub fn remove_color(&mut self, id: &str) -> bool {
        let before = self.colors.len();
        self.colors.retain(|token| token.id != id);
        self.colors.len() != before
    }
}
