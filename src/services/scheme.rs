//! Contract with the image-to-palette model.
//!
//! The model itself lives behind [`SchemeGenerator`]; this module owns the
//! prompts, the shape of the JSON it must answer with, validation of that
//! JSON, and conversion into color tokens.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::models::{ColorToken, Palette};

/// System prompt sent with every generation request.
pub const SYSTEM_PROMPT: &str = r##"
You are an expert UI/UX Designer and Color Theory specialist.
Your task is to analyze an image and extract a cohesive, accessible, and aesthetic color scheme for a web application.
Do not just pick the most frequent colors. Instead, pick colors that work well together functionally.

Return the result as a list of semantic color roles, but ensure each color has a creative name (e.g. instead of "Dark Grey", use "Mine Shaft").

Roles to generate:
- Primary
- Secondary
- Accent
- Background
- Surface
- Text

Response format (JSON):
{
  "mood": "A one or two word description of the color palette's mood",
  "scheme": {
    "primary": { "name": "Creative Color Name", "hex": "#RRGGBB" },
    "secondary": { "name": "Creative Color Name", "hex": "#RRGGBB" },
    "accent": { "name": "Creative Color Name", "hex": "#RRGGBB" },
    "background": { "name": "Creative Color Name", "hex": "#RRGGBB" },
    "surface": { "name": "Creative Color Name", "hex": "#RRGGBB" },
    "text": { "name": "Creative Color Name", "hex": "#RRGGBB" }
  }
}
"##;

/// User prompt accompanying the image.
pub const USER_PROMPT: &str = "Analyze this image and generate a UI color scheme.";

/// Roles in the order tokens are emitted.
pub const SCHEME_ROLES: [&str; 6] = [
    "primary",
    "secondary",
    "accent",
    "background",
    "surface",
    "text",
];

static HEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex pattern is valid"));

/// Request for a generated palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateColorRequest {
    /// Image bytes, base64 encoded, without a data-URL prefix
    #[serde(default)]
    pub image_base64: String,
    /// MIME type of the image (e.g., "image/png")
    #[serde(default)]
    pub mime_type: String,
    /// CAPTCHA token from the client widget
    #[serde(default)]
    pub turnstile_token: Option<String>,
}

impl GenerateColorRequest {
    /// The image as a data URL, the form multimodal chat APIs accept.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.image_base64)
    }
}

/// Produces the raw JSON answer for an image.
pub trait SchemeGenerator: Send + Sync {
    /// Returns the model's message content, expected to be JSON shaped like
    /// [`SchemeResponse`].
    fn generate(&self, request: &GenerateColorRequest) -> Result<String>;
}

/// One named color in the model's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeColor {
    /// Creative color name
    pub name: String,
    /// `#RRGGBB`
    pub hex: String,
}

/// The six roles of the model's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Scheme {
    pub primary: SchemeColor,
    pub secondary: SchemeColor,
    pub accent: SchemeColor,
    pub background: SchemeColor,
    pub surface: SchemeColor,
    pub text: SchemeColor,
}

impl Scheme {
    /// Role name paired with its color, in [`SCHEME_ROLES`] order.
    #[must_use]
    pub fn ordered(&self) -> [(&'static str, &SchemeColor); 6] {
        [
            (SCHEME_ROLES[0], &self.primary),
            (SCHEME_ROLES[1], &self.secondary),
            (SCHEME_ROLES[2], &self.accent),
            (SCHEME_ROLES[3], &self.background),
            (SCHEME_ROLES[4], &self.surface),
            (SCHEME_ROLES[5], &self.text),
        ]
    }
}

/// Full answer from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeResponse {
    /// One or two word mood description
    pub mood: String,
    /// The colors
    pub scheme: Scheme,
}

impl SchemeResponse {
    /// Parses and validates the model's raw answer.
    ///
    /// # Errors
    ///
    /// Fails if the text is not JSON, does not match the expected shape, or
    /// any hex is not exactly `#RRGGBB`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            anyhow::bail!("No content received from AI model.");
        }

        let value: serde_json::Value =
            serde_json::from_str(raw).context("Failed to parse AI response as JSON.")?;
        let response: Self =
            serde_json::from_value(value).context("AI response does not match the color scheme format")?;
        response.validate()?;
        Ok(response)
    }

    /// Checks every hex against `#RRGGBB`.
    pub fn validate(&self) -> Result<()> {
        for (role, color) in self.scheme.ordered() {
            if !HEX_PATTERN.is_match(&color.hex) {
                anyhow::bail!(
                    "Invalid hex for {role} ({}): '{}' (expected #RRGGBB)",
                    color.name,
                    color.hex
                );
            }
        }
        Ok(())
    }
}

/// Tokens built from a validated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Mood from the model
    pub mood: String,
    /// Six tokens in role order
    pub colors: Vec<ColorToken>,
}

impl From<GenerationResult> for Palette {
    fn from(result: GenerationResult) -> Self {
        Palette::new(result.mood, result.colors)
    }
}

/// Turns a validated answer into role-tagged tokens with dark variants.
#[must_use]
pub fn build_generation_result(response: SchemeResponse) -> GenerationResult {
    let colors = response
        .scheme
        .ordered()
        .into_iter()
        .map(|(role, color)| ColorToken::new(color.name.clone(), color.hex.clone(), Some(role)))
        .collect();

    GenerationResult {
        mood: response.mood,
        colors,
    }
}
