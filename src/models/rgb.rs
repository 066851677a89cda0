//! RGB color handling with hex parsing, HSL conversion, mixing and luminance.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]
// Allow intentional type casts for color math
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Allow float comparisons in HSL conversion (standard algorithms)
#![allow(clippy::float_cmp)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Hsl;

/// RGB color value with hex string representation.
///
/// Represents a 24-bit sRGB color using red, green, and blue channels (0-255 each).
/// There is no alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Pure white, the light end of every shade ramp.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb". Surrounding
    /// whitespace is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use chroma_palette::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF0000").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 0, 0));
    ///
    /// let color = RgbColor::from_hex("00ff00").unwrap();
    /// assert_eq!(color, RgbColor::new(0, 255, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color format.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid hex color format '{hex}'. Expected 6 hex digits (RRGGBB)");
        }

        let r = u8::from_str_radix(&hex[0..2], 16)
            .context(format!("Invalid red channel in hex color '{hex}'"))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .context(format!("Invalid green channel in hex color '{hex}'"))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .context(format!("Invalid blue channel in hex color '{hex}'"))?;

        Ok(Self::new(r, g, b))
    }

    /// Parses a hex string without ever failing.
    ///
    /// Anything other than exactly six hex digits after an optional `#` is
    /// read as black. The color engine runs on this so that a stray value
    /// from a color picker never poisons downstream math.
    ///
    /// ```
    /// use chroma_palette::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::parse_lenient("#3b82f6"), RgbColor::new(59, 130, 246));
    /// assert_eq!(RgbColor::parse_lenient("#FFF"), RgbColor::BLACK);
    /// assert_eq!(RgbColor::parse_lenient("not a color"), RgbColor::BLACK);
    /// ```
    #[must_use]
    pub fn parse_lenient(hex: &str) -> Self {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        Self::from_hex(digits).unwrap_or(Self::BLACK)
    }

    /// Builds a color from floating point channels.
    ///
    /// Each channel is clamped to `[0, 255]` and then rounded to the nearest
    /// integer (halves round up).
    #[must_use]
    pub fn from_rgb_f64(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| {
            if v.is_nan() {
                0
            } else {
                v.clamp(0.0, 255.0).round() as u8
            }
        };
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    ///
    /// # Examples
    ///
    /// ```
    /// use chroma_palette::models::RgbColor;
    ///
    /// let color = RgbColor::new(0, 128, 255);
    /// assert_eq!(color.to_hex(), "#0080FF");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts from HSL; the inverse of [`RgbColor::to_hsl`] up to rounding.
    #[must_use]
    pub fn from_hsl(hsl: &Hsl) -> Self {
        hsl.to_rgb()
    }

    /// Converts the RGB color to HSL.
    ///
    /// Hue is in degrees `[0, 360)`, saturation and lightness are percentages
    /// `[0, 100]`. Grays report hue 0 and saturation 0.
    ///
    /// ```
    /// use chroma_palette::models::RgbColor;
    ///
    /// let hsl = RgbColor::new(255, 0, 0).to_hsl();
    /// assert!((hsl.h - 0.0).abs() < 0.01);
    /// assert!((hsl.s - 100.0).abs() < 0.01);
    /// assert!((hsl.l - 50.0).abs() < 0.01);
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard RGB/HSL color model uses single-char names
    pub fn to_hsl(&self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl::new(0.0, 0.0, l * 100.0);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl::new(h / 6.0 * 360.0, s * 100.0, l * 100.0)
    }

    /// Linearly interpolates each channel toward `target`.
    ///
    /// `weight` 0.0 returns `self`, 1.0 returns `target`. This is a plain sRGB
    /// lerp; shade ramps depend on exactly this scale.
    ///
    /// ```
    /// use chroma_palette::models::RgbColor;
    ///
    /// let gray = RgbColor::BLACK.mix(&RgbColor::WHITE, 0.5);
    /// assert_eq!(gray, RgbColor::new(128, 128, 128));
    /// ```
    #[must_use]
    pub fn mix(&self, target: &Self, weight: f64) -> Self {
        let lerp = |from: u8, to: u8| {
            let from = f64::from(from);
            from + (f64::from(to) - from) * weight
        };
        Self::from_rgb_f64(
            lerp(self.r, target.r),
            lerp(self.g, target.g),
            lerp(self.b, target.b),
        )
    }

    /// Relative luminance as defined by WCAG 2.0.
    ///
    /// <https://www.w3.org/TR/WCAG20/#relativeluminancedef>
    #[must_use]
    pub fn relative_luminance(&self) -> f64 {
        fn linearize(channel: u8) -> f64 {
            let v = f64::from(channel) / 255.0;
            if v <= 0.039_28 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        }

        0.2126 * linearize(self.r) + 0.7152 * linearize(self.g) + 0.0722 * linearize(self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for RgbColor {
    /// Default color is black, the same value malformed input degrades to.
    fn default() -> Self {
        Self::BLACK
    }
}
