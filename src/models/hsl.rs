//! HSL color values.

#![allow(clippy::float_cmp)]

use serde::{Deserialize, Serialize};

use super::RgbColor;

/// A color in HSL space.
///
/// `h` is in degrees, `s` and `l` are percentages. Values are kept as `f64`
/// so that derived colors can be computed without intermediate rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees (0-360)
    pub h: f64,
    /// Saturation percentage (0-100)
    pub s: f64,
    /// Lightness percentage (0-100)
    pub l: f64,
}

impl Hsl {
    /// Creates a new HSL value.
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Converts to an 8-bit RGB color.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn to_rgb(&self) -> RgbColor {
        let h = self.h / 360.0;
        let s = self.s / 100.0;
        let l = self.l / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        RgbColor::from_rgb_f64(r * 255.0, g * 255.0, b * 255.0)
    }

    /// Converts to an uppercase `#RRGGBB` string.
    ///
    /// ```
    /// use chroma_palette::models::Hsl;
    ///
    /// assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_hex(), "#FF0000");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
