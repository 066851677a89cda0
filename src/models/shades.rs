//! Tailwind-style shade ramps derived from a single base color.
//!
//! Stops below 500 are tinted toward white, stops above 500 are shaded toward
//! a dark slate rather than pure black so the 950 stop keeps some color.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::RgbColor;

/// Dark reference the upper stops are mixed toward (slate-900ish).
pub const SHADE_DARK_REFERENCE: RgbColor = RgbColor::new(15, 23, 42);

/// One of the eleven stops of a shade ramp, ordered light to dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShadeStop {
    /// 50
    S50,
    /// 100
    S100,
    /// 200
    S200,
    /// 300
    S300,
    /// 400
    S400,
    /// 500, the base color itself
    S500,
    /// 600
    S600,
    /// 700
    S700,
    /// 800
    S800,
    /// 900
    S900,
    /// 950
    S950,
}

/// How a stop is derived from the base color.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Derivation {
    Tint(f64),
    Base,
    Shade(f64),
}

impl ShadeStop {
    /// All stops in ramp order.
    pub const ALL: [Self; 11] = [
        Self::S50,
        Self::S100,
        Self::S200,
        Self::S300,
        Self::S400,
        Self::S500,
        Self::S600,
        Self::S700,
        Self::S800,
        Self::S900,
        Self::S950,
    ];

    /// Numeric stop value (50, 100, ... 950).
    #[must_use]
    pub const fn value(self) -> u16 {
        match self {
            Self::S50 => 50,
            Self::S100 => 100,
            Self::S200 => 200,
            Self::S300 => 300,
            Self::S400 => 400,
            Self::S500 => 500,
            Self::S600 => 600,
            Self::S700 => 700,
            Self::S800 => 800,
            Self::S900 => 900,
            Self::S950 => 950,
        }
    }

    /// Stop name as used in CSS variables and JSON keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S50 => "50",
            Self::S100 => "100",
            Self::S200 => "200",
            Self::S300 => "300",
            Self::S400 => "400",
            Self::S500 => "500",
            Self::S600 => "600",
            Self::S700 => "700",
            Self::S800 => "800",
            Self::S900 => "900",
            Self::S950 => "950",
        }
    }

    const fn derivation(self) -> Derivation {
        match self {
            Self::S50 => Derivation::Tint(0.95),
            Self::S100 => Derivation::Tint(0.90),
            Self::S200 => Derivation::Tint(0.75),
            Self::S300 => Derivation::Tint(0.60),
            Self::S400 => Derivation::Tint(0.30),
            Self::S500 => Derivation::Base,
            Self::S600 => Derivation::Shade(0.20),
            Self::S700 => Derivation::Shade(0.40),
            Self::S800 => Derivation::Shade(0.60),
            Self::S900 => Derivation::Shade(0.80),
            Self::S950 => Derivation::Shade(0.90),
        }
    }
}

impl fmt::Display for ShadeStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShadeStop {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stop| stop.as_str() == s.trim())
            .ok_or_else(|| anyhow::anyhow!("Unknown shade stop '{s}'. Expected one of 50-950"))
    }
}

/// An eleven-stop shade ramp.
///
/// Serializes as a JSON object keyed by stop name in ramp order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadeRamp {
    shades: Vec<(ShadeStop, String)>,
}

impl ShadeRamp {
    /// Hex value at the given stop.
    #[must_use]
    pub fn get(&self, stop: ShadeStop) -> &str {
        // Every ramp is built from ShadeStop::ALL, so index == stop ordinal.
        &self.shades[stop as usize].1
    }

    /// Iterates stops light to dark.
    pub fn iter(&self) -> impl Iterator<Item = (ShadeStop, &str)> {
        self.shades.iter().map(|(stop, hex)| (*stop, hex.as_str()))
    }

    /// The unmodified base color (stop 500).
    #[must_use]
    pub fn base(&self) -> &str {
        self.get(ShadeStop::S500)
    }
}

impl Serialize for ShadeRamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.shades.len()))?;
        for (stop, hex) in &self.shades {
            map.serialize_entry(stop.as_str(), hex)?;
        }
        map.end()
    }
}

/// Generates a shade ramp from a base color.
///
/// Stop 500 is the input string exactly as given. Malformed input is read as
/// black for the derived stops.
///
/// # Examples
///
/// ```
/// use chroma_palette::models::{generate_shades, ShadeStop};
///
/// let ramp = generate_shades("#3B82F6");
/// assert_eq!(ramp.get(ShadeStop::S500), "#3B82F6");
/// assert_eq!(ramp.get(ShadeStop::S50), "#F5F9FF");
/// assert_eq!(ramp.get(ShadeStop::S950), "#13223E");
/// ```
#[must_use]
pub fn generate_shades(base_hex: &str) -> ShadeRamp {
    let base = RgbColor::parse_lenient(base_hex);

    let shades = ShadeStop::ALL
        .into_iter()
        .map(|stop| {
            let hex = match stop.derivation() {
                Derivation::Tint(weight) => base.mix(&RgbColor::WHITE, weight).to_hex(),
                Derivation::Base => base_hex.to_string(),
                Derivation::Shade(weight) => base.mix(&SHADE_DARK_REFERENCE, weight).to_hex(),
            };
            (stop, hex)
        })
        .collect();

    ShadeRamp { shades }
}
