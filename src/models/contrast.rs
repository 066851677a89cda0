//! WCAG contrast ratios and accessibility ratings.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ColorToken, RgbColor};

/// White text candidate.
pub const WHITE_HEX: &str = "#FFFFFF";
/// Black text candidate.
pub const BLACK_HEX: &str = "#000000";

/// Calculates the WCAG contrast ratio between two hex colors.
///
/// The result is in `[1, 21]` and does not depend on argument order.
///
/// ```
/// use chroma_palette::models::contrast_ratio;
///
/// let ratio = contrast_ratio("#000000", "#FFFFFF");
/// assert!((ratio - 21.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn contrast_ratio(hex1: &str, hex2: &str) -> f64 {
    let l1 = RgbColor::parse_lenient(hex1).relative_luminance();
    let l2 = RgbColor::parse_lenient(hex2).relative_luminance();
    let lighter = l1.max(l2);
    let darker = l1.min(l2);
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG conformance level reached by a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagScore {
    /// Ratio of at least 7:1
    #[serde(rename = "AAA")]
    Aaa,
    /// Ratio of at least 4.5:1
    #[serde(rename = "AA")]
    Aa,
    /// Ratio of at least 3:1, acceptable for large text only
    #[serde(rename = "AA+")]
    AaLarge,
    /// Below 3:1
    #[serde(rename = "Fail")]
    Fail,
}

impl WcagScore {
    /// Display form of the score.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::AaLarge => "AA+",
            Self::Fail => "Fail",
        }
    }
}

impl fmt::Display for WcagScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accessibility rating derived from a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContrastRating {
    /// Conformance level
    pub score: WcagScore,
    /// Short human label for the level
    pub label: &'static str,
    /// Whether the ratio is usable at all (AA+ and above)
    pub pass: bool,
}

/// Rates a contrast ratio. Thresholds are checked from strictest down.
///
/// ```
/// use chroma_palette::models::{wcag_rating, WcagScore};
///
/// let rating = wcag_rating(5.0);
/// assert_eq!(rating.score, WcagScore::Aa);
/// assert!(rating.pass);
/// ```
#[must_use]
pub fn wcag_rating(ratio: f64) -> ContrastRating {
    let (score, label, pass) = if ratio >= 7.0 {
        (WcagScore::Aaa, "Excellent", true)
    } else if ratio >= 4.5 {
        (WcagScore::Aa, "Pass", true)
    } else if ratio >= 3.0 {
        (WcagScore::AaLarge, "Large Text", true)
    } else {
        (WcagScore::Fail, "Low Contrast", false)
    };

    ContrastRating { score, label, pass }
}

/// Picks white or black text for a background, whichever contrasts more.
///
/// White must contrast strictly more to win; ties go to black.
#[must_use]
pub fn best_text_color(bg_hex: &str) -> &'static str {
    pick_text_color(
        contrast_ratio(bg_hex, WHITE_HEX),
        contrast_ratio(bg_hex, BLACK_HEX),
    )
}

fn pick_text_color(white_ratio: f64, black_ratio: f64) -> &'static str {
    if white_ratio > black_ratio {
        WHITE_HEX
    } else {
        BLACK_HEX
    }
}

/// Ratio plus rating for a foreground/background pair.
#[derive(Debug, Clone, Serialize)]
pub struct ContrastReport {
    /// Color being rated
    pub foreground: String,
    /// Color it is compared against
    pub background: String,
    /// WCAG contrast ratio
    pub ratio: f64,
    /// Rating of `ratio`
    pub rating: ContrastRating,
}

impl ContrastReport {
    /// Computes the report for two colors.
    #[must_use]
    pub fn new(foreground: &str, background: &str) -> Self {
        let ratio = contrast_ratio(foreground, background);
        Self {
            foreground: foreground.to_string(),
            background: background.to_string(),
            ratio,
            rating: wcag_rating(ratio),
        }
    }
}

/// What a palette color is compared against when rating its contrast.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContrastBaseline {
    /// Best of white or black for each color
    #[default]
    Auto,
    /// Always white
    White,
    /// Always black
    Black,
    /// Another token in the palette, by id
    Token(String),
}

impl ContrastBaseline {
    /// Parses `auto`, `white`, `black`, or anything else as a token id.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "auto" => Self::Auto,
            "white" => Self::White,
            "black" => Self::Black,
            _ => Self::Token(value.trim().to_string()),
        }
    }

    /// Resolves the comparison color for `hex`.
    ///
    /// A token id that is not in `palette` resolves to black.
    #[must_use]
    pub fn resolve(&self, hex: &str, palette: &[ColorToken]) -> String {
        match self {
            Self::Auto => best_text_color(hex).to_string(),
            Self::White => WHITE_HEX.to_string(),
            Self::Black => BLACK_HEX.to_string(),
            Self::Token(id) => palette
                .iter()
                .find(|token| &token.id == id)
                .map_or_else(|| BLACK_HEX.to_string(), |token| token.hex.clone()),
        }
    }

    /// Rates every token in `palette` against this baseline.
    #[must_use]
    pub fn rate_palette(&self, palette: &[ColorToken]) -> Vec<ContrastReport> {
        palette
            .iter()
            .map(|token| ContrastReport::new(&token.hex, &self.resolve(&token.hex, palette)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_on_white_is_21() {
        let ratio = contrast_ratio("#000000", "#FFFFFF");
        assert!((ratio - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_contrast_is_1() {
        for hex in ["#000000", "#FFFFFF", "#3B82F6", "#767676"] {
            assert!((contrast_ratio(hex, hex) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_order_independent() {
        let pairs = [("#FF0000", "#FFFFFF"), ("#3B82F6", "#0F1729"), ("#123456", "#FEDCBA")];
        for (a, b) in pairs {
            assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_known_ratios() {
        assert!((contrast_ratio("#767676", "#FFFFFF") - 4.54).abs() < 0.01);
        assert!((contrast_ratio("#3B82F6", "#FFFFFF") - 3.68).abs() < 0.01);
    }

    #[test]
    fn test_wcag_thresholds() {
        let aaa = wcag_rating(7.5);
        assert_eq!((aaa.score, aaa.pass), (WcagScore::Aaa, true));
        let aa = wcag_rating(5.0);
        assert_eq!((aa.score, aa.pass), (WcagScore::Aa, true));
        let large = wcag_rating(3.5);
        assert_eq!((large.score, large.pass), (WcagScore::AaLarge, true));
        let fail = wcag_rating(2.0);
        assert_eq!((fail.score, fail.pass), (WcagScore::Fail, false));
    }

    #[test]
    fn test_wcag_threshold_boundaries_are_inclusive() {
        assert_eq!(wcag_rating(7.0).score, WcagScore::Aaa);
        assert_eq!(wcag_rating(4.5).score, WcagScore::Aa);
        assert_eq!(wcag_rating(3.0).score, WcagScore::AaLarge);
        assert_eq!(wcag_rating(2.999).score, WcagScore::Fail);
    }

    #[test]
    fn test_rating_serializes_with_wire_scores() {
        let json = serde_json::to_value(wcag_rating(3.5)).unwrap();
        assert_eq!(json["score"], "AA+");
        assert_eq!(json["pass"], true);
    }

    #[test]
    fn test_best_text_color() {
        assert_eq!(best_text_color("#000000"), WHITE_HEX);
        assert_eq!(best_text_color("#FFFFFF"), BLACK_HEX);
        // Blue-500 reads better with black text (5.71 vs 3.68)
        assert_eq!(best_text_color("#3B82F6"), BLACK_HEX);
        assert_eq!(best_text_color("#0F1729"), WHITE_HEX);
    }

    #[test]
    fn test_equal_contrast_picks_black() {
        assert_eq!(pick_text_color(4.58, 4.58), BLACK_HEX);
        assert_eq!(pick_text_color(4.59, 4.58), WHITE_HEX);
    }

    #[test]
    fn test_baseline_parse() {
        assert_eq!(ContrastBaseline::parse("Auto"), ContrastBaseline::Auto);
        assert_eq!(ContrastBaseline::parse("white"), ContrastBaseline::White);
        assert_eq!(ContrastBaseline::parse("BLACK"), ContrastBaseline::Black);
        assert_eq!(
            ContrastBaseline::parse("abc-123"),
            ContrastBaseline::Token("abc-123".to_string())
        );
    }

    #[test]
    fn test_baseline_resolves_tokens() {
        let bg = ColorToken::new("Night", "#0F1729", Some("background"));
        let palette = vec![bg.clone()];

        let baseline = ContrastBaseline::Token(bg.id.clone());
        assert_eq!(baseline.resolve("#FFFFFF", &palette), "#0F1729");

        let missing = ContrastBaseline::Token("nope".to_string());
        assert_eq!(missing.resolve("#FFFFFF", &palette), BLACK_HEX);

        let reports = ContrastBaseline::White.rate_palette(&palette);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].rating.score, WcagScore::Aaa);
    }
}
