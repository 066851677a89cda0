//! Token name sanitizers for generated identifiers.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+(.)").expect("separator pattern is valid"));

/// Lowercases, turns whitespace runs into `-` and drops anything outside
/// `[a-z0-9-]`.
///
/// ```
/// use chroma_palette::export::to_kebab_case;
///
/// assert_eq!(to_kebab_case("Midnight Blue"), "midnight-blue");
/// assert_eq!(to_kebab_case("Café  Crème #2"), "caf-crme-2");
/// ```
#[must_use]
pub fn to_kebab_case(name: &str) -> String {
    WHITESPACE_RUNS
        .replace_all(&name.to_lowercase(), "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Lowercases, then uppercases the character after each run of
/// non-alphanumerics, dropping the run.
///
/// ```
/// use chroma_palette::export::to_camel_case;
///
/// assert_eq!(to_camel_case("Midnight Blue"), "midnightBlue");
/// assert_eq!(to_camel_case("sea-glass 2"), "seaGlass2");
/// ```
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    SEPARATOR_RUNS
        .replace_all(&name.to_lowercase(), |caps: &regex::Captures<'_>| {
            caps[1].to_uppercase()
        })
        .into_owned()
}
