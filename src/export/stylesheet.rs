//! Stylesheet exports: Tailwind v4 `@theme` and plain CSS custom properties.

use std::fmt::Write as _;

use super::naming::to_kebab_case;
use crate::models::ColorToken;

/// Shade variables for one token, one `--color-<name>-<stop>` line per stop.
fn shade_variables(token: &ColorToken) -> String {
    let name = to_kebab_case(&token.name);
    token
        .shades()
        .iter()
        .map(|(stop, hex)| format!("  --color-{name}-{stop}: {hex};"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generates a Tailwind v4 stylesheet with every shade in an `@theme` block.
///
/// # Examples
///
/// ```
/// use chroma_palette::export::generate_tailwind_theme;
/// use chroma_palette::models::ColorToken;
///
/// let css = generate_tailwind_theme(&[ColorToken::new("Ocean", "#0EA5E9", Some("primary"))]);
/// assert!(css.contains("@theme {"));
/// assert!(css.contains("  --color-ocean-500: #0EA5E9;"));
/// assert!(css.contains("bg-ocean-500"));
/// ```
#[must_use]
pub fn generate_tailwind_theme(colors: &[ColorToken]) -> String {
    let variables = colors
        .iter()
        .map(|token| {
            format!(
                "  /* {} ({}) */\n{}",
                token.name,
                token.role_label(),
                shade_variables(token)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let example = colors
        .first()
        .map(|token| token.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("color");
    let example = to_kebab_case(example);

    let mut output = String::new();
    output.push_str("/* main.css */\n");
    output.push_str("@import \"tailwindcss\";\n\n");
    let _ = write!(output, "@theme {{\n{variables}\n}}\n\n");
    output.push_str("/* \n  Usage Examples:\n");
    let _ = writeln!(output, "  bg-{example}-500");
    let _ = writeln!(output, "  text-{example}-900");
    output.push_str("*/");
    output
}

/// Generates a `:root` block with each token's base value and its shades.
#[must_use]
pub fn generate_css_variables(colors: &[ColorToken]) -> String {
    let variables = colors
        .iter()
        .map(|token| {
            format!(
                "  /* {} */\n  --color-{}: {};\n{}",
                token.name,
                to_kebab_case(&token.name),
                token.hex,
                shade_variables(token)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("/* global.css */\n:root {{\n{variables}\n}}")
}
