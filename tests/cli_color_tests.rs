//! End-to-end tests for `chroma shades`, `chroma contrast` and `chroma dark`.

use std::process::Command;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

/// Path to the chroma binary
fn chroma_bin() -> String {
    std::env::var("CARGO_BIN_EXE_chroma").unwrap_or_else(|_| "target/release/chroma".to_string())
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(chroma_bin())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

// ============================================================================
// Shades
// ============================================================================

#[test]
fn test_shades_json() {
    let output = run(&["shades", "#3b82f6", "--json"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    assert_eq!(result["500"], "#3B82F6");
    assert_eq!(result["50"], "#F5F9FF");
    assert_eq!(result["950"], "#13223E");
}

#[test]
fn test_shades_human_readable() {
    let output = run(&["shades", "3B82F6"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Shades of #3B82F6"));
    assert!(stdout.contains("950"));
    // Piped output carries no escape sequences
    assert!(!stdout.contains('\u{1b}'));
}

#[test]
fn test_shades_invalid_color() {
    let output = run(&["shades", "#12345"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid hex color"));
}

// ============================================================================
// Contrast
// ============================================================================

#[test]
fn test_contrast_pair_json() {
    let output = run(&["contrast", "#767676", "#FFFFFF", "--json"]);
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ratio = result["ratio"].as_f64().unwrap();
    assert!((ratio - 4.54).abs() < 0.01, "ratio was {ratio}");
    assert_eq!(result["rating"]["score"], "AA");
}

#[test]
fn test_contrast_defaults_to_best_text_color() {
    let output = run(&["contrast", "#000000", "--json"]);
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["background"], "#FFFFFF");
    assert_eq!(result["rating"]["label"], "Excellent");
}

#[test]
fn test_contrast_palette_against_token() {
    let temp_dir = TempDir::new().unwrap();
    let palette = serde_json::to_value(test_palette()).unwrap();
    let path = write_json(temp_dir.path(), "palette.json", &palette);

    let output = run(&[
        "contrast",
        "--palette",
        path.to_str().unwrap(),
        "--against",
        "text-id",
        "--json",
    ]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r["background"] == "#111827"));
    // Ink against itself
    assert_eq!(reports[1]["rating"]["score"], "Fail");
}

#[test]
fn test_contrast_requires_a_color() {
    let output = run(&["contrast"]);
    assert_eq!(output.status.code(), Some(2), "clap usage errors exit with 2");
}

// ============================================================================
// Dark
// ============================================================================

#[test]
fn test_dark_background_role() {
    let output = run(&["dark", "#FFFFFF", "--role", "background", "--json"]);
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["darkHex"], "#0F1729");
    assert_eq!(result["category"], "background");
}

#[test]
fn test_dark_brand_without_role() {
    let output = run(&["dark", "#1A334D"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#1A334D -> #6C98C6"));
}
