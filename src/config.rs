//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::{APP_DIR_NAME, CONFIG_DIR_ENV};
use crate::models::UsageLimits;
use crate::services::usage::DEFAULT_KEY_PREFIX;
use crate::services::{FileKvStore, KvStore, MemoryKvStore, UsageTracker};

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; an unconfigured CAPTCHA is skipped
    #[default]
    Development,
    /// Anything public
    Production,
}

impl Environment {
    /// Whether this is the development environment.
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
        }
    }
}

/// Where usage records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// In-process map, lost on restart
    #[default]
    Memory,
    /// JSON file on disk
    File,
    /// No store; every quota call fails open
    Disabled,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "disabled" | "none" => Ok(Self::Disabled),
            other => anyhow::bail!("Unknown usage store '{other}' (expected memory, file or disabled)"),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Usage quota configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Free generations per UTC day
    #[serde(default = "default_daily_free")]
    pub daily_free: u32,
    /// Extra generations from the share bonus
    #[serde(default = "default_share_bonus")]
    pub share_bonus: u32,
    /// Days a record is retained by the store
    #[serde(default = "default_record_ttl_days")]
    pub record_ttl_days: u32,
    /// Prefix for store keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Store backend
    #[serde(default)]
    pub store: StoreKind,
    /// File for the `file` store; defaults to `usage.json` in the config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

const fn default_daily_free() -> u32 {
    UsageLimits::DAILY_FREE
}

const fn default_share_bonus() -> u32 {
    UsageLimits::SHARE_BONUS
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn default_record_ttl_days() -> u32 {
    UsageLimits::RECORD_TTL_DAYS as u32
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            daily_free: default_daily_free(),
            share_bonus: default_share_bonus(),
            record_ttl_days: default_record_ttl_days(),
            key_prefix: default_key_prefix(),
            store: StoreKind::default(),
            store_path: None,
        }
    }
}

impl UsageConfig {
    /// Limits described by this section.
    #[must_use]
    pub fn limits(&self) -> UsageLimits {
        UsageLimits {
            daily_free: self.daily_free,
            share_bonus: self.share_bonus,
            record_ttl: chrono::Duration::days(i64::from(self.record_ttl_days)),
        }
    }

    /// Path of the file store.
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_dir()?.join("usage.json")),
        }
    }

    /// Opens the store for `kind`. `Disabled` yields `None`.
    pub fn open_store(&self, kind: StoreKind) -> Result<Option<Arc<dyn KvStore>>> {
        Ok(match kind {
            StoreKind::Memory => Some(Arc::new(MemoryKvStore::new())),
            StoreKind::File => Some(Arc::new(FileKvStore::new(self.resolved_store_path()?))),
            StoreKind::Disabled => None,
        })
    }

    /// Builds a tracker over the configured store.
    pub fn tracker(&self) -> Result<UsageTracker> {
        self.tracker_with(self.store)
    }

    /// Builds a tracker over an explicitly chosen store kind.
    pub fn tracker_with(&self, kind: StoreKind) -> Result<UsageTracker> {
        let store = self.open_store(kind)?;
        Ok(UsageTracker::new(store, self.limits()).with_key_prefix(self.key_prefix.clone()))
    }
}

/// Default Turnstile verification endpoint.
pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// CAPTCHA configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaConfig {
    /// Server-side secret for token verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Verification endpoint
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

fn default_verify_url() -> String {
    TURNSTILE_VERIFY_URL.to_string()
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            verify_url: default_verify_url(),
        }
    }
}

impl CaptchaConfig {
    /// The secret, if a non-blank one is set.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.secret_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Whether a non-empty secret is set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.secret().is_some()
    }
}

/// Image-to-palette model, reached through an OpenAI-compatible chat API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    /// API base, e.g. an AI gateway or OpenRouter URL ending in `/v1`
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    /// Model name sent with each request
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Bearer token; generation is disabled without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ai_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_ai_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

const fn default_ai_timeout_secs() -> u64 {
    60
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            api_key: None,
            timeout_secs: default_ai_timeout_secs(),
        }
    }
}

impl AiConfig {
    /// The API key, if a non-blank one is set.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Whether generation can be enabled.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ChromaPalette/config.toml`
/// - macOS: `~/Library/Application Support/ChromaPalette/config.toml`
/// - Windows: `%APPDATA%\ChromaPalette\config.toml`
///
/// `CHROMA_CONFIG_DIR` replaces the whole directory.
///
/// # Validation
///
/// - `usage.daily_free` must be at least 1
/// - `usage.record_ttl_days` must be at least 1
/// - `usage.key_prefix` must not be empty
/// - `ai.timeout_secs` must be at least 1
/// - `ai.base_url` and `ai.model` must be set when an API key is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Quota settings
    #[serde(default)]
    pub usage: UsageConfig,
    /// CAPTCHA settings
    #[serde(default)]
    pub captcha: CaptchaConfig,
    /// Generation model settings
    #[serde(default)]
    pub ai: AiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// - `$CHROMA_CONFIG_DIR` when set
    /// - Linux: `~/.config/ChromaPalette/`
    /// - macOS: `~/Library/Application Support/ChromaPalette/`
    /// - Windows: `%APPDATA%\ChromaPalette\`
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate().context(format!(
            "Invalid config file: {}",
            config_path.display()
        ))?;

        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        // Serialize to TOML
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = config_path.with_extension("toml.tmp");

        // Write to temp file
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.usage.daily_free == 0 {
            anyhow::bail!("usage.daily_free must be at least 1");
        }

        if self.usage.record_ttl_days == 0 {
            anyhow::bail!("usage.record_ttl_days must be at least 1");
        }

        if self.usage.key_prefix.is_empty() {
            anyhow::bail!("usage.key_prefix must not be empty");
        }

        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host must not be empty");
        }

        if self.captcha.is_configured() && self.captcha.verify_url.trim().is_empty() {
            anyhow::bail!("captcha.verify_url must not be empty when a secret is set");
        }

        if self.ai.timeout_secs == 0 {
            anyhow::bail!("ai.timeout_secs must be at least 1");
        }

        if self.ai.is_configured()
            && (self.ai.base_url.trim().is_empty() || self.ai.model.trim().is_empty())
        {
            anyhow::bail!("ai.base_url and ai.model must be set when ai.api_key is");
        }

        Ok(())
    }
}
