//! Configuration management CLI commands.

use crate::cli::common::{output_json, CliError, CliResult};
use crate::config::Config;
use clap::{Args, Subcommand};

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print the config file path
    Path,
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().map_err(|e| {
            CliError::validation(format!("Failed to load configuration: {e:#}"))
        })?;

        if self.json {
            output_json(&redacted(config))?;
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

/// Masks secrets so the config can be printed.
fn redacted(mut config: Config) -> Config {
    const MASK: &str = "********";
    if config.captcha.is_configured() {
        config.captcha.secret_key = Some(MASK.to_string());
    }
    if config.ai.is_configured() {
        config.ai.api_key = Some(MASK.to_string());
    }
    config
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("Chroma Palette Configuration");
    println!("============================");
    println!();

    println!("Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  Environment: {}", config.server.environment);
    println!();

    println!("Usage:");
    println!("  Daily free: {}", config.usage.daily_free);
    println!("  Share bonus: {}", config.usage.share_bonus);
    println!("  Record TTL: {} days", config.usage.record_ttl_days);
    println!("  Key prefix: {}", config.usage.key_prefix);
    println!("  Store: {}", config.usage.store);
    match config.usage.resolved_store_path() {
        Ok(path) => println!("  Store path: {}", path.display()),
        Err(_) => println!("  Store path: (unavailable)"),
    }
    println!();

    println!("Captcha:");
    println!(
        "  Secret key: {}",
        if config.captcha.is_configured() {
            "(set)"
        } else {
            "(not configured)"
        }
    );
    println!("  Verify URL: {}", config.captcha.verify_url);
    println!();

    println!("AI:");
    println!("  Base URL: {}", config.ai.base_url);
    println!("  Model: {}", config.ai.model);
    println!(
        "  API key: {}",
        if config.ai.is_configured() {
            "(set)"
        } else {
            "(not configured, generation disabled)"
        }
    );
    println!("  Timeout: {}s", config.ai.timeout_secs);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_masks_secrets() {
        let mut config = Config::new();
        config.captcha.secret_key = Some("turnstile-secret".to_string());
        config.ai.api_key = Some("sk-live".to_string());

        let json = serde_json::to_string(&redacted(config)).unwrap();
        assert!(!json.contains("turnstile-secret"));
        assert!(!json.contains("sk-live"));
        assert!(json.contains("********"));
    }
}
