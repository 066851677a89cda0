//! Usage quota commands.

use crate::cli::common::{output_json, CliError, CliResult};
use crate::config::{Config, StoreKind};
use crate::services::UsageTracker;
use chrono::Utc;
use clap::{Args, Subcommand};
use tracing::info;

/// Inspect and update the daily usage quota
#[derive(Args, Debug)]
pub struct UsageArgs {
    #[command(subcommand)]
    command: UsageCommand,
}

#[derive(Subcommand, Debug)]
enum UsageCommand {
    /// Show remaining quota
    Check(UsageTargetArgs),
    /// Spend one use
    Consume(UsageTargetArgs),
    /// Claim the daily share bonus
    ClaimBonus(UsageTargetArgs),
}

/// Who the quota belongs to and where it is stored
#[derive(Args, Debug)]
pub struct UsageTargetArgs {
    /// Identifier, normally an IP address
    #[arg(long, value_name = "ID")]
    id: String,

    /// Store to use: memory, file or disabled (defaults to usage.store)
    #[arg(long, value_name = "STORE")]
    store: Option<StoreKind>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl UsageTargetArgs {
    fn tracker(&self) -> CliResult<UsageTracker> {
        if self.id.trim().is_empty() {
            return Err(CliError::validation("--id must not be empty"));
        }

        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;
        let kind = self.store.unwrap_or_else(|| command_store(config.usage.store));

        config
            .usage
            .tracker_with(kind)
            .map_err(|e| CliError::io(format!("Failed to open usage store: {e:#}")))
    }
}

/// Store a command uses when `--store` is absent. A memory store would be
/// gone when the command exits, so the configured `memory` maps to `file`.
fn command_store(configured: StoreKind) -> StoreKind {
    if configured == StoreKind::Memory {
        info!("usage.store is memory, using the file store for this command");
        StoreKind::File
    } else {
        configured
    }
}

impl UsageArgs {
    /// Execute usage subcommand
    pub fn execute(&self) -> CliResult<()> {
        let now = Utc::now();
        match &self.command {
            UsageCommand::Check(args) => {
                let status = args.tracker()?.check(&args.id, now);
                if args.json {
                    return output_json(&status);
                }
                println!("Remaining: {}/{}", status.remaining, status.total);
                println!(
                    "Share bonus: {}",
                    if status.can_use_bonus { "available" } else { "claimed" }
                );
                println!("Resets at: {}", status.reset_at);
            }
            UsageCommand::Consume(args) => {
                let outcome = args.tracker()?.consume(&args.id, now);
                if args.json {
                    output_json(&outcome)?;
                } else if outcome.success {
                    println!("Used one generation, {} remaining", outcome.remaining);
                }
                if !outcome.success {
                    return Err(CliError::validation("Daily limit reached"));
                }
            }
            UsageCommand::ClaimBonus(args) => {
                let outcome = args.tracker()?.claim_bonus(&args.id, now);
                if args.json {
                    output_json(&outcome)?;
                } else if outcome.success {
                    println!("{}", outcome.message);
                }
                if !outcome.success {
                    return Err(CliError::validation(outcome.message));
                }
            }
        }
        Ok(())
    }
}
