//! Chroma Palette - color token toolkit
//!
//! Command-line access to shade ramps, WCAG contrast, dark-mode variants,
//! palette export and the daily usage quota.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chroma_palette::cli::{
    CliResult, ConfigArgs, ContrastArgs, DarkArgs, ExitCode, ExportArgs, ShadesArgs, UsageArgs,
};
use chroma_palette::constants::APP_BINARY_NAME;

/// Chroma Palette - color token toolkit
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the 50-950 shade ramp of a color
    Shades(ShadesArgs),
    /// Rate WCAG contrast
    Contrast(ContrastArgs),
    /// Derive a dark-mode variant
    Dark(DarkArgs),
    /// Export a palette as code
    Export(ExportArgs),
    /// Daily usage quota
    Usage(UsageArgs),
    /// Configuration management
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Shades(args) => args.execute(),
            Self::Contrast(args) => args.execute(),
            Self::Dark(args) => args.execute(),
            Self::Export(args) => args.execute(),
            Self::Usage(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays parseable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match cli.command.execute() {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code.code());
}
