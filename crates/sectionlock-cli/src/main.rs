use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sectionlock_core::{AppConfig, NavPreset};

mod commands;

#[derive(Parser)]
#[command(name = "sectionlock")]
#[command(author, version, about = "Section-by-section snap scrolling in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Navigation preset, overriding the config file
    /// (standard, decisive, responsive, instant)
    #[arg(short, long, global = true)]
    preset: Option<NavPreset>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal page
    Run,
    /// Replay a recorded input trace and print what the controller did
    Simulate {
        /// Trace file (JSON)
        trace: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List navigation presets and their constants
    Presets,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;
    if let Some(preset) = cli.preset {
        config = config.with_preset(preset);
    }

    let tui = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, tui)?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Simulate { trace, json }) => {
            commands::simulate::run(config, &trace, json).await
        }
        Some(Commands::Presets) => commands::presets::run().await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config).await,
            ConfigAction::Init { force } => commands::config::init(force).await,
            ConfigAction::Path => commands::config::path().await,
        },
    }
}

/// Initialize logging. The terminal UI owns the screen, so it logs to a
/// file in the data dir; every other command logs to stderr.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("opening log file {}", log_path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_preset_flag_parses_anywhere() {
        let cli = Cli::try_parse_from(["sectionlock", "simulate", "t.json", "--preset", "instant"])
            .unwrap();
        assert_eq!(cli.preset, Some(NavPreset::Instant));
        assert!(matches!(cli.command, Some(Commands::Simulate { json: false, .. })));

        assert!(Cli::try_parse_from(["sectionlock", "--preset", "sluggish"]).is_err());
        let cli = Cli::try_parse_from(["sectionlock"]).unwrap();
        assert!(cli.command.is_none());
    }
}
