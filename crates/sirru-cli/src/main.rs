use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sirru_core::Config;
use tracing_subscriber::EnvFilter;

mod clock;
mod commands;
mod render;

#[derive(Parser)]
#[command(name = "sirru-cli", version, about = "Sirru CLI")]
struct Cli {
    /// Config file to read instead of ~/.config/sirru/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override a config value, e.g. --set breathing.target_cycles=5
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a box-breathing session
    Breathe(commands::breathe::BreatheArgs),
    /// Play the Faru group chat
    Faru(commands::faru::FaruArgs),
    /// Talk to Koamas, one message per argument
    Koamas(commands::koamas::KoamasArgs),
    /// Mood check-ins
    Pulse {
        #[command(subcommand)]
        action: commands::pulse::PulseAction,
    },
    /// Validate an onboarding profile
    Profile(commands::profile::ProfileArgs),
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SIRRU_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries JSON; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config::resolve(cli.config.as_deref(), cli.overrides.iter().map(String::as_str))?;
    tracing::debug!(path = ?cli.config, overrides = cli.overrides.len(), "config resolved");
    Ok(config)
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Breathe(args) => commands::breathe::run(args, &config),
        Commands::Faru(args) => commands::faru::run(args, &config),
        Commands::Koamas(args) => commands::koamas::run(args, &config),
        Commands::Pulse { action } => commands::pulse::run(action, &config),
        Commands::Profile(args) => commands::profile::run(args),
        Commands::Config { action } => commands::config::run(action, &config),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
