//! BuyLock CLI - inspect and drive BuyLock client-side state.
//!
//! Commands:
//! - `buylock rates` - Show exchange rates (cached, fetched or fallback)
//! - `buylock currency` - List, show or select the display currency
//! - `buylock convert` - Convert and format an amount
//! - `buylock cart` - Manage the guest cart
//! - `buylock config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CartArgs, ConfigArgs, ConvertArgs, CurrencyArgs, RatesArgs};

/// BuyLock CLI - currency and guest cart state for the BuyLock marketplace
#[derive(Parser)]
#[command(name = "buylock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for stored state (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show exchange rates
    Rates(RatesArgs),

    /// List, show or select the display currency
    Currency(CurrencyArgs),

    /// Convert an amount between currencies
    Convert(ConvertArgs),

    /// Manage the guest cart
    Cart(CartArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), cli.data_dir, output)?;
    ctx.output
        .debug(&format!("data directory: {}", ctx.data_dir().display()));

    // Execute command
    let result = match cli.command {
        Commands::Rates(args) => commands::rates::run(args, &ctx).await,
        Commands::Currency(args) => commands::currency::run(args, &ctx).await,
        Commands::Convert(args) => commands::convert::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
