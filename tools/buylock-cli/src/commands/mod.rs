//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod convert;
pub mod currency;
pub mod rates;

use chrono::{NaiveDate, NaiveTime};
use clap::{ArgGroup, Args, Subcommand};

/// Arguments for the rates command.
#[derive(Args)]
pub struct RatesArgs {
    /// Ignore cached rates and ask the endpoint.
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the currency command.
#[derive(Args)]
pub struct CurrencyArgs {
    #[command(subcommand)]
    pub command: Option<CurrencyCommand>,
}

#[derive(Subcommand)]
pub enum CurrencyCommand {
    /// List supported currencies.
    List,
    /// Show the selected currency.
    Show,
    /// Select the display currency.
    Set {
        /// Currency code (e.g. USD).
        code: String,
    },
}

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Amount to convert (number or decimal string).
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Currency the amount is in (default: KES).
    #[arg(short, long)]
    pub from: Option<String>,

    /// Currency to convert to (default: the selected currency).
    #[arg(short, long)]
    pub to: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show cart lines and totals.
    Show {
        /// Display currency override.
        #[arg(long)]
        currency: Option<String>,
    },
    /// Add a product or service.
    Add(AddArgs),
    /// Set the quantity of a line (0 or less removes it).
    Update {
        /// Line ID.
        id: String,
        /// New quantity.
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Line ID.
        id: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Hand the cart to checkout: print its lines as JSON and empty it.
    Checkout,
}

/// Arguments for `cart add`.
#[derive(Args)]
#[command(group(ArgGroup::new("item").required(true).args(["product", "service"])))]
pub struct AddArgs {
    /// Product ID.
    #[arg(long)]
    pub product: Option<String>,

    /// Service ID.
    #[arg(long)]
    pub service: Option<String>,

    /// Quantity to add.
    #[arg(short, long, default_value = "1")]
    pub quantity: u32,

    /// Display name recorded with the line.
    #[arg(long)]
    pub name: Option<String>,

    /// Unit price in KES recorded with the line.
    #[arg(long)]
    pub price: Option<String>,

    /// Vendor ID recorded with the line.
    #[arg(long)]
    pub vendor: Option<String>,

    /// Appointment date (YYYY-MM-DD), for services.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Appointment time (HH:MM), for services.
    #[arg(long, value_parser = parse_time, requires = "date")]
    pub time: Option<NaiveTime>,

    /// Appointment duration in minutes.
    #[arg(long, requires = "date")]
    pub duration: Option<u32>,

    /// Notes for the provider.
    #[arg(long, requires = "date")]
    pub notes: Option<String>,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {}", e))
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value (e.g. rates.endpoint).
    Get {
        /// Config key.
        key: String,
    },
    /// Set a value in the config file.
    Set {
        /// Config key.
        key: String,
        /// New value.
        value: String,
    },
    /// Check the configuration for errors.
    Validate,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
