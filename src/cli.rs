use clap::{ArgAction, Parser, Subcommand};

/// Binance price threshold monitor
#[derive(Parser, Debug)]
#[command(name = "pricewatch")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update a stored setting
    #[command(subcommand)]
    Set(SetCommand),

    /// Add an entry to the watch list
    #[command(subcommand)]
    Add(AddCommand),

    /// Start monitoring market prices and notify when thresholds are met
    Start,
}

#[derive(Subcommand, Debug)]
pub enum SetCommand {
    /// Sets the Binance API key
    Key {
        /// The Binance API key to use
        key: String,
    },
    /// Sets the Binance API secret
    Secret {
        /// The Binance API secret to use
        secret: String,
    },
    /// Sets the notification sound to Gilfoyle mode
    Gilfoyle {
        /// Either true or false
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AddCommand {
    /// Adds a crypto market to the watch list
    Market {
        /// A market name
        market: String,
        /// A target value as the threshold
        target: f64,
    },
}
