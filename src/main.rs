use clap::Parser;
use env_logger::Builder;
use log::{error, info, LevelFilter};
use std::io::Write;

use pricewatch::cli::{AddCommand, Cli, Commands, SetCommand};
use pricewatch::config::{self, AppConfig};
use pricewatch::error::PriceWatchError;
use pricewatch::watch;

#[tokio::main]
async fn main() {
    // Configure logger
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("pricewatch", LevelFilter::Debug)
        .format(|buf, record| {
            let ts = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                ts,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr) // Keep logs separate from the price block
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), PriceWatchError> {
    let path = config::config_path();
    let mut config = AppConfig::load(&path)?;

    match cli.command {
        Commands::Set(SetCommand::Key { key }) => {
            config.key = Some(key);
            config.save(&path)?;
            info!("API key saved");
        }
        Commands::Set(SetCommand::Secret { secret }) => {
            config.secret = Some(secret);
            config.save(&path)?;
            info!("API secret saved");
        }
        Commands::Set(SetCommand::Gilfoyle { value }) => {
            config.gilfoyle_mode = Some(value);
            config.save(&path)?;
            info!("Gilfoyle mode set to {}", value);
        }
        Commands::Add(AddCommand::Market { market, target }) => {
            config.require_credentials()?;
            let market = config::sanitize_market(&market);
            config.markets.insert(market.clone(), target);
            config.save(&path)?;
            info!("Watching {} with threshold {}", market, target);
        }
        Commands::Start => {
            watch::run(&config).await?;
        }
    }

    Ok(())
}
