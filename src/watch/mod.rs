pub mod state;
pub mod supervisor;

use log::info;
use tokio::sync::mpsc;

use crate::api::binance::ws;
use crate::config::AppConfig;
use crate::error::PriceWatchError;
use crate::notify::SoundSink;
use crate::ui::render::Painter;

use self::state::MarketStateStore;
use self::supervisor::StreamSupervisor;

/// Runs the monitoring session: one feed task producing ticks, one
/// supervisor loop consuming them, until the feed gives up or the process
/// is interrupted.
pub async fn run(config: &AppConfig) -> Result<(), PriceWatchError> {
    if config.markets.is_empty() {
        return Err(PriceWatchError::ConfigError(
            "no markets configured; add one with `pricewatch add market <MARKET> <TARGET>`".into(),
        ));
    }

    let symbols: Vec<String> = config.markets.keys().cloned().collect();
    info!("Watching {} markets", symbols.len());

    let store = MarketStateStore::new(&config.markets);
    let sink = Box::new(SoundSink::with_default_assets(config.gilfoyle()));
    let painter = Painter::new(std::io::stdout());
    let mut supervisor = StreamSupervisor::new(store, sink, painter);

    let (tick_tx, tick_rx) = mpsc::channel(100);

    let feed = tokio::spawn(async move { ws::stream_trades(symbols, tick_tx).await });

    supervisor.run(tick_rx).await?;

    // The supervisor only returns Ok once the feed task closed the channel.
    match feed.await {
        Ok(result) => result,
        Err(e) => Err(PriceWatchError::FeedError(format!(
            "feed task failed: {}",
            e
        ))),
    }
}
