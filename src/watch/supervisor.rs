use log::error;
use std::io::Write;
use tokio::sync::mpsc;

use crate::api::binance::ws::Tick;
use crate::error::PriceWatchError;
use crate::notify::NotificationSink;
use crate::ui::render::{render, Painter};
use crate::watch::state::MarketStateStore;

/// Drives the watch session: consumes ticks one at a time, updates the
/// store, fires due alerts, and repaints the terminal block.
///
/// All state mutation, notification, and painting happen inline here, so a
/// tick is fully processed before the next one is looked at.
pub struct StreamSupervisor<W: Write> {
    store: MarketStateStore,
    sink: Box<dyn NotificationSink>,
    painter: Painter<W>,
}

impl<W: Write> StreamSupervisor<W> {
    pub fn new(store: MarketStateStore, sink: Box<dyn NotificationSink>, painter: Painter<W>) -> Self {
        Self {
            store,
            sink,
            painter,
        }
    }

    /// Processes ticks until the feed side closes the channel.
    pub async fn run(&mut self, mut ticks: mpsc::Receiver<Tick>) -> Result<(), PriceWatchError> {
        while let Some(tick) = ticks.recv().await {
            self.handle_tick(tick).await?;
        }
        Ok(())
    }

    async fn handle_tick(&mut self, tick: Tick) -> Result<(), PriceWatchError> {
        let applied = self.store.apply(&tick.market, tick.price)?;

        if applied.due {
            // At-most-once: a failed alert is logged, never retried, and the
            // market is marked notified either way.
            if let Err(e) = self.sink.notify(applied.state).await {
                error!("Notification failed for {}: {}", tick.market, e);
            }
            self.store.mark_notified(&tick.market);
        }

        let frame = render(&self.store.snapshot());
        self.painter.paint(&frame)?;
        Ok(())
    }
}
