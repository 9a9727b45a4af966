use futures_util::StreamExt;
use log::{error, info, warn};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite;

use crate::error::PriceWatchError;

const BINANCE_WS_URL: &str = "wss://stream.binance.com:9443";

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(64);
const MAX_RECONNECT_ATTEMPTS: usize = 10;

/// One inbound price update for a watched market.
#[derive(Debug, Clone)]
pub struct Tick {
    pub market: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
struct StreamFrame {
    data: TradeData,
}

#[derive(Debug, Deserialize)]
struct TradeData {
    s: String, // Symbol
    p: String, // Trade price
}

/// Connects to the combined trade stream for `symbols` and forwards ticks
/// over `sender` until the receiving side goes away.
///
/// Transport errors trigger a reconnect with capped exponential backoff; the
/// attempt counter resets after every successful connection. Returns an error
/// once the attempts are exhausted.
pub async fn stream_trades(
    symbols: Vec<String>,
    sender: mpsc::Sender<Tick>,
) -> Result<(), PriceWatchError> {
    let streams = symbols
        .iter()
        .map(|s| format!("{}@trade", s.to_lowercase()))
        .collect::<Vec<_>>()
        .join("/");
    let url = format!("{}/stream?streams={}", BINANCE_WS_URL, streams);

    let mut attempt = 0usize;

    loop {
        info!("Connecting to Binance WebSocket: {}", url);

        match connect_async(&url).await {
            Ok((mut ws_stream, _)) => {
                info!("Successfully connected to WebSocket");
                attempt = 0;

                while let Some(message) = ws_stream.next().await {
                    match message {
                        Ok(tungstenite::protocol::Message::Text(text)) => {
                            match serde_json::from_str::<StreamFrame>(&text) {
                                Ok(frame) => {
                                    let price = match frame.data.p.parse::<f64>() {
                                        Ok(price) => price,
                                        Err(e) => {
                                            warn!(
                                                "Unparseable price '{}' for {}: {}",
                                                frame.data.p, frame.data.s, e
                                            );
                                            continue;
                                        }
                                    };

                                    let tick = Tick {
                                        market: frame.data.s,
                                        price,
                                    };
                                    if sender.send(tick).await.is_err() {
                                        info!("Tick receiver dropped, closing stream");
                                        return Ok(());
                                    }
                                }
                                Err(e) => {
                                    warn!("Failed to parse trade frame: {}", e);
                                }
                            }
                        }
                        Ok(tungstenite::protocol::Message::Close(_)) => {
                            warn!("WebSocket connection closed by server");
                            break;
                        }
                        Ok(_) => {} // Ping/pong handled by tungstenite
                        Err(e) => {
                            error!("WebSocket error: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Connection error: {}", e);
            }
        }

        attempt += 1;
        if attempt > MAX_RECONNECT_ATTEMPTS {
            return Err(PriceWatchError::FeedError(format!(
                "giving up after {} reconnect attempts",
                MAX_RECONNECT_ATTEMPTS
            )));
        }

        let delay = backoff_delay(attempt);
        warn!(
            "Reconnecting in {:?} (attempt {}/{})",
            delay, attempt, MAX_RECONNECT_ATTEMPTS
        );
        tokio::time::sleep(delay).await;
    }
}

/// Capped exponential backoff: `INITIAL_BACKOFF * 2^(attempt-1)`, at most
/// `MAX_BACKOFF`.
fn backoff_delay(attempt: usize) -> Duration {
    let exp = attempt.saturating_sub(1).min(16) as u32;
    let millis = INITIAL_BACKOFF.as_millis() as u64 * 2u64.pow(exp);
    Duration::from_millis(millis.min(MAX_BACKOFF.as_millis() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
        assert_eq!(backoff_delay(7), Duration::from_secs(64));
        assert_eq!(backoff_delay(10), MAX_BACKOFF);
    }

    #[test]
    fn trade_frame_parses_symbol_and_price() {
        let text = r#"{"stream":"btcusdt@trade","data":{"e":"trade","E":1672515782136,"s":"BTCUSDT","t":12345,"p":"50500.10","q":"0.001","T":1672515782134,"m":true,"M":true}}"#;
        let frame: StreamFrame = serde_json::from_str(text).unwrap();
        assert_eq!(frame.data.s, "BTCUSDT");
        assert_eq!(frame.data.p, "50500.10");
    }
}
