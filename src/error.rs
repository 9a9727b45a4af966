use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceWatchError {
    #[error("WebSocket error: {0}")]
    WebsocketError(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Feed error: {0}")]
    FeedError(String),

    #[error("Received tick for unconfigured market: {0}")]
    UnknownMarket(String),
}
