pub mod sound;

pub use sound::SoundSink;

use async_trait::async_trait;

use crate::error::PriceWatchError;
use crate::watch::state::PriceState;

/// Sink for threshold alerts. The session picks one implementation at
/// startup and the supervisor never looks past this trait.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, state: PriceState) -> Result<(), PriceWatchError>;
}

/// Sink that swallows every alert.
pub struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    async fn notify(&self, _state: PriceState) -> Result<(), PriceWatchError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_sink_accepts_every_state() {
        let sink = NullSink;
        for state in [
            PriceState::Unknown,
            PriceState::BelowThreshold,
            PriceState::AtThreshold,
            PriceState::AboveThreshold,
        ] {
            assert!(sink.notify(state).await.is_ok());
        }
    }
}
