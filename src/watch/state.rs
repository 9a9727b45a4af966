use indexmap::IndexMap;

use crate::error::PriceWatchError;

/// Classification of a market's latest price against its configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceState {
    /// No tick received yet.
    Unknown,
    BelowThreshold,
    AtThreshold,
    AboveThreshold,
}

/// Maps a price onto a state relative to the threshold.
///
/// Comparison is exact: only a price bit-for-bit equal to the threshold lands
/// in `AtThreshold`.
pub fn classify(threshold: f64, price: f64) -> PriceState {
    if price < threshold {
        PriceState::BelowThreshold
    } else if price == threshold {
        PriceState::AtThreshold
    } else {
        PriceState::AboveThreshold
    }
}

/// Per-market record tracked for the lifetime of a watch session.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRecord {
    pub price: Option<f64>,
    pub threshold: f64,
    pub state: PriceState,
    /// True iff an alert already fired for the current state value. Reset to
    /// false exactly when the state changes.
    pub notified: bool,
}

/// Outcome of applying one tick.
#[derive(Debug, Clone, Copy)]
pub struct Applied {
    pub state: PriceState,
    /// Whether an alert should fire for this market now.
    pub due: bool,
}

/// Holds every configured market's record and applies incoming ticks.
///
/// Single writer: the supervisor loop is the only caller of `apply` and
/// `mark_notified`, so the map needs no locking.
pub struct MarketStateStore {
    records: IndexMap<String, MarketRecord>,
}

impl MarketStateStore {
    /// One record per configured market, starting in `Unknown` with no price.
    pub fn new(markets: &IndexMap<String, f64>) -> Self {
        let records = markets
            .iter()
            .map(|(name, &threshold)| {
                let record = MarketRecord {
                    price: None,
                    threshold,
                    state: PriceState::Unknown,
                    notified: false,
                };
                (name.clone(), record)
            })
            .collect();

        Self { records }
    }

    /// Applies one tick and reports the resulting state and whether an alert
    /// is due.
    ///
    /// A tick for a market that was never configured is a protocol violation:
    /// the subscription covers exactly the configured set.
    pub fn apply(&mut self, market: &str, price: f64) -> Result<Applied, PriceWatchError> {
        let record = self
            .records
            .get_mut(market)
            .ok_or_else(|| PriceWatchError::UnknownMarket(market.to_string()))?;

        record.price = Some(price);
        let new_state = classify(record.threshold, price);

        if record.state == PriceState::Unknown {
            record.state = new_state;
        } else if new_state != record.state {
            record.state = new_state;
            record.notified = false;
        }

        Ok(Applied {
            state: record.state,
            due: !record.notified,
        })
    }

    /// Records that an alert fired for the market's current state. Kept
    /// separate from `apply` so the caller decides when the alert attempt
    /// actually happened.
    pub fn mark_notified(&mut self, market: &str) {
        if let Some(record) = self.records.get_mut(market) {
            record.notified = true;
        }
    }

    /// Copies of all records in configuration insertion order.
    pub fn snapshot(&self) -> Vec<(String, MarketRecord)> {
        self.records
            .iter()
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MarketStateStore {
        let mut markets = IndexMap::new();
        markets.insert("BTCUSDT".to_string(), 50000.0);
        markets.insert("ETHUSDT".to_string(), 3000.0);
        MarketStateStore::new(&markets)
    }

    #[test]
    fn classify_splits_on_threshold() {
        assert_eq!(classify(100.0, 99.999), PriceState::BelowThreshold);
        assert_eq!(classify(100.0, 100.0), PriceState::AtThreshold);
        assert_eq!(classify(100.0, 100.001), PriceState::AboveThreshold);
        assert_eq!(classify(0.0, -0.5), PriceState::BelowThreshold);
        assert_eq!(classify(-1.0, 1.0), PriceState::AboveThreshold);
        assert_eq!(classify(0.1, 0.1), PriceState::AtThreshold);
    }

    #[test]
    fn first_tick_is_always_due() {
        let mut store = store();
        let applied = store.apply("BTCUSDT", 60000.0).unwrap();
        assert_eq!(applied.state, PriceState::AboveThreshold);
        assert!(applied.due);
    }

    #[test]
    fn repeated_state_is_due_once() {
        let mut store = store();
        assert!(store.apply("BTCUSDT", 49000.0).unwrap().due);
        store.mark_notified("BTCUSDT");

        let applied = store.apply("BTCUSDT", 49500.0).unwrap();
        assert_eq!(applied.state, PriceState::BelowThreshold);
        assert!(!applied.due);

        let applied = store.apply("BTCUSDT", 48000.0).unwrap();
        assert!(!applied.due);
    }

    #[test]
    fn state_change_resets_notified() {
        let mut store = store();
        store.apply("BTCUSDT", 49000.0).unwrap();
        store.mark_notified("BTCUSDT");

        let applied = store.apply("BTCUSDT", 50500.0).unwrap();
        assert_eq!(applied.state, PriceState::AboveThreshold);
        assert!(applied.due);
    }

    #[test]
    fn exact_threshold_hit_lands_at() {
        let mut store = store();
        let applied = store.apply("ETHUSDT", 3000.0).unwrap();
        assert_eq!(applied.state, PriceState::AtThreshold);
        assert!(applied.due);
    }

    #[test]
    fn threshold_crossing_scenario() {
        let mut store = store();

        let applied = store.apply("BTCUSDT", 49000.0).unwrap();
        assert_eq!(applied.state, PriceState::BelowThreshold);
        assert!(applied.due);
        store.mark_notified("BTCUSDT");

        let applied = store.apply("BTCUSDT", 49500.0).unwrap();
        assert_eq!(applied.state, PriceState::BelowThreshold);
        assert!(!applied.due);

        let applied = store.apply("BTCUSDT", 50500.0).unwrap();
        assert_eq!(applied.state, PriceState::AboveThreshold);
        assert!(applied.due);
        store.mark_notified("BTCUSDT");

        let applied = store.apply("ETHUSDT", 3000.0).unwrap();
        assert_eq!(applied.state, PriceState::AtThreshold);
        assert!(applied.due);
    }

    #[test]
    fn snapshot_is_stable_between_applies() {
        let mut store = store();
        store.apply("BTCUSDT", 49000.0).unwrap();

        let first = store.snapshot();
        let second = store.snapshot();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_keeps_configuration_order() {
        let mut markets = IndexMap::new();
        markets.insert("ZECUSDT".to_string(), 100.0);
        markets.insert("ADAUSDT".to_string(), 1.0);
        markets.insert("BTCUSDT".to_string(), 50000.0);
        let store = MarketStateStore::new(&markets);

        let names: Vec<&str> = store.snapshot().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["ZECUSDT", "ADAUSDT", "BTCUSDT"]);
    }

    #[test]
    fn unconfigured_market_is_rejected() {
        let mut store = store();
        let err = store.apply("DOGEUSDT", 0.5).unwrap_err();
        assert!(matches!(err, PriceWatchError::UnknownMarket(_)));
    }
}
