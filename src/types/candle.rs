use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time::IstTimestamp;

/// Immutable minute-aligned OHLC record, spec §3. `timestamp` carries the
/// explicit IST offset all candles are interpreted under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: IstTimestamp,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Candle {
    pub fn new(
        timestamp: IstTimestamp,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self { timestamp, open, high, low, close, volume }
    }
}

/// A slice of candles for one leg/token across one trading day, ordered by
/// ascending timestamp. Duplicate timestamps within a stream are resolved by
/// last-insertion-wins, per spec §4.1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandleSeries {
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        Self { candles }
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// First candle whose timestamp is at or after `at`.
    pub fn first_at_or_after(&self, at: IstTimestamp) -> Option<&Candle> {
        self.candles.iter().find(|c| c.timestamp >= at)
    }

    /// First candle whose timestamp is strictly after `at` — used to find a
    /// restart's re-entry point without re-triggering on the exit candle.
    pub fn first_after(&self, at: IstTimestamp) -> Option<&Candle> {
        self.candles.iter().find(|c| c.timestamp > at)
    }
}
