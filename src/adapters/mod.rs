use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::warn;

use crate::types::{BacktestResult, Candle, Instrument, OptionType, Underlying};

/// Historical candle collaborator (spec §6). Out of this crate's scope to
/// implement against a real data store — only the interface and an
/// in-process cache for the instrument master live here.
#[async_trait]
pub trait HistoricalDataProvider: Send + Sync {
    async fn fetch_day_candles(&self, token: &str, date: NaiveDate, interval: &str) -> anyhow::Result<Vec<Candle>>;

    #[allow(clippy::too_many_arguments)]
    async fn fetch_option_candles(
        &self,
        underlying: Underlying,
        strike: Decimal,
        option_type: OptionType,
        expiry: NaiveDate,
        date: NaiveDate,
        interval: &str,
    ) -> anyhow::Result<Vec<Candle>>;

    fn generate_option_symbol(&self, underlying: Underlying, strike: Decimal, option_type: OptionType, expiry: NaiveDate) -> String;

    async fn is_data_available(&self, date: NaiveDate) -> anyhow::Result<bool>;
}

/// Instrument master collaborator (spec §6). The returned snapshot is
/// immutable and safely shared read-only across concurrent backtests (§5).
#[async_trait]
pub trait InstrumentMasterProvider: Send + Sync {
    async fn fetch_nfo(&self) -> anyhow::Result<Arc<[Instrument]>>;
    fn get_index_token(&self, underlying: Underlying) -> String;
    fn get_default_lot_size(&self, underlying: Underlying) -> u32;
}

/// Result cache collaborator (spec §6).
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn put(&self, id: String, result: BacktestResult);
    async fn get(&self, id: &str) -> Option<BacktestResult>;
    async fn all_values(&self) -> Vec<BacktestResult>;
    async fn clear(&self);
    async fn size(&self) -> usize;
}

/// In-memory `ResultCache`, bounded by `max_size` with FIFO eviction (spec §5).
/// Concurrent insertions/lookups are serialized by the cache's own lock.
pub struct InMemoryResultCache {
    max_size: usize,
    inner: Mutex<CacheState>,
}

struct CacheState {
    values: HashMap<String, BacktestResult>,
    insertion_order: VecDeque<String>,
}

impl InMemoryResultCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            inner: Mutex::new(CacheState { values: HashMap::new(), insertion_order: VecDeque::new() }),
        }
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn put(&self, id: String, result: BacktestResult) {
        let mut state = self.inner.lock().await;
        if !state.values.contains_key(&id) {
            state.insertion_order.push_back(id.clone());
        }
        state.values.insert(id, result);

        while state.values.len() > self.max_size {
            if let Some(oldest) = state.insertion_order.pop_front() {
                warn!(id = %oldest, "evicting oldest backtest result from cache");
                state.values.remove(&oldest);
            } else {
                break;
            }
        }
    }

    async fn get(&self, id: &str) -> Option<BacktestResult> {
        self.inner.lock().await.values.get(id).cloned()
    }

    async fn all_values(&self) -> Vec<BacktestResult> {
        self.inner.lock().await.values.values().cloned().collect()
    }

    async fn clear(&self) {
        let mut state = self.inner.lock().await;
        state.values.clear();
        state.insertion_order.clear();
    }

    async fn size(&self) -> usize {
        self.inner.lock().await.values.len()
    }
}
