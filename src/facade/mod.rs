use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::adapters::{HistoricalDataProvider, InstrumentMasterProvider, ResultCache};
use crate::config::ServiceConfig;
use crate::engine::{aggregate, backtest};
use crate::error::BacktestError;
use crate::time::{is_weekend, today_ist};
use crate::types::{BacktestRequest, BacktestResult, CandleSeries};

/// Service boundary (spec §5, §6, §7): validates a request, bounds
/// concurrent simulations with a semaphore sized off [`ServiceConfig`],
/// drives the engine, classifies failures into the closed taxonomy, and
/// always caches the outcome — success or failure — under the same id.
pub struct BacktestService {
    config: ServiceConfig,
    historical: Arc<dyn HistoricalDataProvider>,
    instruments: Arc<dyn InstrumentMasterProvider>,
    cache: Arc<dyn ResultCache>,
    worker_permits: Semaphore,
}

impl BacktestService {
    pub fn new(
        config: ServiceConfig,
        historical: Arc<dyn HistoricalDataProvider>,
        instruments: Arc<dyn InstrumentMasterProvider>,
        cache: Arc<dyn ResultCache>,
    ) -> Self {
        let worker_permits = Semaphore::new(config.worker_pool_size);
        Self { config, historical, instruments, cache, worker_permits }
    }

    #[instrument(skip(self, request), fields(instrument = %request.instrument_type, date = %request.date))]
    pub async fn run_backtest(&self, request: BacktestRequest) -> BacktestResult {
        let id = Uuid::new_v4().to_string();
        let started = Instant::now();

        if !self.config.module_enabled {
            let err = BacktestError::BacktestDisabled("backtesting module is disabled".into());
            return self.finish_failed(id, &request, &err, started).await;
        }

        if let Err(err) = validate(&request) {
            return self.finish_failed(id, &request, &err, started).await;
        }

        let _permit = self.worker_permits.acquire().await.expect("semaphore is never closed");

        match self.execute(&request).await {
            Ok(trades) => {
                let totals = aggregate(&trades);
                let restart_count = trades.iter().filter(|t| t.was_restarted).count() as u32;
                let duration_ms = started.elapsed().as_millis() as u64;
                let result = BacktestResult::completed(
                    id.clone(),
                    request.date,
                    request.strategy_type,
                    request.instrument_type,
                    trades,
                    totals,
                    restart_count,
                    duration_ms,
                );
                self.cache.put(id, result.clone()).await;
                result
            }
            Err(err) => {
                error!(error = %err, code = err.code(), "backtest run failed");
                self.finish_failed(id, &request, &err, started).await
            }
        }
    }

    async fn execute(&self, request: &BacktestRequest) -> Result<Vec<crate::types::Trade>, BacktestError> {
        let master = self
            .instruments
            .fetch_nfo()
            .await
            .map_err(|e| BacktestError::from_instrument_lookup(&e))?;

        let index_token = self.instruments.get_index_token(request.instrument_type);
        let lot_size = self.instruments.get_default_lot_size(request.instrument_type);

        let index_candles = self
            .historical
            .fetch_day_candles(&index_token, request.date, &request.candle_interval)
            .await
            .map_err(|e| BacktestError::from_data_fetch(&e))?;
        let index_series = CandleSeries::new(index_candles);

        if index_series.is_empty() {
            return Err(BacktestError::DataFetchFailed(format!(
                "no index candles for {} on {}",
                request.instrument_type, request.date
            )));
        }

        backtest::run(request, &index_series.candles, &master, lot_size, self.historical.as_ref()).await
    }

    async fn finish_failed(&self, id: String, request: &BacktestRequest, err: &BacktestError, started: Instant) -> BacktestResult {
        let duration_ms = started.elapsed().as_millis() as u64;
        let result = BacktestResult::failed(id.clone(), request.date, request.strategy_type, request.instrument_type, err, duration_ms);
        self.cache.put(id, result.clone()).await;
        result
    }

    pub async fn get_result(&self, id: &str) -> Option<BacktestResult> {
        self.cache.get(id).await
    }

    pub async fn list_results(&self) -> Vec<BacktestResult> {
        self.cache.all_values().await
    }
}

/// Spec §7: a weekend date, a date in the future, or `start_time >=
/// end_time`, is `INVALID_DATE`.
fn validate(request: &BacktestRequest) -> Result<(), BacktestError> {
    if is_weekend(request.date) {
        return Err(BacktestError::InvalidDate(format!("{} falls on a weekend", request.date)));
    }
    if request.date > today_ist() {
        return Err(BacktestError::InvalidDate(format!("{} is in the future", request.date)));
    }
    if request.start_time >= request.end_time {
        return Err(BacktestError::InvalidDate("start_time must be before end_time".into()));
    }
    if request.lots == 0 {
        return Err(BacktestError::InvalidDate("lots must be positive".into()));
    }
    Ok(())
}
