//! End-to-end scenarios driven through the public service facade, one per
//! concrete walkthrough in the backtesting specification: points-mode
//! target/stop-loss, premium-mode decay/expansion, trailing stop, forced
//! cutoff, and auto-restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use options_backtest_core::adapters::{HistoricalDataProvider, InMemoryResultCache, InstrumentMasterProvider};
use options_backtest_core::config::ServiceConfig;
use options_backtest_core::facade::BacktestService;
use options_backtest_core::time::ist_timestamp;
use options_backtest_core::types::{
    BacktestRequest, BacktestStatus, Candle, ExitReason, Instrument, OptionType, SlTargetMode, StrategyType, Underlying,
};

fn trading_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 27).unwrap()
}

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 31).unwrap()
}

fn candle(h: u32, m: u32, close: Decimal) -> Candle {
    let ts = ist_timestamp(trading_day(), NaiveTime::from_hms_opt(h, m, 0).unwrap());
    Candle::new(ts, close, close, close, close, dec!(1))
}

struct ScriptedMarket {
    ce: Vec<Candle>,
    pe: Vec<Candle>,
}

#[async_trait]
impl HistoricalDataProvider for ScriptedMarket {
    async fn fetch_day_candles(&self, _token: &str, date: NaiveDate, _interval: &str) -> anyhow::Result<Vec<Candle>> {
        // Several candles spanning the session so an auto-restart has somewhere
        // to re-enter; every one resolves to the same 22500 ATM strike.
        Ok(vec![candle(9, 20, dec!(22510)), candle(9, 25, dec!(22505)), candle(15, 10, dec!(22505))]
            .into_iter()
            .filter(|c| c.timestamp.date_naive() == date)
            .collect())
    }

    async fn fetch_option_candles(
        &self,
        _underlying: Underlying,
        _strike: Decimal,
        option_type: OptionType,
        _expiry: NaiveDate,
        _date: NaiveDate,
        _interval: &str,
    ) -> anyhow::Result<Vec<Candle>> {
        Ok(match option_type {
            OptionType::CE => self.ce.clone(),
            OptionType::PE => self.pe.clone(),
        })
    }

    fn generate_option_symbol(&self, underlying: Underlying, strike: Decimal, option_type: OptionType, expiry: NaiveDate) -> String {
        format!("{underlying}{expiry}{strike}{option_type}")
    }

    async fn is_data_available(&self, _date: NaiveDate) -> anyhow::Result<bool> {
        Ok(true)
    }
}

struct SingleStrikeMaster;

#[async_trait]
impl InstrumentMasterProvider for SingleStrikeMaster {
    async fn fetch_nfo(&self) -> anyhow::Result<Arc<[Instrument]>> {
        Ok(Arc::from(vec![
            Instrument {
                trading_symbol: "NIFTY22500CE".into(),
                token: 1,
                underlying: Underlying::NIFTY,
                expiry: expiry(),
                strike: dec!(22500),
                option_type: OptionType::CE,
                lot_size: 50,
            },
            Instrument {
                trading_symbol: "NIFTY22500PE".into(),
                token: 2,
                underlying: Underlying::NIFTY,
                expiry: expiry(),
                strike: dec!(22500),
                option_type: OptionType::PE,
                lot_size: 50,
            },
        ]))
    }

    fn get_index_token(&self, _underlying: Underlying) -> String {
        "256265".into()
    }

    fn get_default_lot_size(&self, underlying: Underlying) -> u32 {
        underlying.default_lot_size()
    }
}

fn service(ce: Vec<Candle>, pe: Vec<Candle>) -> BacktestService {
    let mut config = ServiceConfig::default();
    config.worker_pool_size = 2;
    BacktestService::new(
        config,
        Arc::new(ScriptedMarket { ce, pe }),
        Arc::new(SingleStrikeMaster),
        Arc::new(InMemoryResultCache::new(50)),
    )
}

fn base_request(mode: SlTargetMode) -> BacktestRequest {
    BacktestRequest {
        strategy_type: StrategyType::SellAtmStraddle,
        instrument_type: Underlying::NIFTY,
        expiry_date: expiry(),
        date: trading_day(),
        lots: 1,
        sl_target_mode: mode,
        stop_loss_points: dec!(4.0),
        target_points: dec!(2.5),
        target_decay_pct: dec!(0.05),
        stop_loss_expansion_pct: dec!(0.10),
        start_time: NaiveTime::from_hms_opt(9, 20, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(15, 10, 0).unwrap(),
        auto_square_off_time: NaiveTime::from_hms_opt(15, 10, 0).unwrap(),
        candle_interval: "minute".into(),
        auto_restart_enabled: false,
        max_auto_restarts: 0,
        trailing_stop_enabled: false,
        trailing_activation_points: Decimal::ZERO,
        trailing_distance_points: Decimal::ZERO,
        forced_exit_enabled: true,
    }
}

/// Scenario 1: SHORT straddle, points mode, combined premium decays by the
/// full 2.5-point target -> CUMULATIVE_TARGET_HIT.
#[tokio::test]
async fn points_mode_target_hit() {
    let ce = vec![candle(9, 20, dec!(100)), candle(9, 22, dec!(98.5))];
    let pe = vec![candle(9, 20, dec!(80)), candle(9, 22, dec!(79))];
    let svc = service(ce, pe);

    let result = svc.run_backtest(base_request(SlTargetMode::Points)).await;

    assert_eq!(result.status, BacktestStatus::Completed);
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].exit_reason, ExitReason::CumulativeTargetHit);
    assert_eq!(result.trades[0].pnl_points, dec!(2.5));
}

/// Scenario 2: SHORT straddle, points mode, combined premium expands past the
/// 4-point stop -> CUMULATIVE_STOPLOSS_HIT.
#[tokio::test]
async fn points_mode_stop_loss_hit() {
    let ce = vec![candle(9, 20, dec!(100)), candle(9, 22, dec!(102))];
    let pe = vec![candle(9, 20, dec!(80)), candle(9, 22, dec!(82))];
    let svc = service(ce, pe);

    let result = svc.run_backtest(base_request(SlTargetMode::Points)).await;

    assert_eq!(result.trades[0].exit_reason, ExitReason::CumulativeStoplossHit);
    assert_eq!(result.trades[0].pnl_points, dec!(-4));
}

/// Scenario 3: premium mode, 5% decay off the combined entry premium of 180
/// (-> 171) fires PREMIUM_DECAY_TARGET_HIT.
#[tokio::test]
async fn premium_mode_decay_target_hit() {
    let ce = vec![candle(9, 20, dec!(100)), candle(9, 22, dec!(91))];
    let pe = vec![candle(9, 20, dec!(80)), candle(9, 22, dec!(79))];
    let svc = service(ce, pe);

    let result = svc.run_backtest(base_request(SlTargetMode::Premium)).await;

    assert_eq!(result.trades[0].exit_reason, ExitReason::PremiumDecayTargetHit);
}

/// Scenario 3b: premium mode, 10% expansion of the combined entry premium
/// fires PREMIUM_EXPANSION_SL_HIT.
#[tokio::test]
async fn premium_mode_expansion_stop_hit() {
    let ce = vec![candle(9, 20, dec!(100)), candle(9, 22, dec!(110))];
    let pe = vec![candle(9, 20, dec!(80)), candle(9, 22, dec!(90))];
    let svc = service(ce, pe);

    let result = svc.run_backtest(base_request(SlTargetMode::Premium)).await;

    assert_eq!(result.trades[0].exit_reason, ExitReason::PremiumExpansionSlHit);
}

/// Scenario 4: points mode with trailing stop enabled, the combined P&L path
/// rises past activation then pulls back past the trailing distance ->
/// TRAILING_STOP_HIT, taking priority over the (still unmet) cumulative target.
#[tokio::test]
async fn trailing_stop_sequence_fires_on_pullback() {
    let ce = vec![
        candle(9, 20, dec!(100)),
        candle(9, 21, dec!(99.7)),
        candle(9, 22, dec!(99.2)),
        candle(9, 23, dec!(98.8)),
        candle(9, 24, dec!(98.8)),
        candle(9, 25, dec!(99.3)),
    ];
    let pe = vec![
        candle(9, 20, dec!(80)),
        candle(9, 21, dec!(79.7)),
        candle(9, 22, dec!(79.2)),
        candle(9, 23, dec!(78.8)),
        candle(9, 24, dec!(78.8)),
        candle(9, 25, dec!(79.3)),
    ];
    let svc = service(ce, pe);

    let mut request = base_request(SlTargetMode::Points);
    request.target_points = dec!(10); // keep the plain target from firing first
    request.stop_loss_points = dec!(10);
    request.trailing_stop_enabled = true;
    request.trailing_activation_points = dec!(1.0);
    request.trailing_distance_points = dec!(0.5);

    let result = svc.run_backtest(request).await;

    assert_eq!(result.trades[0].exit_reason, ExitReason::TrailingStopHit);
}

/// Scenario 5: nothing ever crosses a threshold before the auto-square-off
/// cutoff -> TIME_BASED_FORCED_EXIT at exactly the cutoff timestamp.
#[tokio::test]
async fn forced_square_off_at_cutoff() {
    let ce = vec![candle(9, 20, dec!(100)), candle(15, 10, dec!(100.1))];
    let pe = vec![candle(9, 20, dec!(80)), candle(15, 10, dec!(80.1))];
    let svc = service(ce, pe);

    let result = svc.run_backtest(base_request(SlTargetMode::Points)).await;

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].exit_reason, ExitReason::TimeBasedForcedExit);
    assert_eq!(result.trades[0].exit_time.time(), NaiveTime::from_hms_opt(15, 10, 0).unwrap());
}

/// Scenario 6: a target-related exit with auto-restart enabled and budget
/// remaining re-enters a fresh cycle; the restart is bounded by
/// `max_auto_restarts` and never crosses the cutoff.
#[tokio::test]
async fn auto_restart_bounded_by_budget_and_cutoff() {
    let ce = vec![
        candle(9, 20, dec!(100)),
        candle(9, 22, dec!(98.5)),
        candle(9, 25, dec!(98.5)),
        candle(15, 10, dec!(98.5)),
    ];
    let pe = vec![
        candle(9, 20, dec!(80)),
        candle(9, 22, dec!(79)),
        candle(9, 25, dec!(79)),
        candle(15, 10, dec!(79)),
    ];
    let svc = service(ce, pe);

    let mut request = base_request(SlTargetMode::Points);
    request.auto_restart_enabled = true;
    request.max_auto_restarts = 1;

    let result = svc.run_backtest(request).await;

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].exit_reason, ExitReason::CumulativeTargetHit);
    assert!(!result.trades[0].was_restarted);
    assert!(result.trades[1].was_restarted);
    assert_eq!(result.restart_count, 1);
}

#[tokio::test]
async fn weekend_request_is_rejected_before_any_data_fetch() {
    let svc = service(vec![], vec![]);
    let mut request = base_request(SlTargetMode::Points);
    request.date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(); // Saturday

    let result = svc.run_backtest(request).await;

    assert_eq!(result.status, BacktestStatus::Failed);
    assert_eq!(result.error_code.as_deref(), Some("INVALID_DATE"));
}

#[tokio::test]
async fn future_dated_request_is_rejected_before_any_data_fetch() {
    let svc = service(vec![], vec![]);
    let mut request = base_request(SlTargetMode::Points);
    request.date = NaiveDate::from_ymd_opt(2099, 1, 5).unwrap(); // decades out, whatever today is

    let result = svc.run_backtest(request).await;

    assert_eq!(result.status, BacktestStatus::Failed);
    assert_eq!(result.error_code.as_deref(), Some("INVALID_DATE"));
}
