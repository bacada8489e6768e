use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::adapters::HistoricalDataProvider;
use crate::error::BacktestError;
use crate::exit::{build_chain, ChainParams, Decision};
use crate::merge::merge_ticks;
use crate::monitor::PositionMonitor;
use crate::strike::{atm_strike, resolve_legs};
use crate::time::{ist_timestamp, IstTimestamp};
use crate::types::{BacktestRequest, Candle, CandleSeries, Instrument, Leg, LegDetail, OptionType, SimulatedPosition, Trade};

/// Entry → monitor → exit → restart loop (spec §4.6). One call produces the
/// ordered list of trades for a single request; the loop re-enters only on a
/// target-related exit while auto-restart is enabled and the restart budget
/// and session cutoff both still allow it.
pub async fn run(
    request: &BacktestRequest,
    index_candles: &[Candle],
    master: &[Instrument],
    lot_size: u32,
    historical: &dyn HistoricalDataProvider,
) -> Result<Vec<Trade>, BacktestError> {
    let auto_square_off_ts = ist_timestamp(request.date, request.auto_square_off_time);
    let quantity = request.lots * lot_size;
    let direction_multiplier = request.strategy_type.transaction_type().direction_multiplier();

    let index_series = CandleSeries::new(index_candles.to_vec());
    let mut trades = Vec::new();
    let mut restart_count = 0u32;
    let mut was_restarted = false;
    let mut search_from = ist_timestamp(request.date, request.start_time);
    let mut inclusive = true;

    loop {
        let entry_candle = match find_entry_candle(&index_series, search_from, inclusive) {
            Some(c) => c,
            None => break,
        };
        if entry_candle.timestamp >= auto_square_off_ts {
            break;
        }

        // A cycle's own failure discards only that cycle; trades already
        // collected from earlier, completed restart iterations are kept.
        let trade = match run_cycle(
            request,
            &entry_candle,
            master,
            quantity,
            direction_multiplier,
            auto_square_off_ts,
            was_restarted,
            historical,
        )
        .await
        {
            Ok(trade) => trade,
            Err(err) if trades.is_empty() => return Err(err),
            Err(_) => break,
        };

        let exit_time = trade.exit_time;
        let exit_reason = trade.exit_reason;
        trades.push(trade);

        let restart_allowed = request.auto_restart_enabled
            && restart_count < request.max_auto_restarts
            && exit_reason.is_target_related()
            && exit_time < auto_square_off_ts;

        if !restart_allowed {
            break;
        }

        restart_count += 1;
        was_restarted = true;
        search_from = exit_time;
        inclusive = false;
    }

    Ok(trades)
}

fn find_entry_candle(index_series: &CandleSeries, from: IstTimestamp, inclusive: bool) -> Option<Candle> {
    if inclusive { index_series.first_at_or_after(from).copied() } else { index_series.first_after(from).copied() }
}

#[allow(clippy::too_many_arguments)]
async fn run_cycle(
    request: &BacktestRequest,
    entry_candle: &Candle,
    master: &[Instrument],
    quantity: u32,
    direction_multiplier: Decimal,
    auto_square_off_ts: IstTimestamp,
    was_restarted: bool,
    historical: &dyn HistoricalDataProvider,
) -> Result<Trade, BacktestError> {
    let spot = entry_candle.close;
    let strike = atm_strike(spot, request.instrument_type);
    let (ce_instrument, pe_instrument) = resolve_legs(master, request.instrument_type, request.expiry_date, strike)?;

    let ce_candles = historical
        .fetch_option_candles(
            request.instrument_type,
            strike,
            OptionType::CE,
            request.expiry_date,
            request.date,
            &request.candle_interval,
        )
        .await
        .map_err(|e| BacktestError::from_data_fetch(&e))?;
    let pe_candles = historical
        .fetch_option_candles(
            request.instrument_type,
            strike,
            OptionType::PE,
            request.expiry_date,
            request.date,
            &request.candle_interval,
        )
        .await
        .map_err(|e| BacktestError::from_data_fetch(&e))?;

    let ticks = merge_ticks(&ce_candles, ce_instrument.token, &pe_candles, pe_instrument.token);
    let entry_tick = *ticks
        .iter()
        .find(|t| t.timestamp >= entry_candle.timestamp)
        .ok_or_else(|| BacktestError::SimulationError(format!("no merged tick at or after entry time {}", entry_candle.timestamp)))?;

    let entry_premium = entry_tick.ce_ltp + entry_tick.pe_ltp;

    let chain = build_chain(&ChainParams {
        mode: request.sl_target_mode,
        forced_exit_enabled: request.forced_exit_enabled,
        trailing_stop_enabled: request.trailing_stop_enabled,
        cumulative_target_points: request.target_points,
        cumulative_stop_points: request.stop_loss_points,
        trailing_activation_points: request.trailing_activation_points,
        trailing_distance_points: request.trailing_distance_points,
    });

    // Simulate the broker fill for each leg first — this is the order the
    // transaction type and entry price would be recorded at a real broker —
    // then hand the monitor the reduced per-tick representation it needs.
    let transaction_type = request.strategy_type.transaction_type();
    let ce_position = SimulatedPosition::new(
        ce_instrument.trading_symbol.clone(),
        ce_instrument.token,
        OptionType::CE,
        transaction_type,
        entry_tick.ce_ltp,
        quantity,
    );
    let pe_position = SimulatedPosition::new(
        pe_instrument.trading_symbol.clone(),
        pe_instrument.token,
        OptionType::PE,
        transaction_type,
        entry_tick.pe_ltp,
        quantity,
    );
    debug!(ce = %ce_position.symbol, pe = %pe_position.symbol, strike = %strike, "simulated entry fill");

    let mut monitor = PositionMonitor::new(
        Uuid::new_v4().to_string(),
        direction_multiplier,
        request.target_points,
        request.stop_loss_points,
        entry_premium,
        request.target_decay_pct,
        request.stop_loss_expansion_pct,
        chain,
    );
    monitor.add_leg(Leg::new(
        Uuid::new_v4().to_string(),
        ce_position.symbol.clone(),
        ce_position.token,
        ce_position.entry_price,
        ce_position.quantity,
        ce_position.option_type,
    ));
    monitor.add_leg(Leg::new(
        Uuid::new_v4().to_string(),
        pe_position.symbol.clone(),
        pe_position.token,
        pe_position.entry_price,
        pe_position.quantity,
        pe_position.option_type,
    ));

    let mut exit_reason = None;
    let mut exit_tick = entry_tick;

    for tick in ticks.iter().filter(|t| t.timestamp >= entry_tick.timestamp && t.timestamp <= auto_square_off_ts) {
        let decision = monitor.on_tick(tick, tick.timestamp.time());
        exit_tick = *tick;
        if let Decision::ExitAll(reason) = decision {
            exit_reason = Some(reason);
            break;
        }
    }

    // Data ran out (or the feed never reached the cutoff tick) before any
    // strategy fired: force a square-off using the last observed prices.
    let reason = exit_reason.unwrap_or_else(|| {
        monitor.stop();
        crate::types::ExitReason::TimeBasedForcedExit
    });

    let pnl_points = monitor.cumulative_pnl();
    let pnl_amount = pnl_points * Decimal::from(quantity);

    let legs: Vec<LegDetail> = monitor
        .legs()
        .iter()
        .map(|l| LegDetail {
            symbol: l.symbol.clone(),
            option_type: l.option_type,
            entry_price: l.entry_price,
            exit_price: l.current_price,
            quantity: l.quantity,
        })
        .collect();

    Ok(Trade {
        entry_time: entry_tick.timestamp,
        exit_time: exit_tick.timestamp,
        strike,
        legs,
        combined_entry_premium: entry_premium,
        pnl_points,
        pnl_amount,
        exit_reason: reason,
        was_restarted,
    })
}
