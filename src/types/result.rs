use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time::IstTimestamp;

use super::{BacktestStatus, ExitReason, StrategyType, Underlying};

/// One completed trading cycle (spec §3 "Trade record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegDetail {
    pub symbol: String,
    pub option_type: super::OptionType,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: IstTimestamp,
    pub exit_time: IstTimestamp,
    pub strike: Decimal,
    pub legs: Vec<LegDetail>,
    pub combined_entry_premium: Decimal,
    pub pnl_points: Decimal,
    pub pnl_amount: Decimal,
    pub exit_reason: ExitReason,
    pub was_restarted: bool,
}

/// Single pass totals produced by the aggregator (spec §4.7).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Totals {
    pub pnl_points: Decimal,
    pub pnl_amount: Decimal,
    pub wins: u32,
    pub losses: u32,
    pub win_rate_pct: Decimal,
    pub max_drawdown_pct: Decimal,
    pub max_profit_pct: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub profit_factor: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub id: String,
    pub date: chrono::NaiveDate,
    pub strategy_type: StrategyType,
    pub instrument: Underlying,
    pub status: BacktestStatus,
    pub trades: Vec<Trade>,
    pub totals: Totals,
    pub restart_count: u32,
    pub execution_duration_ms: u64,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl BacktestResult {
    pub fn completed(
        id: String,
        date: chrono::NaiveDate,
        strategy_type: StrategyType,
        instrument: Underlying,
        trades: Vec<Trade>,
        totals: Totals,
        restart_count: u32,
        execution_duration_ms: u64,
    ) -> Self {
        Self {
            id,
            date,
            strategy_type,
            instrument,
            status: BacktestStatus::Completed,
            trades,
            totals,
            restart_count,
            execution_duration_ms,
            error_code: None,
            error_message: None,
        }
    }

    pub fn failed(
        id: String,
        date: chrono::NaiveDate,
        strategy_type: StrategyType,
        instrument: Underlying,
        error: &crate::error::BacktestError,
        execution_duration_ms: u64,
    ) -> Self {
        Self {
            id,
            date,
            strategy_type,
            instrument,
            status: BacktestStatus::Failed,
            trades: Vec::new(),
            totals: Totals::default(),
            restart_count: 0,
            execution_duration_ms,
            error_code: Some(error.code().to_string()),
            error_message: Some(error.to_string()),
        }
    }
}
