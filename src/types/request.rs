use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time::default_auto_square_off_time;

use super::{SlTargetMode, StrategyType, Underlying};

/// Closed, enumerated request record — the core never inspects untyped maps
/// (spec §9, "dynamic typing removal"). Defaults are populated at parse time
/// via `#[serde(default = "...")]`, matching spec §6's default table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub strategy_type: StrategyType,
    pub instrument_type: Underlying,
    pub expiry_date: NaiveDate,
    pub date: NaiveDate,
    pub lots: u32,

    #[serde(default = "default_sl_target_mode")]
    pub sl_target_mode: SlTargetMode,

    #[serde(default = "default_stop_loss_points")]
    pub stop_loss_points: Decimal,
    #[serde(default = "default_target_points")]
    pub target_points: Decimal,
    #[serde(default = "default_target_decay_pct")]
    pub target_decay_pct: Decimal,
    #[serde(default = "default_stop_loss_expansion_pct")]
    pub stop_loss_expansion_pct: Decimal,

    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_auto_square_off_time")]
    pub auto_square_off_time: NaiveTime,
    #[serde(default = "default_candle_interval")]
    pub candle_interval: String,

    #[serde(default)]
    pub auto_restart_enabled: bool,
    #[serde(default)]
    pub max_auto_restarts: u32,

    #[serde(default)]
    pub trailing_stop_enabled: bool,
    #[serde(default)]
    pub trailing_activation_points: Decimal,
    #[serde(default)]
    pub trailing_distance_points: Decimal,

    #[serde(default = "default_forced_exit_enabled")]
    pub forced_exit_enabled: bool,
}

fn default_sl_target_mode() -> SlTargetMode {
    SlTargetMode::Points
}
fn default_stop_loss_points() -> Decimal {
    dec!(4.0)
}
fn default_target_points() -> Decimal {
    dec!(2.5)
}
fn default_target_decay_pct() -> Decimal {
    dec!(0.05)
}
fn default_stop_loss_expansion_pct() -> Decimal {
    dec!(0.10)
}
fn default_candle_interval() -> String {
    "minute".to_string()
}
fn default_forced_exit_enabled() -> bool {
    true
}
