use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OptionType, TransactionType};

/// `(symbol, token, optionType, transactionType, entryPrice, quantity, currentPrice)`,
/// spec §3 — the simulated broker fill recorded for a leg at entry. Hot-path
/// price tracking happens on the lighter [`Leg`] the monitor owns instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedPosition {
    pub symbol: String,
    pub token: u64,
    pub option_type: OptionType,
    pub transaction_type: TransactionType,
    pub entry_price: Decimal,
    pub quantity: u32,
    pub current_price: Decimal,
}

impl SimulatedPosition {
    pub fn new(
        symbol: String,
        token: u64,
        option_type: OptionType,
        transaction_type: TransactionType,
        entry_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            symbol,
            token,
            option_type,
            transaction_type,
            entry_price,
            quantity,
            current_price: entry_price,
        }
    }
}

/// A monitored leg inside a [`crate::monitor::PositionMonitor`]. Created at
/// entry, mutated by tick updates, removed on individual-leg exit or on
/// strategy-wide exit (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub order_id: String,
    pub symbol: String,
    pub token: u64,
    pub entry_price: Decimal,
    pub quantity: u32,
    pub option_type: OptionType,
    pub current_price: Decimal,
}

impl Leg {
    pub fn new(
        order_id: String,
        symbol: String,
        token: u64,
        entry_price: Decimal,
        quantity: u32,
        option_type: OptionType,
    ) -> Self {
        Self {
            order_id,
            symbol,
            token,
            entry_price,
            quantity,
            option_type,
            current_price: entry_price,
        }
    }

    pub fn pnl_points(&self, direction_multiplier: Decimal) -> Decimal {
        (self.current_price - self.entry_price) * direction_multiplier
    }
}
