use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OptionType, Underlying};

/// Immutable NFO instrument record (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub trading_symbol: String,
    pub token: u64,
    pub underlying: Underlying,
    pub expiry: NaiveDate,
    pub strike: Decimal,
    pub option_type: OptionType,
    pub lot_size: u32,
}

impl Instrument {
    pub fn matches(&self, underlying: Underlying, expiry: NaiveDate, strike: Decimal, option_type: OptionType) -> bool {
        self.underlying == underlying
            && self.expiry == expiry
            && self.strike == strike
            && self.option_type == option_type
    }
}
