use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::BacktestError;
use crate::types::{Instrument, OptionType, Underlying};

/// `round(spot / step) * step`, spec §4.2. Rounds half away from zero, the
/// conventional rounding for strike selection.
pub fn atm_strike(spot: Decimal, underlying: Underlying) -> Decimal {
    let step = underlying.strike_step();
    (spot / step).round() * step
}

/// Locates the single CE and PE instrument matching `(underlying, expiry, strike)`.
/// Fails with `INSTRUMENT_NOT_FOUND` if either leg is missing (spec §4.2).
pub fn resolve_legs<'a>(
    master: &'a [Instrument],
    underlying: Underlying,
    expiry: NaiveDate,
    strike: Decimal,
) -> Result<(&'a Instrument, &'a Instrument), BacktestError> {
    let ce = master
        .iter()
        .find(|i| i.matches(underlying, expiry, strike, OptionType::CE))
        .ok_or_else(|| {
            BacktestError::InstrumentNotFound(format!(
                "CE not found for {underlying} {expiry} strike {strike}"
            ))
        })?;
    let pe = master
        .iter()
        .find(|i| i.matches(underlying, expiry, strike, OptionType::PE))
        .ok_or_else(|| {
            BacktestError::InstrumentNotFound(format!(
                "PE not found for {underlying} {expiry} strike {strike}"
            ))
        })?;
    Ok((ce, pe))
}
