use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Totals, Trade};

fn round2(d: Decimal) -> Decimal {
    d.round_dp(2)
}

/// Single-pass totals over a completed trade list (spec §4.7). `pnl_points`
/// and `pnl_amount` stay at full precision; every other metric is rounded to
/// 2 decimals for display.
pub fn aggregate(trades: &[Trade]) -> Totals {
    let total = trades.len() as u32;

    let mut pnl_points = Decimal::ZERO;
    let mut pnl_amount = Decimal::ZERO;
    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut win_amount = Decimal::ZERO;
    let mut loss_amount = Decimal::ZERO;

    for trade in trades {
        pnl_points += trade.pnl_points;
        pnl_amount += trade.pnl_amount;
        if trade.pnl_amount >= Decimal::ZERO {
            wins += 1;
            win_amount += trade.pnl_amount;
        } else {
            losses += 1;
            loss_amount += trade.pnl_amount.abs();
        }
    }

    let win_rate_pct = if total > 0 {
        Decimal::from(wins) / Decimal::from(total) * dec!(100)
    } else {
        Decimal::ZERO
    };

    let avg_win = if wins > 0 { win_amount / Decimal::from(wins) } else { Decimal::ZERO };
    let avg_loss = if losses > 0 { loss_amount / Decimal::from(losses) } else { Decimal::ZERO };

    let profit_factor = if !loss_amount.is_zero() {
        win_amount / loss_amount
    } else if win_amount > Decimal::ZERO {
        dec!(999.99)
    } else {
        Decimal::ZERO
    };

    // Rolling running/peak P&L over the trade sequence, for drawdown and max profit.
    let mut running = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_drawdown_pct = Decimal::ZERO;
    for trade in trades {
        running += trade.pnl_amount;
        if running > peak {
            peak = running;
        }
        if peak > Decimal::ZERO {
            let drawdown = (peak - running) / peak * dec!(100);
            if drawdown > max_drawdown_pct {
                max_drawdown_pct = drawdown;
            }
        }
    }
    let max_profit = peak;

    let max_profit_pct = match trades.first() {
        Some(first) => {
            let quantity = first.legs.first().map(|l| Decimal::from(l.quantity)).unwrap_or(Decimal::ZERO);
            let notional = first.combined_entry_premium * quantity;
            if !notional.is_zero() {
                (max_profit / notional) * dec!(100)
            } else {
                Decimal::ZERO
            }
        }
        None => Decimal::ZERO,
    };

    Totals {
        pnl_points,
        pnl_amount,
        wins,
        losses,
        win_rate_pct: round2(win_rate_pct),
        max_drawdown_pct: round2(max_drawdown_pct),
        max_profit_pct: round2(max_profit_pct),
        avg_win: round2(avg_win),
        avg_loss: round2(avg_loss),
        profit_factor: round2(profit_factor),
    }
}
