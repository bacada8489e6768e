use rust_decimal::Decimal;

use crate::types::Leg;

/// Per-tick reusable snapshot (spec §3, §4.3). Allocated once per strategy
/// activation and mutated in place on every tick — the hot path never
/// allocates a new `Vec`/`HashMap`.
pub struct ExitContext {
    pub execution_id: String,
    pub direction_multiplier: Decimal,
    pub cumulative_target_points: Decimal,
    pub cumulative_stop_points: Decimal,
    pub entry_premium: Decimal,
    pub target_premium_level: Decimal,
    pub stop_loss_premium_level: Decimal,
    pub legs: Vec<Leg>,
    pub cumulative_pnl: Decimal,
    pub combined_ltp: Decimal,
}

impl ExitContext {
    pub fn new(
        execution_id: String,
        direction_multiplier: Decimal,
        cumulative_target_points: Decimal,
        cumulative_stop_points: Decimal,
        entry_premium: Decimal,
        target_decay_pct: Decimal,
        stop_loss_expansion_pct: Decimal,
    ) -> Self {
        Self {
            execution_id,
            direction_multiplier,
            cumulative_target_points,
            cumulative_stop_points,
            entry_premium,
            // computed once at entry, spec §3 invariants
            target_premium_level: entry_premium * (Decimal::ONE - target_decay_pct),
            stop_loss_premium_level: entry_premium * (Decimal::ONE + stop_loss_expansion_pct),
            legs: Vec::new(),
            cumulative_pnl: Decimal::ZERO,
            combined_ltp: Decimal::ZERO,
        }
    }

    /// Reset the computed, per-tick fields and recompute them from `legs` in
    /// one pass (spec §4.3, §3 "computed once per tick").
    pub fn refresh(&mut self, legs: &[Leg]) {
        self.legs.clear();
        self.legs.extend_from_slice(legs);

        let mut pnl = Decimal::ZERO;
        let mut combined = Decimal::ZERO;
        for leg in &self.legs {
            pnl += leg.pnl_points(self.direction_multiplier);
            combined += leg.current_price;
        }
        self.cumulative_pnl = pnl;
        self.combined_ltp = combined;
    }
}
