use std::collections::HashMap;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use tracing::debug;

use crate::exit::{Decision, ExitContext, ExitStrategy};
use crate::types::{ExitReason, Leg, MergedTick};

/// Owns the monitored legs and the sorted exit chain; processes ticks,
/// fires callbacks, and maintains the trailing-stop high-water mark
/// (implicitly, via the chain's own strategy state) — spec §4.5.
pub struct PositionMonitor {
    legs: Vec<Leg>,
    symbol_index: HashMap<String, usize>,
    chain: Vec<Box<dyn ExitStrategy>>,
    context: ExitContext,
    active: bool,

    pub on_exit_all: Option<Box<dyn Fn(ExitReason) + Send + Sync>>,
    pub on_individual_leg_exit: Option<Box<dyn Fn(&str, ExitReason) + Send + Sync>>,
    pub on_leg_replacement: Option<Box<dyn Fn(&str, ExitReason) + Send + Sync>>,
}

impl PositionMonitor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        execution_id: String,
        direction_multiplier: Decimal,
        cumulative_target_points: Decimal,
        cumulative_stop_points: Decimal,
        entry_premium: Decimal,
        target_decay_pct: Decimal,
        stop_loss_expansion_pct: Decimal,
        chain: Vec<Box<dyn ExitStrategy>>,
    ) -> Self {
        Self {
            legs: Vec::new(),
            symbol_index: HashMap::new(),
            chain,
            context: ExitContext::new(
                execution_id,
                direction_multiplier,
                cumulative_target_points,
                cumulative_stop_points,
                entry_premium,
                target_decay_pct,
                stop_loss_expansion_pct,
            ),
            active: true,
            on_exit_all: None,
            on_individual_leg_exit: None,
            on_leg_replacement: None,
        }
    }

    pub fn add_leg(&mut self, leg: Leg) {
        self.symbol_index.insert(leg.symbol.clone(), self.legs.len());
        self.legs.push(leg);
        self.active = true;
    }

    /// Removes the leg and deactivates the monitor iff no legs remain.
    pub fn remove_leg(&mut self, symbol: &str) {
        if let Some(idx) = self.symbol_index.remove(symbol) {
            self.legs.remove(idx);
            // Re-index: removing shifted every later leg down by one.
            for (_, i) in self.symbol_index.iter_mut() {
                if *i > idx {
                    *i -= 1;
                }
            }
        }
        if self.legs.is_empty() {
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Idempotent deactivation.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn legs_mut(&mut self) -> &mut [Leg] {
        &mut self.legs
    }

    /// Updates matching legs' `current_price`, recomputes `cumulative_pnl`
    /// and `combined_ltp` once, resets the `ExitContext`, traverses the
    /// sorted chain, and acts on the first non-`None` decision.
    pub fn on_tick(&mut self, tick: &MergedTick, tick_time: NaiveTime) -> Decision {
        if !self.active {
            return Decision::None;
        }

        for leg in &mut self.legs {
            if leg.token == tick.ce_token {
                leg.current_price = tick.ce_ltp;
            } else if leg.token == tick.pe_token {
                leg.current_price = tick.pe_ltp;
            }
        }

        self.context.refresh(&self.legs);

        let mut decision = Decision::None;
        for strategy in &mut self.chain {
            let d = strategy.evaluate(&self.context, tick_time);
            if !d.is_none() {
                debug!(strategy = strategy.name(), ?d, "exit strategy fired");
                decision = d;
                break;
            }
        }

        match &decision {
            Decision::None => {}
            Decision::ExitAll(reason) => {
                self.stop();
                if let Some(cb) = &self.on_exit_all {
                    cb(*reason);
                }
            }
            Decision::ExitLeg(symbol, reason) => {
                if let Some(cb) = &self.on_individual_leg_exit {
                    cb(symbol, *reason);
                }
                self.remove_leg(symbol);
            }
            Decision::ReplaceLeg(symbol, reason) => {
                if let Some(cb) = &self.on_leg_replacement {
                    cb(symbol, *reason);
                }
            }
        }

        decision
    }

    pub fn cumulative_pnl(&self) -> Decimal {
        self.context.cumulative_pnl
    }
}
