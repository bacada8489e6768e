use chrono::NaiveTime;
use rust_decimal::Decimal;

use crate::types::ExitReason;

use super::context::ExitContext;

/// `{None, ExitAll(reason), ExitLeg(symbol, reason), ReplaceLeg(symbol, reason)}`,
/// spec §4.4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    None,
    ExitAll(ExitReason),
    ExitLeg(String, ExitReason),
    ReplaceLeg(String, ExitReason),
}

impl Decision {
    pub fn is_none(&self) -> bool {
        matches!(self, Decision::None)
    }
}

/// `(priority, name, evaluate)`. `&mut self` because trailing-stop state is
/// per-activation (spec §4.4).
pub trait ExitStrategy: Send + Sync {
    fn priority(&self) -> i32;
    fn name(&self) -> &'static str;
    fn evaluate(&mut self, ctx: &ExitContext, tick_time: NaiveTime) -> Decision;
}

/// Priority 0. `tickTime >= forcedExitTime` (default 15:10 IST).
pub struct TimeBasedForcedExit {
    pub forced_exit_time: NaiveTime,
}

impl ExitStrategy for TimeBasedForcedExit {
    fn priority(&self) -> i32 {
        0
    }
    fn name(&self) -> &'static str {
        "TimeBasedForcedExit"
    }
    fn evaluate(&mut self, _ctx: &ExitContext, tick_time: NaiveTime) -> Decision {
        if tick_time >= self.forced_exit_time {
            Decision::ExitAll(ExitReason::TimeBasedForcedExit)
        } else {
            Decision::None
        }
    }
}

/// Priority 50. Percentage/"premium" mode.
pub struct PremiumBasedExit;

impl ExitStrategy for PremiumBasedExit {
    fn priority(&self) -> i32 {
        50
    }
    fn name(&self) -> &'static str {
        "PremiumBasedExit"
    }
    fn evaluate(&mut self, ctx: &ExitContext, _tick_time: NaiveTime) -> Decision {
        if ctx.entry_premium <= Decimal::ZERO {
            return Decision::None;
        }
        if ctx.combined_ltp <= ctx.target_premium_level {
            Decision::ExitAll(ExitReason::PremiumDecayTargetHit)
        } else if ctx.combined_ltp >= ctx.stop_loss_premium_level {
            Decision::ExitAll(ExitReason::PremiumExpansionSlHit)
        } else {
            Decision::None
        }
    }
}

/// Priority 100.
pub struct PointsBasedTarget;

impl ExitStrategy for PointsBasedTarget {
    fn priority(&self) -> i32 {
        100
    }
    fn name(&self) -> &'static str {
        "PointsBasedTarget"
    }
    fn evaluate(&mut self, ctx: &ExitContext, _tick_time: NaiveTime) -> Decision {
        if ctx.cumulative_pnl >= ctx.cumulative_target_points {
            Decision::ExitAll(ExitReason::CumulativeTargetHit)
        } else {
            Decision::None
        }
    }
}

/// Priority 300. Strategy-local, non-decreasing high-water mark, reset per
/// activation by constructing a fresh instance.
pub struct TrailingStopLoss {
    pub activation_points: Decimal,
    pub distance_points: Decimal,
    high_water_mark: Decimal,
    active: bool,
}

impl TrailingStopLoss {
    pub fn new(activation_points: Decimal, distance_points: Decimal) -> Self {
        Self {
            activation_points,
            distance_points,
            high_water_mark: Decimal::ZERO,
            active: false,
        }
    }
}

impl ExitStrategy for TrailingStopLoss {
    fn priority(&self) -> i32 {
        300
    }
    fn name(&self) -> &'static str {
        "TrailingStopLoss"
    }
    fn evaluate(&mut self, ctx: &ExitContext, _tick_time: NaiveTime) -> Decision {
        self.high_water_mark = self.high_water_mark.max(ctx.cumulative_pnl);
        if !self.active && self.high_water_mark >= self.activation_points {
            self.active = true;
        }
        if self.active && ctx.cumulative_pnl <= self.high_water_mark - self.distance_points {
            Decision::ExitAll(ExitReason::TrailingStopHit)
        } else {
            Decision::None
        }
    }
}

/// Priority 400.
pub struct PointsBasedStopLoss;

impl ExitStrategy for PointsBasedStopLoss {
    fn priority(&self) -> i32 {
        400
    }
    fn name(&self) -> &'static str {
        "PointsBasedStopLoss"
    }
    fn evaluate(&mut self, ctx: &ExitContext, _tick_time: NaiveTime) -> Decision {
        if ctx.cumulative_pnl <= -ctx.cumulative_stop_points {
            Decision::ExitAll(ExitReason::CumulativeStoplossHit)
        } else {
            Decision::None
        }
    }
}
