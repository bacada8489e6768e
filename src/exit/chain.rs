use rust_decimal::Decimal;

use crate::time::default_forced_exit_time;
use crate::types::SlTargetMode;

use super::strategies::{
    ExitStrategy, PointsBasedStopLoss, PointsBasedTarget, PremiumBasedExit, TimeBasedForcedExit, TrailingStopLoss,
};

/// Parameters needed to build the exit chain for one strategy activation.
/// `POINTS` mode installs `{1?, 3, 4?, 5}`; `PREMIUM` mode installs `{1?, 2}`,
/// gated by `forced_exit_enabled`/`trailing_stop_enabled` (spec §4.4).
pub struct ChainParams {
    pub mode: SlTargetMode,
    pub forced_exit_enabled: bool,
    pub trailing_stop_enabled: bool,
    pub cumulative_target_points: Decimal,
    pub cumulative_stop_points: Decimal,
    pub trailing_activation_points: Decimal,
    pub trailing_distance_points: Decimal,
}

/// Builds the chain sorted by ascending priority (stable sort, so equal
/// priorities keep construction order — spec §4.4's ordering guarantee).
pub fn build_chain(params: &ChainParams) -> Vec<Box<dyn ExitStrategy>> {
    let mut chain: Vec<Box<dyn ExitStrategy>> = Vec::new();

    if params.forced_exit_enabled {
        chain.push(Box::new(TimeBasedForcedExit { forced_exit_time: default_forced_exit_time() }));
    }

    match params.mode {
        SlTargetMode::Points => {
            chain.push(Box::new(PointsBasedTarget));
            if params.trailing_stop_enabled {
                chain.push(Box::new(TrailingStopLoss::new(
                    params.trailing_activation_points,
                    params.trailing_distance_points,
                )));
            }
            chain.push(Box::new(PointsBasedStopLoss));
        }
        SlTargetMode::Premium => {
            chain.push(Box::new(PremiumBasedExit));
        }
    }

    chain.sort_by_key(|s| s.priority());
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn params(mode: SlTargetMode) -> ChainParams {
        ChainParams {
            mode,
            forced_exit_enabled: true,
            trailing_stop_enabled: true,
            cumulative_target_points: dec!(2),
            cumulative_stop_points: dec!(3),
            trailing_activation_points: dec!(1),
            trailing_distance_points: dec!(0.5),
        }
    }

    #[test]
    fn points_mode_chain_is_priority_sorted() {
        let chain = build_chain(&params(SlTargetMode::Points));
        let priorities: Vec<i32> = chain.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![0, 100, 300, 400]);
    }

    #[test]
    fn premium_mode_chain_installs_only_premium_and_forced_exit() {
        let chain = build_chain(&params(SlTargetMode::Premium));
        let priorities: Vec<i32> = chain.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![0, 50]);
    }

    #[test]
    fn disabling_gates_drops_optional_strategies() {
        let mut p = params(SlTargetMode::Points);
        p.forced_exit_enabled = false;
        p.trailing_stop_enabled = false;
        let chain = build_chain(&p);
        let priorities: Vec<i32> = chain.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![100, 400]);
    }
}
