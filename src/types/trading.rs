#![allow(dead_code)]
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index underlyings the resolver knows the ATM step for (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Underlying {
    NIFTY,
    BANKNIFTY,
    FINNIFTY,
}

impl Underlying {
    pub fn as_str(&self) -> &'static str {
        match self {
            Underlying::NIFTY => "NIFTY",
            Underlying::BANKNIFTY => "BANKNIFTY",
            Underlying::FINNIFTY => "FINNIFTY",
        }
    }

    /// ATM strike step, per spec §4.2: 50 for NIFTY/FINNIFTY, 100 for BANKNIFTY.
    pub fn strike_step(&self) -> Decimal {
        match self {
            Underlying::NIFTY | Underlying::FINNIFTY => dec!(50),
            Underlying::BANKNIFTY => dec!(100),
        }
    }

    pub fn default_lot_size(&self) -> u32 {
        match self {
            Underlying::NIFTY => 50,
            Underlying::BANKNIFTY => 15,
            Underlying::FINNIFTY => 40,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NIFTY" => Some(Underlying::NIFTY),
            "BANKNIFTY" => Some(Underlying::BANKNIFTY),
            "FINNIFTY" => Some(Underlying::FINNIFTY),
            _ => None,
        }
    }
}

impl fmt::Display for Underlying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    CE,
    PE,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::CE => "CE",
            OptionType::PE => "PE",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    /// Direction multiplier per spec §3: -1 for SHORT (SELL), +1 for LONG (BUY).
    pub fn direction_multiplier(&self) -> Decimal {
        match self {
            TransactionType::Buy => Decimal::ONE,
            TransactionType::Sell => -Decimal::ONE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    AtmStraddle,
    SellAtmStraddle,
}

impl StrategyType {
    /// ATM_STRADDLE is a LONG (BUY) straddle; SELL_ATM_STRADDLE is SHORT (SELL).
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            StrategyType::AtmStraddle => TransactionType::Buy,
            StrategyType::SellAtmStraddle => TransactionType::Sell,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::AtmStraddle => "ATM_STRADDLE",
            StrategyType::SellAtmStraddle => "SELL_ATM_STRADDLE",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exit-threshold regime (spec §4.4 mode selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlTargetMode {
    Points,
    Premium,
}

/// Bit-exact exit-reason vocabulary, spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    TimeBasedForcedExit,
    PremiumDecayTargetHit,
    PremiumExpansionSlHit,
    CumulativeTargetHit,
    CumulativeStoplossHit,
    TrailingStopHit,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::TimeBasedForcedExit => "TIME_BASED_FORCED_EXIT",
            ExitReason::PremiumDecayTargetHit => "PREMIUM_DECAY_TARGET_HIT",
            ExitReason::PremiumExpansionSlHit => "PREMIUM_EXPANSION_SL_HIT",
            ExitReason::CumulativeTargetHit => "CUMULATIVE_TARGET_HIT",
            ExitReason::CumulativeStoplossHit => "CUMULATIVE_STOPLOSS_HIT",
            ExitReason::TrailingStopHit => "TRAILING_STOP_HIT",
        }
    }

    /// Target-related reasons are the ones that license an auto-restart (spec §4.6 step 6).
    pub fn is_target_related(&self) -> bool {
        matches!(self, ExitReason::CumulativeTargetHit | ExitReason::PremiumDecayTargetHit)
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BacktestStatus {
    Running,
    Completed,
    Failed,
}
