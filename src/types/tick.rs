use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time::IstTimestamp;

/// `(timestamp, ceLtp, peLtp, ceToken, peToken)`, spec §3. Emitted by the
/// merger only once both legs have been observed at least once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedTick {
    pub timestamp: IstTimestamp,
    pub ce_ltp: Decimal,
    pub pe_ltp: Decimal,
    pub ce_token: u64,
    pub pe_token: u64,
}
