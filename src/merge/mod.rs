use std::collections::BTreeMap;

use crate::time::IstTimestamp;
use crate::types::{Candle, MergedTick};

/// Fuses a CE and PE candle stream into one chronological tick feed with
/// last-known-price carry-forward (spec §4.1).
///
/// Algorithm: index both streams by timestamp (last value wins on duplicate
/// timestamps within a single stream, matching insertion order), sweep the
/// union of timestamps ascending while tracking `last_ce`/`last_pe`, and emit
/// a tick only once both legs have been observed at least once.
pub fn merge_ticks(ce: &[Candle], ce_token: u64, pe: &[Candle], pe_token: u64) -> Vec<MergedTick> {
    if ce.is_empty() && pe.is_empty() {
        return Vec::new();
    }

    let mut ce_by_ts: BTreeMap<IstTimestamp, Candle> = BTreeMap::new();
    for c in ce {
        ce_by_ts.insert(c.timestamp, *c);
    }
    let mut pe_by_ts: BTreeMap<IstTimestamp, Candle> = BTreeMap::new();
    for c in pe {
        pe_by_ts.insert(c.timestamp, *c);
    }

    let mut timestamps: Vec<IstTimestamp> = ce_by_ts.keys().chain(pe_by_ts.keys()).copied().collect();
    timestamps.sort();
    timestamps.dedup();

    let mut ticks = Vec::with_capacity(timestamps.len());
    let mut last_ce: Option<Candle> = None;
    let mut last_pe: Option<Candle> = None;

    for ts in timestamps {
        if let Some(c) = ce_by_ts.get(&ts) {
            last_ce = Some(*c);
        }
        if let Some(c) = pe_by_ts.get(&ts) {
            last_pe = Some(*c);
        }

        if let (Some(ce_candle), Some(pe_candle)) = (last_ce, last_pe) {
            ticks.push(MergedTick {
                timestamp: ts,
                ce_ltp: ce_candle.close,
                pe_ltp: pe_candle.close,
                ce_token,
                pe_token,
            });
        }
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ist_timestamp;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    fn ts(h: u32, m: u32) -> IstTimestamp {
        ist_timestamp(NaiveDate::from_ymd_opt(2026, 7, 27).unwrap(), NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn candle(h: u32, m: u32, close: rust_decimal::Decimal) -> Candle {
        Candle::new(ts(h, m), close, close, close, close, dec!(1))
    }

    #[test]
    fn empty_union_yields_empty_output() {
        assert!(merge_ticks(&[], 1, &[], 2).is_empty());
    }

    #[test]
    fn no_tick_before_both_legs_observed() {
        let ce = vec![candle(9, 15, dec!(100)), candle(9, 16, dec!(101))];
        let pe = vec![candle(9, 16, dec!(80))];
        let ticks = merge_ticks(&ce, 1, &pe, 2);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].timestamp, ts(9, 16));
    }

    #[test]
    fn carry_forward_holds_last_known_price() {
        let ce = vec![candle(9, 15, dec!(100)), candle(9, 17, dec!(102))];
        let pe = vec![candle(9, 15, dec!(80)), candle(9, 16, dec!(81))];
        let ticks = merge_ticks(&ce, 1, &pe, 2);
        assert_eq!(ticks.len(), 3);
        // at 9:16 CE has no new candle; carries forward 100
        assert_eq!(ticks[1].timestamp, ts(9, 16));
        assert_eq!(ticks[1].ce_ltp, dec!(100));
        assert_eq!(ticks[1].pe_ltp, dec!(81));
        // at 9:17 PE carries forward 81
        assert_eq!(ticks[2].ce_ltp, dec!(102));
        assert_eq!(ticks[2].pe_ltp, dec!(81));
    }

    #[test]
    fn timestamps_are_strictly_non_decreasing() {
        let ce = vec![candle(9, 15, dec!(100)), candle(9, 16, dec!(101)), candle(9, 17, dec!(99))];
        let pe = vec![candle(9, 15, dec!(80)), candle(9, 16, dec!(82)), candle(9, 17, dec!(79))];
        let ticks = merge_ticks(&ce, 1, &pe, 2);
        for w in ticks.windows(2) {
            assert!(w[0].timestamp <= w[1].timestamp);
        }
    }

    #[test]
    fn duplicate_timestamp_in_one_stream_last_wins() {
        let ce = vec![candle(9, 15, dec!(100)), candle(9, 15, dec!(105))];
        let pe = vec![candle(9, 15, dec!(80))];
        let ticks = merge_ticks(&ce, 1, &pe, 2);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].ce_ltp, dec!(105));
    }
}
