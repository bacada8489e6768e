use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

/// India Standard Time, UTC+05:30. Candles lacking an explicit offset are
/// interpreted as IST per spec §6.
pub fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("IST offset is a valid fixed offset")
}

pub type IstTimestamp = DateTime<FixedOffset>;

/// Builds a minute-aligned IST timestamp for `date` at `time`.
pub fn ist_timestamp(date: NaiveDate, time: NaiveTime) -> IstTimestamp {
    date.and_time(time)
        .and_local_timezone(ist_offset())
        .single()
        .expect("naive datetime is unambiguous under a fixed offset")
}

pub fn default_forced_exit_time() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 10, 0).unwrap()
}

pub fn default_auto_square_off_time() -> NaiveTime {
    default_forced_exit_time()
}

/// Weekends have no trading session; used by request validation (`INVALID_DATE`).
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The current instant, expressed in IST. Mirrors the source bot's
/// `chrono::Utc::now()` idiom, wall-clock time read at the call site.
pub fn now_ist() -> IstTimestamp {
    Utc::now().with_timezone(&ist_offset())
}

/// Today's calendar date in IST; used by request validation to reject dates
/// in the future (`INVALID_DATE`).
pub fn today_ist() -> NaiveDate {
    now_ist().date_naive()
}
