#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use time::OffsetDateTime;

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration,
            Err(_) => return 0,
        };

        i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: AtomicI64,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// UTC calendar year containing `ts_ms`. Out-of-range instants clamp to the
/// nearest representable year.
pub fn calendar_year(ts_ms: i64) -> i32 {
    let nanos = i128::from(ts_ms) * 1_000_000;
    match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
        Ok(dt) => dt.year(),
        Err(_) if ts_ms < 0 => time::Date::MIN.year(),
        Err(_) => time::Date::MAX.year(),
    }
}

/// Epoch milliseconds of `year-month-day 00:00:00 UTC`. Returns `None` for
/// invalid dates.
pub fn date_ms(year: i32, month: u8, day: u8) -> Option<i64> {
    let month = time::Month::try_from(month).ok()?;
    let date = time::Date::from_calendar_date(year, month, day).ok()?;
    let dt = date.midnight().assume_utc();
    i64::try_from(dt.unix_timestamp_nanos() / 1_000_000).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_year_tracks_utc_boundaries() {
        let new_year = date_ms(2024, 1, 1).unwrap();
        assert_eq!(calendar_year(new_year), 2024);
        assert_eq!(calendar_year(new_year - 1), 2023);
        assert_eq!(calendar_year(0), 1970);
    }

    #[test]
    fn fixed_clock_can_be_moved() {
        let clock = FixedClock::new(10);
        assert_eq!(clock.now_ms(), 10);
        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn date_ms_rejects_invalid_dates() {
        assert!(date_ms(2024, 2, 30).is_none());
        assert!(date_ms(2024, 13, 1).is_none());
        assert_eq!(date_ms(1970, 1, 1), Some(0));
    }
}
