//! Business-timezone time helpers
//!
//! Timestamps persist as `i64` Unix millis; all calendar and hour-of-day
//! logic evaluates in the configured business timezone. Date windows span
//! 00:00:00 through 23:59:59; the end bound is inclusive, so range
//! filters pair it with `<=`.

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD).
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}

/// Date + hour/min/sec in the business timezone -> Unix millis.
///
/// DST gap fallback: if the local instant does not exist, fall back to UTC.
fn date_hms_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date
        .and_hms_opt(hour, min, sec)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Full-day window for a calendar date: (00:00:00, 23:59:59), both in
/// Unix millis in the business timezone. The end is inclusive.
pub fn day_bounds_millis(date: NaiveDate, tz: Tz) -> (i64, i64) {
    (
        date_hms_millis(date, 0, 0, 0, tz),
        date_hms_millis(date, 23, 59, 59, tz),
    )
}

/// Hour-of-day (0..=23) of a millis timestamp in the business timezone.
///
/// Out-of-range timestamps yield `None`.
pub fn local_hour(millis: i64, tz: Tz) -> Option<u32> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz).hour())
}

/// Render a millis timestamp as a local datetime string for error messages.
pub fn format_local(millis: i64, tz: Tz) -> String {
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => format!("<invalid millis {}>", millis),
    }
}

/// Today's calendar date in the business timezone.
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Parse a fire-time string (HH:MM); falls back to 23:00 on parse failure.
pub fn parse_fire_time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse rollup fire time '{}': {}, falling back to 23:00",
            value,
            e
        );
        NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    #[test]
    fn day_bounds_cover_the_whole_day_inclusive() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let (start, end) = day_bounds_millis(date, UTC);
        // 23:59:59 minus 00:00:00 is 86399 seconds
        assert_eq!(end - start, 86_399_000);

        let last_second = UTC
            .with_ymd_and_hms(2026, 3, 14, 23, 59, 59)
            .unwrap()
            .timestamp_millis();
        assert!(last_second <= end);
    }

    #[test]
    fn local_hour_respects_timezone() {
        // 2026-03-14 10:30 UTC is 11:30 in Madrid (CET, winter)
        let millis = UTC
            .with_ymd_and_hms(2026, 3, 14, 10, 30, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(local_hour(millis, UTC), Some(10));
        assert_eq!(local_hour(millis, chrono_tz::Europe::Madrid), Some(11));
    }

    #[test]
    fn fire_time_parses_or_falls_back() {
        assert_eq!(
            parse_fire_time("07:45"),
            NaiveTime::from_hms_opt(7, 45, 0).unwrap()
        );
        assert_eq!(
            parse_fire_time("not-a-time"),
            NaiveTime::from_hms_opt(23, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2026-03-14").is_ok());
        assert!(parse_date("14/03/2026").is_err());
    }
}
