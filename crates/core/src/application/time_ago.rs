// Relative time formatting ("2h ago")
use crate::port::time_provider::utc_from_millis_clamped;
use crate::port::TimeProvider;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use std::sync::Arc;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Short human-readable age of `timestamp` as seen from `now`
///
/// | elapsed       | output       |
/// |---------------|--------------|
/// | < 1 minute    | `just now`   |
/// | < 1 hour      | `{m}m ago`   |
/// | < 1 day       | `{h}h ago`   |
/// | < 1 week      | `{d}d ago`   |
/// | otherwise     | `Jan 5`      |
///
/// Elapsed time is floored to whole seconds. A timestamp in the future has
/// negative elapsed time and reads `just now`. The short date is rendered in
/// the timestamp's own time zone.
pub fn time_ago<Tz>(timestamp: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let elapsed_ms = now.timestamp_millis().saturating_sub(timestamp.timestamp_millis());
    relative_or_else(elapsed_ms.div_euclid(1000), || short_date(timestamp))
}

/// Same as [`time_ago`] on epoch milliseconds, short date in UTC
pub fn time_ago_millis(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed_ms = now_ms.saturating_sub(timestamp_ms);
    relative_or_else(elapsed_ms.div_euclid(1000), || {
        short_date(&utc_from_millis_clamped(timestamp_ms))
    })
}

fn relative_or_else(elapsed_secs: i64, date: impl FnOnce() -> String) -> String {
    match elapsed_secs {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => format!("{}m ago", s / MINUTE),
        s if s < DAY => format!("{}h ago", s / HOUR),
        s if s < WEEK => format!("{}d ago", s / DAY),
        _ => date(),
    }
}

/// Abbreviated month and unpadded day, e.g. `Jan 5`
fn short_date<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%b %-d").to_string()
}

/// Formats against an injected clock instead of the ambient wall clock
pub struct RelativeTimeFormatter {
    time_provider: Arc<dyn TimeProvider>,
}

impl RelativeTimeFormatter {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    /// Age of an epoch-millisecond timestamp relative to the provider's now
    pub fn format(&self, timestamp_ms: i64) -> String {
        time_ago_millis(timestamp_ms, self.time_provider.now_millis())
    }

    pub fn format_datetime(&self, timestamp: &DateTime<Utc>) -> String {
        time_ago(timestamp, &self.time_provider.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::time_provider::FixedTimeProvider;
    use chrono::{Duration, FixedOffset};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    fn ago(secs: i64) -> String {
        let now = now();
        time_ago(&(now - Duration::seconds(secs)), &now)
    }

    #[test]
    fn test_just_now_bucket() {
        assert_eq!(ago(0), "just now");
        assert_eq!(ago(45), "just now");
        assert_eq!(ago(59), "just now");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(ago(-1), "just now");
        assert_eq!(ago(-3 * DAY), "just now");
    }

    #[test]
    fn test_minutes_bucket() {
        assert_eq!(ago(60), "1m ago");
        assert_eq!(ago(120), "2m ago");
        assert_eq!(ago(HOUR - 1), "59m ago");
    }

    #[test]
    fn test_hours_bucket() {
        assert_eq!(ago(HOUR), "1h ago");
        assert_eq!(ago(7200), "2h ago");
        assert_eq!(ago(DAY - 1), "23h ago");
    }

    #[test]
    fn test_days_bucket() {
        assert_eq!(ago(DAY), "1d ago");
        assert_eq!(ago(172_800), "2d ago");
        assert_eq!(ago(WEEK - 1), "6d ago");
    }

    #[test]
    fn test_week_or_older_is_short_date() {
        // 2024-03-20 12:00 minus 7 days = Mar 13
        assert_eq!(ago(WEEK), "Mar 13");
        assert_eq!(ago(700_000), "Mar 12");

        let jan5 = Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap();
        assert_eq!(time_ago(&jan5, &now()), "Jan 5");
    }

    #[test]
    fn test_sub_second_remainder_is_floored() {
        let now = now();
        let ts = now - Duration::milliseconds(59_999);
        assert_eq!(time_ago(&ts, &now), "just now");

        let ts = now - Duration::milliseconds(60_001);
        assert_eq!(time_ago(&ts, &now), "1m ago");

        // -0.5s floors to -1s, still "just now"
        let ts = now + Duration::milliseconds(500);
        assert_eq!(time_ago(&ts, &now), "just now");
    }

    #[test]
    fn test_short_date_uses_timestamp_zone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        // 2024-01-05 20:00 UTC is already Jan 6 in UTC+9
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 20, 0, 0).unwrap().with_timezone(&tz);
        let now = now().with_timezone(&tz);
        assert_eq!(time_ago(&ts, &now), "Jan 6");
    }

    #[test]
    fn test_millis_variant_matches_datetime_variant() {
        let now_ms = now().timestamp_millis();
        assert_eq!(time_ago_millis(now_ms - 45_000, now_ms), "just now");
        assert_eq!(time_ago_millis(now_ms - 120_000, now_ms), "2m ago");
        assert_eq!(time_ago_millis(now_ms - 7_200_000, now_ms), "2h ago");
        assert_eq!(time_ago_millis(now_ms - 172_800_000, now_ms), "2d ago");
        assert_eq!(time_ago_millis(now_ms - 700_000_000, now_ms), "Mar 12");
    }

    #[test]
    fn test_millis_variant_is_total() {
        assert_eq!(time_ago_millis(i64::MAX, i64::MIN), "just now");
        // Far outside chrono's range: clamped, still a short date
        let out = time_ago_millis(i64::MIN, i64::MAX);
        assert!(!out.ends_with("ago"));
        assert!(!out.is_empty());
    }

    #[test]
    fn test_formatter_uses_injected_clock() {
        let clock = Arc::new(FixedTimeProvider::new(now().timestamp_millis()));
        let formatter = RelativeTimeFormatter::new(clock.clone());
        let posted = now().timestamp_millis() - 30_000;

        assert_eq!(formatter.format(posted), "just now");

        clock.advance(2 * HOUR * 1000);
        assert_eq!(formatter.format(posted), "2h ago");

        let jan5 = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(formatter.format_datetime(&jan5), "Jan 5");
    }
}
