//! Time utilities: duration formatting, clamps and day-boundary arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{NagError, Result};

const MINUTES_PER_DAY: i64 = 1440;

/// Parse a deadline like "2026-02-20 23:59" in an IANA tz like "America/Chicago",
/// returning UTC.
pub fn parse_local_deadline_to_utc(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| NagError::InvalidTime(format!("invalid timezone: {tz}")))?;

    let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
        .map_err(|e| NagError::InvalidTime(format!("invalid local datetime '{local}': {e}")))?;

    let local_dt = tz.from_local_datetime(&ndt).single().ok_or_else(|| {
        NagError::InvalidTime(format!("ambiguous or invalid local time (DST?): {local} {tz}"))
    })?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Clamp into [0, 1]. NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Clamp into [0, 100]. NaN maps to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Human lead time used in reminder text: "1 day", "3 days", "2 hours", "45 min".
pub fn format_lead_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    if minutes >= MINUTES_PER_DAY {
        let days = minutes / MINUTES_PER_DAY;
        if days == 1 { "1 day".to_string() } else { format!("{days} days") }
    } else if minutes >= 60 {
        let hours = minutes / 60;
        if hours == 1 { "1 hour".to_string() } else { format!("{hours} hours") }
    } else {
        format!("{minutes} min")
    }
}

/// Colour band for a live countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTone {
    Overdue,
    /// Less than an hour left.
    Critical,
    /// Less than a day left.
    Warning,
    Calm,
}

impl CountdownTone {
    pub fn for_remaining(remaining: Duration) -> Self {
        let secs = remaining.num_seconds();
        if secs <= 0 {
            CountdownTone::Overdue
        } else if secs < 3600 {
            CountdownTone::Critical
        } else if secs < 86_400 {
            CountdownTone::Warning
        } else {
            CountdownTone::Calm
        }
    }
}

/// Compact countdown: "OVERDUE", "3d 4h", "5h 07m", "04:09".
pub fn format_countdown(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = (deadline - now).num_seconds();
    if remaining <= 0 {
        return "OVERDUE".to_string();
    }

    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;

    if hours > 24 {
        format!("{}d {}h", hours / 24, hours % 24)
    } else if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Hours elapsed since `deadline`, fractional. Negative when not yet due.
pub fn hours_since(deadline: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - deadline).num_seconds() as f64 / 3600.0
}

/// Weekday as 1 = Sunday ... 7 = Saturday.
pub fn weekday_number<T: Datelike>(dt: &T) -> u32 {
    dt.weekday().number_from_sunday()
}

/// Whole calendar days from `earlier` to `later` (negative if reversed).
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// True when `later` is exactly the calendar day after `earlier`.
pub fn is_day_after(earlier: NaiveDate, later: NaiveDate) -> bool {
    days_between(earlier, later) == 1
}

/// First instant of the day after `now`'s local date, in UTC.
///
/// Falls back to `now + 24h` if local midnight does not exist (DST gap).
pub fn end_of_local_day<Z: TimeZone>(now: &DateTime<Z>) -> DateTime<Utc> {
    let tz = now.timezone();
    now.date_naive()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc) + Duration::hours(24))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chicago_deadline() {
        // Feb is CST (UTC-6)
        let utc = parse_local_deadline_to_utc("2026-02-20 23:59", "America/Chicago").unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-21T05:59:00+00:00");
    }

    #[test]
    fn test_parse_rejects_bad_zone() {
        let err = parse_local_deadline_to_utc("2026-02-20 23:59", "Mars/Olympus").unwrap_err();
        assert!(matches!(err, NagError::InvalidTime(_)));
    }

    #[test]
    fn test_lead_minutes_units() {
        assert_eq!(format_lead_minutes(4320), "3 days");
        assert_eq!(format_lead_minutes(1440), "1 day");
        assert_eq!(format_lead_minutes(120), "2 hours");
        assert_eq!(format_lead_minutes(60), "1 hour");
        assert_eq!(format_lead_minutes(45), "45 min");
        assert_eq!(format_lead_minutes(-5), "0 min");
    }

    #[test]
    fn test_countdown_formats() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        assert_eq!(format_countdown(now - Duration::minutes(1), now), "OVERDUE");
        assert_eq!(format_countdown(now + Duration::hours(52), now), "2d 4h");
        assert_eq!(format_countdown(now + Duration::minutes(307), now), "5h 07m");
        assert_eq!(format_countdown(now + Duration::seconds(249), now), "04:09");
    }

    #[test]
    fn test_countdown_tone() {
        assert_eq!(CountdownTone::for_remaining(Duration::zero()), CountdownTone::Overdue);
        assert_eq!(CountdownTone::for_remaining(Duration::minutes(59)), CountdownTone::Critical);
        assert_eq!(CountdownTone::for_remaining(Duration::hours(23)), CountdownTone::Warning);
        assert_eq!(CountdownTone::for_remaining(Duration::days(2)), CountdownTone::Calm);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_unit(1.0000001), 1.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_score(180.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
    }

    #[test]
    fn test_weekday_number_sunday_is_one() {
        // 2026-03-01 is a Sunday.
        let sunday = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(weekday_number(&sunday), 1);
        assert_eq!(weekday_number(&(sunday + Duration::days(6))), 7);
    }

    #[test]
    fn test_day_after() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let next = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(is_day_after(d, next));
        assert!(!is_day_after(d, d));
        assert_eq!(days_between(d, next + Duration::days(1)), 2);
    }

    #[test]
    fn test_end_of_local_day_uses_zone() {
        let tz: Tz = "America/Chicago".parse().unwrap();
        // 23:30 local on Feb 20 (CST, UTC-6).
        let now = tz.with_ymd_and_hms(2026, 2, 20, 23, 30, 0).unwrap();
        let end = end_of_local_day(&now);
        assert_eq!(end.to_rfc3339(), "2026-02-21T06:00:00+00:00");
    }
}
