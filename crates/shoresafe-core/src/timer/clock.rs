//! Parsing user-entered times and dates.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::ValidationError;

/// Parse `HH:MM` on `day` in the device's local time zone, or a full
/// RFC 3339 timestamp.
pub fn parse_clock_time(input: &str, day: NaiveDate) -> Result<DateTime<Utc>, ValidationError> {
    parse_clock_time_in(input, day, &Local)
}

pub fn parse_clock_time_in<Tz: TimeZone>(
    input: &str,
    day: NaiveDate,
    tz: &Tz,
) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }
    let invalid = || ValidationError::InvalidTime {
        input: input.to_string(),
    };
    let time = NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| invalid())?;
    tz.from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn parses_wall_clock_in_zone() {
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let ts = parse_clock_time_in("17:30", day(), &est).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 14, 22, 30, 0).unwrap());
    }

    #[test]
    fn parses_rfc3339() {
        let ts = parse_clock_time("2026-03-14T17:30:00-04:00", day()).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 3, 14, 21, 30, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_clock_time("25:99", day()),
            Err(ValidationError::InvalidTime { .. })
        ));
        assert!(parse_date("March 14").is_err());
        assert_eq!(parse_date("2026-03-14").unwrap(), day());
    }
}
