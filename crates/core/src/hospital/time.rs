//! Pure parsing helpers for booking dates and `HH:MM` time slots.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parses a strict `HH:MM` time slot (hour 00-23, minute 00-59).
///
/// # Examples
///
/// ```
/// use pethospital_core::hospital::parse_hh_mm;
///
/// assert!(parse_hh_mm("00:00").is_some());
/// assert!(parse_hh_mm("23:59").is_some());
/// assert!(parse_hh_mm("24:00").is_none());
/// assert!(parse_hh_mm("9:30").is_none());
/// ```
pub fn parse_hh_mm(value: &str) -> Option<NaiveTime> {
    let (hour, minute) = value.split_once(':')?;
    let hour = two_digits(hour)?;
    let minute = two_digits(minute)?;
    if hour > 23 || minute > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn two_digits(part: &str) -> Option<u32> {
    if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Formats a time slot as `HH:MM`.
pub fn format_hh_mm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parses a date or date-time string into a UTC instant.
///
/// Accepted forms, in order: RFC 3339 (`2030-01-15T09:00:00+02:00`), a naive
/// date-time read as UTC (`2030-01-15T09:00:00` or `2030-01-15 09:00`), and a
/// plain date read as midnight UTC (`2030-01-15`).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses the calendar day written in a date or date-time string.
///
/// Accepts the same forms as [`parse_datetime`], but an RFC 3339 offset is
/// not applied: `2030-01-15T01:00:00+05:00` is the 15th, not the UTC 14th.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value.trim()) {
        return Some(parsed.date_naive());
    }
    parse_datetime(value).map(|instant| instant.date_naive())
}

/// Serde adapter storing a `NaiveTime` as `HH:MM`.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_hh_mm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_hh_mm(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid HH:MM time: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_hh_mm_bounds() {
        assert_eq!(parse_hh_mm("00:00"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_hh_mm("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_hh_mm("24:00"), None);
        assert_eq!(parse_hh_mm("12:60"), None);
        assert_eq!(parse_hh_mm("9:60"), None);
    }

    #[test]
    fn test_parse_hh_mm_rejects_malformed() {
        assert_eq!(parse_hh_mm(""), None);
        assert_eq!(parse_hh_mm("1230"), None);
        assert_eq!(parse_hh_mm("12:3"), None);
        assert_eq!(parse_hh_mm("12:30:00"), None);
        assert_eq!(parse_hh_mm("+1:30"), None);
        assert_eq!(parse_hh_mm("ab:cd"), None);
    }

    #[test]
    fn test_format_hh_mm_pads() {
        let time = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        assert_eq!(format_hh_mm(time), "07:05");
    }

    #[test]
    fn test_parse_datetime_rfc3339_converts_to_utc() {
        let parsed = parse_datetime("2030-01-15T09:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 1, 15, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2030, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(parse_datetime("2030-01-15T09:30:00"), Some(expected));
        assert_eq!(parse_datetime("2030-01-15T09:30"), Some(expected));
        assert_eq!(parse_datetime("2030-01-15 09:30"), Some(expected));
    }

    #[test]
    fn test_parse_calendar_date_keeps_written_day() {
        let day = NaiveDate::from_ymd_opt(2030, 1, 15);
        assert_eq!(parse_calendar_date("2030-01-15T01:00:00+05:00"), day);
        assert_eq!(parse_calendar_date("2030-01-15T23:30:00-08:00"), day);
        assert_eq!(parse_calendar_date("2030-01-15T09:30"), day);
        assert_eq!(parse_calendar_date("2030-01-15"), day);
        assert_eq!(parse_calendar_date("mid-January"), None);
    }

    #[test]
    fn test_parse_datetime_plain_date_is_midnight() {
        let parsed = parse_datetime("2030-01-15").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2030, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("   "), None);
        assert_eq!(parse_datetime("next tuesday"), None);
        assert_eq!(parse_datetime("2030-13-01"), None);
    }
}
