//! Day-first timestamp parsing for visit and order text.
//!
//! The visit log writes dates day first (`01/02/2023` is 1 February). ISO
//! `YYYY-MM-DD` text is also accepted since it is unambiguous.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Parses a day-first timestamp, returning `None` for blank or
/// unrecognized text. Date-only values resolve to midnight.
pub fn parse_day_first(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// `end - start` when both parse.
pub fn elapsed(start: &str, end: &str) -> Option<TimeDelta> {
    Some(parse_day_first(end)? - parse_day_first(start)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn parses_day_first() {
        assert_eq!(
            parse_day_first("01/02/2023 10:15"),
            Some(at(2023, 2, 1, 10, 15))
        );
        assert_eq!(
            parse_day_first("13/02/2023 10:15:00"),
            Some(at(2023, 2, 13, 10, 15))
        );
        assert_eq!(
            parse_day_first("  05-03-2023 08:00 "),
            Some(at(2023, 3, 5, 8, 0))
        );
    }

    #[test]
    fn parses_iso_text() {
        assert_eq!(
            parse_day_first("2023-02-01 10:15:00"),
            Some(at(2023, 2, 1, 10, 15))
        );
        assert_eq!(
            parse_day_first("2023-02-01T10:15"),
            Some(at(2023, 2, 1, 10, 15))
        );
    }

    #[test]
    fn date_only_is_midnight() {
        assert_eq!(parse_day_first("01/02/2023"), Some(at(2023, 2, 1, 0, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("   "), None);
        assert_eq!(parse_day_first("UREA, START"), None);
        assert_eq!(parse_day_first("32/01/2023 10:00"), None);
    }

    #[test]
    fn elapsed_between_timestamps() {
        assert_eq!(
            elapsed("01/02/2023 10:15", "01/02/2023 11:00"),
            Some(TimeDelta::minutes(45))
        );
        assert_eq!(
            elapsed("01/02/2023 11:00", "01/02/2023 10:15"),
            Some(TimeDelta::minutes(-45))
        );
        assert_eq!(elapsed("01/02/2023 10:15", ""), None);
    }
}
