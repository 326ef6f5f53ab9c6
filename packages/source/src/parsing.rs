//! Shared parsing utilities for collision exports.
//!
//! Every function here is total: malformed input is reported through
//! [`FieldValue::Invalid`] and never aborts normalization.

use chrono::{NaiveDate, NaiveDateTime};
use collision_map_collision_models::FieldValue;

/// Date + time layouts tried in order, after the date and time fields have
/// been joined by a single space.
const DATE_TIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Layouts for a date with no time component (midnight).
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Trims a raw value and returns `None` when nothing is left.
#[must_use]
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Combines a crash date and a crash time into one timestamp.
///
/// The two fields are joined with a single space and parsed as a calendar
/// date-time with no timezone. A Socrata-style ISO date
/// (`2021-09-11T00:00:00.000`) contributes only its date part. An empty
/// time yields midnight of the date.
#[must_use]
pub fn parse_crash_timestamp(date: Option<&str>, time: Option<&str>) -> FieldValue<NaiveDateTime> {
    let Some(date) = non_empty(date) else {
        return FieldValue::Absent;
    };
    let date = match date.split_once('T') {
        Some((day, _)) if day.len() == 10 => day,
        _ => date,
    };
    let time = non_empty(time).unwrap_or_default();

    let combined = format!("{date} {time}");
    let combined = combined.trim();

    let parsed = if time.is_empty() {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(combined, fmt).ok())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    } else {
        DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(combined, fmt).ok())
    };

    parsed.map_or_else(
        || FieldValue::Invalid(combined.to_string()),
        FieldValue::Valid,
    )
}

/// Parses a coordinate. Empty input is absent; non-numeric or non-finite
/// input is invalid. Zero is kept as a valid value.
#[must_use]
pub fn parse_coordinate(raw: Option<&str>) -> FieldValue<f64> {
    let Some(s) = non_empty(raw) else {
        return FieldValue::Absent;
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => FieldValue::Valid(v),
        _ => FieldValue::Invalid(s.to_string()),
    }
}

/// Parses a casualty count.
///
/// Integers parse directly; finite non-negative decimals (`"2.0"`) are
/// truncated. Negative or non-numeric input is invalid.
#[must_use]
pub fn parse_count(raw: Option<&str>) -> FieldValue<u32> {
    let Some(s) = non_empty(raw) else {
        return FieldValue::Absent;
    };
    if let Ok(n) = s.parse::<u32>() {
        return FieldValue::Valid(n);
    }
    match s.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(v) if v.is_finite() && v >= 0.0 => FieldValue::Valid(v as u32),
        _ => FieldValue::Invalid(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike as _, Timelike as _};

    use super::*;

    #[test]
    fn parses_nyc_date_with_short_hour() {
        let dt = parse_crash_timestamp(Some("09/11/2021"), Some("2:39"))
            .get()
            .unwrap();
        assert_eq!(dt.to_string(), "2021-09-11 02:39:00");
    }

    #[test]
    fn parses_date_with_seconds() {
        let dt = parse_crash_timestamp(Some("2024-01-15"), Some("14:30:15"))
            .get()
            .unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.second(), 15);
    }

    #[test]
    fn parses_socrata_iso_date() {
        let dt = parse_crash_timestamp(Some("2021-09-11T00:00:00.000"), Some("23:05"))
            .get()
            .unwrap();
        assert_eq!(dt.day(), 11);
        assert_eq!(dt.hour(), 23);
    }

    #[test]
    fn empty_time_means_midnight() {
        let dt = parse_crash_timestamp(Some("09/11/2021"), Some(""))
            .get()
            .unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn missing_date_is_absent() {
        assert!(parse_crash_timestamp(None, Some("2:39")).is_absent());
        assert!(parse_crash_timestamp(Some("  "), Some("2:39")).is_absent());
    }

    #[test]
    fn garbage_date_is_invalid() {
        let value = parse_crash_timestamp(Some("not-a-date"), Some("2:39"));
        assert_eq!(value, FieldValue::Invalid("not-a-date 2:39".to_string()));
        assert!(parse_crash_timestamp(Some("09/11/2021"), Some("25:00")).is_invalid());
    }

    #[test]
    fn parses_coordinates() {
        assert_eq!(parse_coordinate(Some(" 40.667202 ")).get(), Some(40.667_202));
        assert_eq!(parse_coordinate(Some("0")).get(), Some(0.0));
        assert!(parse_coordinate(Some("")).is_absent());
        assert!(parse_coordinate(None).is_absent());
        assert!(parse_coordinate(Some("north")).is_invalid());
        assert!(parse_coordinate(Some("NaN")).is_invalid());
    }

    #[test]
    fn parses_counts() {
        assert_eq!(parse_count(Some("3")).get(), Some(3));
        assert_eq!(parse_count(Some("2.0")).get(), Some(2));
        assert!(parse_count(Some("")).is_absent());
        assert!(parse_count(Some("-1")).is_invalid());
        assert!(parse_count(Some("many")).is_invalid());
    }
}
