//! CF convention time coordinate decoding.

use crate::error::{CubeviewError, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Reference datetime layouts accepted after `since`.
const REFERENCE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parsed `<unit> since <reference>` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    /// Milliseconds per coordinate step.
    pub step_millis: f64,
    /// Epoch of the coordinate.
    pub reference: NaiveDateTime,
}

impl TimeUnits {
    /// Parse a CF `units` attribute such as `days since 1970-01-01`.
    pub fn parse(units: &str) -> Result<Self> {
        let lower = units.trim().to_lowercase();
        let (unit, reference) = lower
            .split_once(" since ")
            .ok_or_else(|| CubeviewError::time_coordinate(format!("unsupported units '{}'", units)))?;

        let step_millis = match unit.trim() {
            "nanoseconds" | "nanosecond" | "nsec" | "ns" => 1e-6,
            "microseconds" | "microsecond" | "usec" | "us" => 1e-3,
            "milliseconds" | "millisecond" | "msec" | "ms" => 1.0,
            "seconds" | "second" | "secs" | "sec" | "s" => 1_000.0,
            "minutes" | "minute" | "mins" | "min" => 60_000.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3_600_000.0,
            "days" | "day" | "d" => 86_400_000.0,
            other => {
                return Err(CubeviewError::time_coordinate(format!(
                    "unsupported time unit '{}'",
                    other
                )))
            },
        };

        Ok(Self {
            step_millis,
            reference: parse_reference(reference)?,
        })
    }

    /// Convert a raw coordinate value to a datetime.
    pub fn decode(&self, value: f64) -> Result<NaiveDateTime> {
        if !value.is_finite() {
            return Err(CubeviewError::time_coordinate(format!(
                "non-finite time value {}",
                value
            )));
        }
        let millis = (value * self.step_millis).round() as i64;
        TimeDelta::try_milliseconds(millis)
            .and_then(|delta| self.reference.checked_add_signed(delta))
            .ok_or_else(|| {
                CubeviewError::time_coordinate(format!("time value {} overflows", value))
            })
    }
}

/// Reference datetime in UTC. Offsets (`+HHMM`, `+HH:MM`, `+HH`) are folded in.
fn parse_reference(text: &str) -> Result<NaiveDateTime> {
    let unparseable =
        || CubeviewError::time_coordinate(format!("unparseable reference date '{}'", text.trim()));

    let trimmed = text.trim().trim_end_matches(" utc").trim_end_matches('z').trim();
    let (local, offset) = split_offset(trimmed).ok_or_else(unparseable)?;
    let upper = local.to_uppercase();

    let naive = REFERENCE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&upper, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&upper, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(unparseable)?;

    naive.checked_sub_signed(offset).ok_or_else(unparseable)
}

/// Split a trailing UTC offset off a reference datetime.
///
/// Returns `None` when something offset-like is present but malformed.
fn split_offset(text: &str) -> Option<(&str, TimeDelta)> {
    // Signs inside the leading `YYYY-MM-DD` belong to the date.
    let Some(pos) = text
        .char_indices()
        .skip(10)
        .filter(|&(_, c)| c == '+' || c == '-')
        .map(|(i, _)| i)
        .last()
    else {
        return Some((text, TimeDelta::zero()));
    };

    let (local, offset) = text.split_at(pos);
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits: String = offset[1..].chars().filter(|&c| c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i64>().ok()?, 0),
        4 => (digits[..2].parse::<i64>().ok()?, digits[2..].parse::<i64>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let delta = TimeDelta::try_minutes(sign * (hours * 60 + minutes))?;
    Some((local.trim(), delta))
}

/// Decode every value of a time coordinate.
pub fn decode_times(values: &[f64], units: &str) -> Result<Vec<NaiveDateTime>> {
    let units = TimeUnits::parse(units)?;
    values.iter().map(|&v| units.decode(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid datetime")
    }

    #[test]
    fn decodes_days_since_date() {
        let times = decode_times(&[0.0, 1.5], "days since 2020-01-01").unwrap();
        assert_eq!(times[0], ymd_hms(2020, 1, 1, 0, 0, 0));
        assert_eq!(times[1], ymd_hms(2020, 1, 2, 12, 0, 0));
    }

    #[test]
    fn decodes_seconds_with_iso_reference_and_zone() {
        let times = decode_times(&[90.0], "seconds since 1970-01-01T00:00:00Z").unwrap();
        assert_eq!(times[0], ymd_hms(1970, 1, 1, 0, 1, 30));
    }

    #[test]
    fn decodes_hours_with_space_separated_reference() {
        let times = decode_times(&[25.0], "hours since 2000-02-28 00:00:00").unwrap();
        assert_eq!(times[0], ymd_hms(2000, 2, 29, 1, 0, 0));
    }

    #[test]
    fn decodes_sub_millisecond_units() {
        let expected = ymd_hms(2021, 3, 1, 0, 0, 0);
        let micros = decode_times(&[1.6145568e15], "microseconds since 1970-01-01").unwrap();
        assert_eq!(micros[0], expected);
        let nanos = decode_times(&[1.6145568e18], "nanoseconds since 1970-01-01").unwrap();
        assert_eq!(nanos[0], expected);
        let short = decode_times(&[2_000.0], "us since 2000-01-01 00:00:00").unwrap();
        assert_eq!(short[0], ymd_hms(2000, 1, 1, 0, 0, 0) + TimeDelta::milliseconds(2));
    }

    #[test]
    fn folds_reference_offsets_into_utc() {
        let epoch = ymd_hms(1970, 1, 1, 0, 0, 0);
        for units in [
            "seconds since 1970-01-01 00:00:00 +0000",
            "seconds since 1970-01-01 00:00:00+00:00",
            "seconds since 1970-01-01T00:00:00 +00",
        ] {
            assert_eq!(decode_times(&[0.0], units).unwrap()[0], epoch, "{}", units);
        }

        let east = decode_times(&[0.0], "hours since 2020-01-01 10:00:00 +05:30").unwrap();
        assert_eq!(east[0], ymd_hms(2020, 1, 1, 4, 30, 0));
        let west = decode_times(&[0.0], "hours since 2020-01-01 10:00 -0200").unwrap();
        assert_eq!(west[0], ymd_hms(2020, 1, 1, 12, 0, 0));
        let date_only = decode_times(&[1.0], "days since 1970-01-01 +0000").unwrap();
        assert_eq!(date_only[0], ymd_hms(1970, 1, 2, 0, 0, 0));
    }

    #[test]
    fn rejects_malformed_offsets() {
        assert!(TimeUnits::parse("seconds since 1970-01-01 00:00:00 +99").is_err());
        assert!(TimeUnits::parse("seconds since 1970-01-01 00:00:00 +0a00").is_err());
    }

    #[test]
    fn rejects_unknown_units() {
        assert!(TimeUnits::parse("fortnights since 2000-01-01").is_err());
        assert!(TimeUnits::parse("days").is_err());
        assert!(TimeUnits::parse("days since yesterday").is_err());
    }
}
