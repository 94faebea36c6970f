//! UTC calendar dates.
//!
//! [`CalendarDate`] carries no time or timezone component, so day arithmetic
//! gives the same answer on every host regardless of its local offset.
//!
//! Dates are confined to years 0000 through 9999, the range the
//! `YYYY-MM-DD` form can express, so every date this crate produces can be
//! formatted and parsed back.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

const ISO_DATE_LEN: usize = 10;

const fn bound(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("calendar bound is not a valid date"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// 0000-01-01.
    pub const MIN: CalendarDate = CalendarDate(bound(0, 1, 1));
    /// 9999-12-31.
    pub const MAX: CalendarDate = CalendarDate(bound(9999, 12, 31));

    /// Builds a date from a 1-based month, returning `None` for impossible dates
    /// and for years outside 0000..=9999.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::within_bounds)
    }

    fn within_bounds(date: NaiveDate) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&date)
            .then_some(Self(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// 0-based month (January = 0).
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Midnight UTC at the start of this date.
    pub fn to_utc_midnight(&self) -> DateTime<Utc> {
        self.0.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Returns the date `days` calendar days away, or `None` when the result
    /// leaves the representable range.
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        let delta = TimeDelta::try_days(days)?;
        self.0
            .checked_add_signed(delta)
            .and_then(Self::within_bounds)
    }

    /// Like [`CalendarDate::checked_add_days`] but clamps to [`CalendarDate::MIN`]
    /// or [`CalendarDate::MAX`] instead of failing.
    pub fn add_days(&self, days: i64) -> Self {
        self.checked_add_days(days).unwrap_or(if days < 0 {
            Self::MIN
        } else {
            Self::MAX
        })
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: CalendarDate) -> i64 {
        (other.0 - self.0).num_days()
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = ScheduleError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::within_bounds(value).ok_or_else(|| ScheduleError::invalid_date(value.to_string()))
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(value: CalendarDate) -> Self {
        value.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for CalendarDate {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parses a strict `YYYY-MM-DD` string into a [`CalendarDate`].
///
/// Unpadded fields, signs, surrounding whitespace and impossible dates such as
/// `2025-02-30` are all rejected with [`ScheduleError::InvalidDateFormat`].
pub fn parse_date(input: &str) -> Result<CalendarDate, ScheduleError> {
    let bytes = input.as_bytes();
    if bytes.len() != ISO_DATE_LEN || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(ScheduleError::invalid_date(input));
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(idx, b)| idx == 4 || idx == 7 || b.is_ascii_digit());
    if !digits_ok {
        return Err(ScheduleError::invalid_date(input));
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32, ScheduleError> {
        input[range]
            .parse::<u32>()
            .map_err(|_| ScheduleError::invalid_date(input))
    };
    let year = field(0..4)? as i32;
    let month = field(5..7)?;
    let day = field(8..10)?;

    CalendarDate::from_ymd(year, month, day).ok_or_else(|| ScheduleError::invalid_date(input))
}

/// Formats a date as zero-padded `YYYY-MM-DD`.
pub fn format_date(date: CalendarDate) -> String {
    date.to_string()
}

/// Returns the date `days` calendar days after `date`.
pub fn add_days(date: CalendarDate, days: i64) -> CalendarDate {
    date.add_days(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_loose_formats() {
        for input in [
            "2025-1-01",
            "2025-01-1",
            " 2025-01-01",
            "2025/01/01",
            "+025-01-01",
            "20250101",
            "",
            "2025-01-01T00:00:00Z",
        ] {
            assert!(parse_date(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn rejects_february_29_outside_leap_years() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2025-02-29").is_err());
        assert!(parse_date("1900-02-29").is_err());
        assert!(parse_date("2000-02-29").is_ok());
    }

    #[test]
    fn add_days_saturates_instead_of_panicking() {
        let d = parse_date("2025-01-01").unwrap();
        assert_eq!(d.add_days(i64::MAX), CalendarDate::MAX);
        assert_eq!(d.add_days(i64::MIN), CalendarDate::MIN);
        assert_eq!(d.checked_add_days(i64::MAX), None);
    }

    #[test]
    fn range_stops_at_four_digit_years() {
        let last = parse_date("9999-12-31").unwrap();
        assert_eq!(last, CalendarDate::MAX);
        assert_eq!(last.checked_add_days(1), None);
        assert_eq!(last.add_days(1), CalendarDate::MAX);

        let first = parse_date("0000-01-01").unwrap();
        assert_eq!(first, CalendarDate::MIN);
        assert_eq!(first.checked_add_days(-1), None);

        assert_eq!(CalendarDate::from_ymd(10000, 1, 1), None);
        assert_eq!(CalendarDate::from_ymd(-1, 12, 31), None);
        assert!(CalendarDate::try_from(NaiveDate::MAX).is_err());
    }

    #[test]
    fn utc_midnight_has_no_time_component() {
        let d = parse_date("2025-03-30").unwrap();
        assert_eq!(d.to_utc_midnight().to_rfc3339(), "2025-03-30T00:00:00+00:00");
    }
}
