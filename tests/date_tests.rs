use proptest::prelude::*;
use vridge_schedule::{CalendarDate, ScheduleError, add_days, format_date, parse_date};

fn d(s: &str) -> CalendarDate {
    parse_date(s).unwrap()
}

// Independent proleptic-Gregorian day count (Howard Hinnant's civil algorithms)
// used as an oracle for add_days.
fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let mp = (m as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = (if z >= 0 { z } else { z - 146096 }) / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 31,
    }
}

fn valid_date() -> impl Strategy<Value = CalendarDate> {
    (1600i32..=2400, 1u32..=12, 1u32..=31).prop_map(|(y, m, day)| {
        let day = day.min(days_in_month(y, m));
        CalendarDate::from_ymd(y, m, day).unwrap()
    })
}

#[test]
fn parse_date_exposes_zero_based_month() {
    let date = d("2025-01-01");
    assert_eq!(date.year(), 2025);
    assert_eq!(date.month0(), 0);
    assert_eq!(date.month(), 1);
    assert_eq!(date.day(), 1);
}

#[test]
fn parse_date_rejects_impossible_month_and_day() {
    for input in ["2025-13-01", "2025-01-32", "2025-00-10", "2025-04-31"] {
        match parse_date(input) {
            Err(ScheduleError::InvalidDateFormat { input: reported }) => {
                assert_eq!(reported, input)
            }
            other => panic!("{input}: expected InvalidDateFormat, got {other:?}"),
        }
    }
}

#[test]
fn add_days_rolls_over_month_end() {
    assert_eq!(format_date(add_days(d("2025-01-28"), 5)), "2025-02-02");
}

#[test]
fn add_days_handles_leap_february() {
    assert_eq!(format_date(add_days(d("2024-02-28"), 2)), "2024-03-01");
    assert_eq!(format_date(add_days(d("2025-02-28"), 1)), "2025-03-01");
}

#[test]
fn add_days_rolls_over_year_end_and_goes_backwards() {
    assert_eq!(format_date(add_days(d("2024-12-31"), 1)), "2025-01-01");
    assert_eq!(format_date(add_days(d("2025-03-01"), -1)), "2025-02-28");
}

#[test]
fn add_days_leaves_input_untouched() {
    let original = d("2025-01-28");
    let later = add_days(original, 10);
    assert_eq!(format_date(original), "2025-01-28");
    assert_ne!(original, later);
}

#[test]
fn days_until_is_signed_difference() {
    let a = d("2025-01-01");
    let b = d("2025-01-22");
    assert_eq!(a.days_until(b), 21);
    assert_eq!(b.days_until(a), -21);
}

#[test]
fn serde_uses_iso_strings() {
    let json = serde_json::to_string(&d("2025-02-02")).unwrap();
    assert_eq!(json, "\"2025-02-02\"");
    let back: CalendarDate = serde_json::from_str(&json).unwrap();
    assert_eq!(back, d("2025-02-02"));
    assert!(serde_json::from_str::<CalendarDate>("\"2025-02-30\"").is_err());
}

proptest! {
    #[test]
    fn prop_format_inverts_parse(date in valid_date()) {
        let text = format_date(date);
        prop_assert_eq!(parse_date(&text).unwrap(), date);
        prop_assert_eq!(format_date(parse_date(&text).unwrap()), text);
    }

    #[test]
    fn prop_add_zero_is_identity(date in valid_date()) {
        prop_assert_eq!(add_days(date, 0), date);
    }

    #[test]
    fn prop_add_days_is_additive(date in valid_date(), a in 0i64..50_000, b in 0i64..50_000) {
        prop_assert_eq!(add_days(add_days(date, a), b), add_days(date, a + b));
    }

    #[test]
    fn prop_add_days_matches_gregorian_day_count(date in valid_date(), n in -200_000i64..200_000) {
        let base = days_from_civil(date.year() as i64, date.month(), date.day());
        let (y, m, day) = civil_from_days(base + n);
        let expected = CalendarDate::from_ymd(y as i32, m, day).unwrap();
        prop_assert_eq!(add_days(date, n), expected);
    }
}
