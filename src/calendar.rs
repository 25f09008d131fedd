//! Working-day arithmetic
//!
//! All functions take explicit dates. Nothing here reads the system clock;
//! callers pass the snapshot's reference date.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

use crate::types::TimeEntry;

/// Average number of weeks in a month
pub const WEEKS_PER_MONTH: f64 = 4.29;

/// ISO weekday of `date` (Monday = 1 .. Sunday = 7)
pub fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Valid ISO weekdays in `weekdays`, sorted and without duplicates
pub fn normalize_weekdays(weekdays: &[u32]) -> Vec<u32> {
    weekdays
        .iter()
        .copied()
        .filter(|d| (1..=7).contains(d))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Days in `[start, end]` (inclusive) whose ISO weekday is in `weekdays`
pub fn expected_working_days(start: NaiveDate, end: NaiveDate, weekdays: &[u32]) -> u32 {
    if weekdays.is_empty() || end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| weekdays.contains(&iso_weekday(*d)))
        .count() as u32
}

/// Distinct calendar days in `[start, end]` with a positive-hours entry
pub fn actual_working_days(entries: &[TimeEntry], start: NaiveDate, end: NaiveDate) -> u32 {
    entries
        .iter()
        .filter(|e| e.hours > 0.0)
        .map(|e| e.entry_date.date())
        .filter(|d| *d >= start && *d <= end)
        .collect::<BTreeSet<_>>()
        .len() as u32
}

/// Sum of positive entry hours up to the end of `end` (inclusive)
pub fn hours_up_to_date(entries: &[TimeEntry], end: NaiveDate) -> f64 {
    let cutoff = end_of_day(end);
    entries
        .iter()
        .filter(|e| e.hours > 0.0 && e.entry_date <= cutoff)
        .map(|e| e.hours)
        .sum()
}

/// Sum of positive entry hours logged on days in `[start, end]` (inclusive)
pub fn hours_in_range(entries: &[TimeEntry], start: NaiveDate, end: NaiveDate) -> f64 {
    let from = start.and_time(NaiveTime::MIN);
    let cutoff = end_of_day(end);
    entries
        .iter()
        .filter(|e| e.hours > 0.0 && e.entry_date >= from && e.entry_date <= cutoff)
        .map(|e| e.hours)
        .sum()
}

/// Last millisecond of `date`
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let som = start_of_month(date);
    let next = if som.month() == 12 {
        NaiveDate::from_ymd_opt(som.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(som.year(), som.month() + 1, 1)
    };
    next.and_then(|n| n.pred_opt()).unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    end_of_month(date).day()
}

/// The day before `date`; month-to-date figures exclude the current day
pub fn yesterday(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// Expected working days from the start of the month through yesterday
pub fn elapsed_working_days(as_of: NaiveDate, weekdays: &[u32]) -> u32 {
    let som = start_of_month(as_of);
    let until = yesterday(as_of);
    if until < som {
        return 0;
    }
    expected_working_days(som, until, weekdays)
}

/// Expected working days in the whole month containing `as_of`
pub fn month_working_days(as_of: NaiveDate, weekdays: &[u32]) -> u32 {
    expected_working_days(start_of_month(as_of), end_of_month(as_of), weekdays)
}

/// Daily hours target from a monthly target and working schedule.
///
/// With a reference date the month's actual working days are counted;
/// without one the month is approximated as `days_in_month * n / 7`.
pub fn daily_hours_target(
    monthly_hours_target: f64,
    weekdays: &[u32],
    as_of: Option<NaiveDate>,
    fallback_days_in_month: u32,
) -> f64 {
    let working_days = match as_of {
        Some(date) => month_working_days(date, weekdays) as f64,
        None => {
            fallback_days_in_month as f64 * normalize_weekdays(weekdays).len() as f64 / 7.0
        }
    };
    if working_days <= 0.0 {
        return 0.0;
    }
    monthly_hours_target / working_days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expected_working_days_mon_thu() {
        assert_eq!(
            expected_working_days(date(2025, 9, 1), date(2025, 9, 8), &[1, 2, 3, 4]),
            5
        );
        assert_eq!(
            expected_working_days(date(2025, 9, 1), date(2025, 9, 30), &[1, 2, 3, 4]),
            18
        );
        assert_eq!(expected_working_days(date(2025, 9, 1), date(2025, 9, 30), &[]), 0);
    }

    #[test]
    fn test_actual_working_days_dedupes_same_day() {
        let entries = vec![
            TimeEntry::on(date(2025, 9, 1), 8.0),
            TimeEntry::on(date(2025, 9, 1), 2.0),
            TimeEntry::on(date(2025, 9, 2), 6.0),
            TimeEntry::on(date(2025, 9, 3), 0.0),
            TimeEntry::on(date(2025, 9, 20), 4.0),
        ];
        assert_eq!(
            actual_working_days(&entries, date(2025, 9, 1), date(2025, 9, 8)),
            2
        );
    }

    #[test]
    fn test_hours_up_to_date_includes_whole_end_day() {
        let late = TimeEntry {
            entry_date: date(2025, 9, 2).and_hms_opt(23, 30, 0).unwrap(),
            hours: 6.0,
        };
        let entries = vec![
            TimeEntry::on(date(2025, 9, 1), 8.0),
            late,
            TimeEntry::on(date(2025, 9, 10), 7.0),
        ];
        assert_eq!(hours_up_to_date(&entries, date(2025, 9, 2)), 14.0);
    }

    #[test]
    fn test_hours_in_range_is_bounded_both_ends() {
        let entries = vec![
            TimeEntry::on(date(2025, 8, 29), 5.0),
            TimeEntry::on(date(2025, 9, 1), 8.0),
            TimeEntry {
                entry_date: date(2025, 9, 8).and_hms_opt(21, 0, 0).unwrap(),
                hours: 3.0,
            },
            TimeEntry::on(date(2025, 9, 9), 7.0),
        ];
        assert_eq!(hours_in_range(&entries, date(2025, 9, 1), date(2025, 9, 8)), 11.0);
        assert_eq!(hours_in_range(&entries, date(2025, 9, 10), date(2025, 9, 30)), 0.0);
    }

    #[test]
    fn test_duplicate_weekdays_count_once() {
        assert_eq!(normalize_weekdays(&[2, 1, 1, 9, 0, 2]), vec![1, 2]);
        let fallback = daily_hours_target(40.0, &[1, 1, 2], None, 28);
        assert!((fallback - 5.0).abs() < 1e-9);
        assert_eq!(
            expected_working_days(date(2025, 9, 1), date(2025, 9, 7), &[1, 1, 2]),
            2
        );
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(end_of_month(date(2025, 12, 15)), date(2025, 12, 31));
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(start_of_month(date(2025, 9, 17)), date(2025, 9, 1));
    }

    #[test]
    fn test_daily_hours_target() {
        let target = daily_hours_target(120.0, &[1, 2, 3, 4], Some(date(2025, 9, 1)), 30);
        assert!((target - 120.0 / 18.0).abs() < 1e-9);

        let fallback = daily_hours_target(140.0, &[1, 2, 3, 4, 5], None, 28);
        assert!((fallback - 7.0).abs() < 1e-9);

        assert_eq!(daily_hours_target(120.0, &[], None, 30), 0.0);
    }

    #[test]
    fn test_elapsed_working_days_excludes_today() {
        assert_eq!(elapsed_working_days(date(2025, 9, 9), &[1, 2, 3, 4]), 5);
        assert_eq!(elapsed_working_days(date(2025, 9, 1), &[1, 2, 3, 4]), 0);
    }
}
