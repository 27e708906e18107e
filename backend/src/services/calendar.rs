//! Working-day arithmetic for the label reports.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// The next Monday-to-Friday date strictly after `date`.
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
    let next = date + Days::new(1);
    match next.weekday() {
        Weekday::Sat => next + Days::new(2),
        Weekday::Sun => next + Days::new(1),
        _ => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekend_rolls_to_monday() {
        // 2024-03-08 is a Friday.
        assert_eq!(next_working_day(day(2024, 3, 8)), day(2024, 3, 11));
        assert_eq!(next_working_day(day(2024, 3, 9)), day(2024, 3, 11));
        assert_eq!(next_working_day(day(2024, 3, 10)), day(2024, 3, 11));
    }

    #[test]
    fn weekdays_advance_one_day() {
        assert_eq!(next_working_day(day(2024, 3, 11)), day(2024, 3, 12));
        assert_eq!(next_working_day(day(2024, 3, 7)), day(2024, 3, 8));
    }

    #[test]
    fn crosses_month_and_year_ends() {
        // 2024-12-31 is a Tuesday, 2025-01-31 a Friday.
        assert_eq!(next_working_day(day(2024, 12, 31)), day(2025, 1, 1));
        assert_eq!(next_working_day(day(2025, 1, 31)), day(2025, 2, 3));
    }
}
