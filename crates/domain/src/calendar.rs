use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A calendar month as selected by the dashboard filter (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DomainError::InvalidMonth(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidMonth(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next_first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    fn next_first_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
    }

    /// Half-open range `[start, end)`: the first day at midnight up to the
    /// first day of the following month at midnight.
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        (
            self.first_day().and_time(NaiveTime::MIN),
            self.next_first_day().and_time(NaiveTime::MIN),
        )
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Long English date used in student-facing messages, e.g. "Monday, May 5, 2025".
pub fn format_lesson_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Sunday on or before `date`; the instructor's weekly counters start there.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_sunday());
    date - Duration::days(offset)
}

/// Parses an `HH:MM` wall-clock time.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, DomainError> {
    let trimmed = value.trim();
    if trimmed.len() != 5 {
        return Err(DomainError::InvalidTime(value.to_string()));
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| DomainError::InvalidTime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_month_and_rejects_garbage() {
        let month = YearMonth::parse("2024-02").unwrap();
        assert_eq!((month.year(), month.month()), (2024, 2));
        assert_eq!(month.to_string(), "2024-02");
        assert_eq!(YearMonth::parse("2024-2").unwrap().month(), 2);

        for bad in ["2024", "2024-13", "2024-00", "24-01", "abcd-ef", ""] {
            assert!(YearMonth::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn month_bounds_cover_leap_february() {
        let (start, end) = YearMonth::parse("2024-02").unwrap().bounds();
        assert_eq!(start.to_string(), "2024-02-01 00:00:00");
        assert_eq!(end.to_string(), "2024-03-01 00:00:00");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let december = YearMonth::parse("2025-12").unwrap();
        assert_eq!(december.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn lesson_dates_render_in_long_form() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        assert_eq!(format_lesson_date(date), "Monday, May 5, 2025");
    }

    #[test]
    fn week_starts_on_sunday() {
        let wednesday = NaiveDate::from_ymd_opt(2025, 5, 7).unwrap();
        assert_eq!(start_of_week(wednesday), NaiveDate::from_ymd_opt(2025, 5, 4).unwrap());
        let sunday = NaiveDate::from_ymd_opt(2025, 5, 4).unwrap();
        assert_eq!(start_of_week(sunday), sunday);
    }

    #[test]
    fn clock_times_need_hours_and_minutes() {
        assert_eq!(
            parse_clock_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_clock_time("9:30").is_err());
        assert!(parse_clock_time("25:00").is_err());
    }
}
