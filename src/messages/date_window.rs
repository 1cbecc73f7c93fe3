use chrono::{NaiveDate, NaiveTime};
use crate::errors::AppError;
use crate::messages::timestamp::to_iso;

/// The inclusive millisecond range `[start, end]` of one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    date: NaiveDate,
    start: i64,
    end: i64,
}

impl DateWindow {

    /// Parses `YYYY-MM-DD`: exactly three numeric components forming a real calendar date.
    pub fn from_date_str(value: &str) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidDateFormat(format!("'{}' is not a valid date, expected YYYY-MM-DD", value));

        let parts: Vec<&str> = value.trim().split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };
        if !is_numeric(year, 4, 4) || !is_numeric(month, 1, 2) || !is_numeric(day, 1, 2) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        Ok(Self::for_date(date))
    }

    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        let end = start + MILLIS_PER_DAY - 1;
        DateWindow { date, start, end }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn start_iso(&self) -> String {
        to_iso(self.start).unwrap_or_default()
    }

    pub fn end_iso(&self) -> String {
        to_iso(self.end).unwrap_or_default()
    }
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

fn is_numeric(part: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}
