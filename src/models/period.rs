//! Payroll period: an inclusive date range, usually one calendar month.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidPeriod(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar month.
    pub fn month(year: i32, month: u32) -> AppResult<Self> {
        let last = month_last_day(year, month)
            .ok_or_else(|| AppError::InvalidPeriod(format!("{year}-{month:02}")))?;
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::InvalidPeriod(format!("{year}-{month:02}")))?;
        let end = NaiveDate::from_ymd_opt(year, month, last)
            .ok_or_else(|| AppError::InvalidPeriod(format!("{year}-{month:02}")))?;
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Parse a CLI period.
    ///
    /// Supports:
    /// - YYYY
    /// - YYYY-MM
    /// - YYYY-MM-DD
    /// - any of the above as `start:end` (both sides in the same shape)
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();

        if let Some((start_raw, end_raw)) = raw.split_once(':') {
            let (start, end) = (start_raw.trim(), end_raw.trim());
            if start.len() != end.len() {
                return Err(AppError::InvalidPeriod(format!(
                    "{raw}: start and end must have the same format"
                )));
            }
            let first = Self::parse_single(start)?;
            let last = Self::parse_single(end)?;
            return Self::new(first.start, last.end);
        }

        Self::parse_single(raw)
    }

    fn parse_single(r: &str) -> AppResult<Self> {
        let invalid = || AppError::InvalidPeriod(r.to_string());

        match r.len() {
            // YYYY
            4 => {
                let y: i32 = r.parse().map_err(|_| invalid())?;
                let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
                let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
                Ok(Self { start: d1, end: d2 })
            }
            // YYYY-MM
            7 => {
                let y: i32 = r[0..4].parse().map_err(|_| invalid())?;
                let m: u32 = r[5..7].parse().map_err(|_| invalid())?;
                Self::month(y, m)
            }
            // YYYY-MM-DD
            10 => {
                let d = NaiveDate::parse_from_str(r, "%Y-%m-%d").map_err(|_| invalid())?;
                Ok(Self::single_day(d))
            }
            _ => Err(invalid()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date of the period, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Day after the last one of the period (used to fetch overnight OUTs).
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.checked_add_days(Days::new(1)).unwrap_or(self.end)
    }

    pub fn is_calendar_month(&self) -> bool {
        self.start.day() == 1
            && self.start.year() == self.end.year()
            && self.start.month() == self.end.month()
            && month_last_day(self.end.year(), self.end.month()) == Some(self.end.day())
    }

    /// Stable label stored on each `DayRecord`.
    pub fn label(&self) -> String {
        if self.is_calendar_month() {
            self.start.format("%Y-%m").to_string()
        } else {
            format!(
                "{}:{}",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            )
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub(crate) fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}
