use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the weekly calendar.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WeekdayEntry {
    pub weekday: Weekday,
    pub begin: NaiveTime,
    pub end: NaiveTime,
    pub is_weekend: bool,
}

/// Per-weekday working hours and weekend flags. Always holds exactly
/// seven entries, Monday first.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeeklyCalendar {
    entries: [WeekdayEntry; 7],
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl Default for WeeklyCalendar {
    fn default() -> Self {
        Self::with_weekend(&[Weekday::Sat, Weekday::Sun])
    }
}

impl WeeklyCalendar {
    /// Mon–Fri style calendar (08:00–17:00) where `weekend` days are flagged.
    pub fn with_weekend(weekend: &[Weekday]) -> Self {
        let begin = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);
        let end = NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN);

        let entries = WEEK.map(|weekday| WeekdayEntry {
            weekday,
            begin,
            end,
            is_weekend: weekend.contains(&weekday),
        });

        Self { entries }
    }

    /// Build from stored rows. Every weekday must appear exactly once.
    pub fn from_entries(rows: Vec<WeekdayEntry>) -> AppResult<Self> {
        let mut entries = Self::default().entries;
        let mut seen = [false; 7];

        for row in rows {
            let idx = row.weekday.num_days_from_monday() as usize;
            if seen[idx] {
                return Err(AppError::Config(format!(
                    "weekday {} configured twice",
                    row.weekday
                )));
            }
            seen[idx] = true;
            entries[idx] = row;
        }

        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(AppError::Config(format!(
                "weekday {} missing from calendar",
                WEEK[missing]
            )));
        }

        Ok(Self { entries })
    }

    pub fn entry(&self, weekday: Weekday) -> &WeekdayEntry {
        &self.entries[weekday.num_days_from_monday() as usize]
    }

    pub fn entries(&self) -> &[WeekdayEntry] {
        &self.entries
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.entry(date.weekday()).is_weekend
    }
}

/// Premium paid for work on a public holiday.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum HolidayPremium {
    Fifty,
    Hundred,
}

impl HolidayPremium {
    pub fn percent(&self) -> u8 {
        match self {
            HolidayPremium::Fifty => 50,
            HolidayPremium::Hundred => 100,
        }
    }

    pub fn from_percent(p: u8) -> Option<Self> {
        match p {
            50 => Some(HolidayPremium::Fifty),
            100 => Some(HolidayPremium::Hundred),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub premium: HolidayPremium,
    pub label: String,
}

/// Dated public holidays.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HolidayCalendar {
    by_date: BTreeMap<NaiveDate, Holiday>,
}

impl HolidayCalendar {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self {
            by_date: holidays.into_iter().map(|h| (h.date, h)).collect(),
        }
    }

    pub fn premium_for(&self, date: NaiveDate) -> Option<HolidayPremium> {
        self.by_date.get(&date).map(|h| h.premium)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.by_date.values()
    }
}

/// Reference data the reconciler reads: weekly calendar plus holidays.
/// Loaded once per job and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Calendars {
    pub weekly: WeeklyCalendar,
    pub holidays: HolidayCalendar,
}
