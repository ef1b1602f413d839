use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Reconciled worked time for one employee on one calendar date.
///
/// Only the reconciler creates these; a recomputation replaces every record
/// of the window it covers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayRecord {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub day_hours: Decimal,
    pub night_hours: Decimal,
    pub meal_premium_units: u8,
    pub is_weekend: bool,
    pub is_holiday_50: bool,
    pub is_holiday_100: bool,
    pub note: String,
    pub period: String,
}

impl DayRecord {
    pub fn total_hours(&self) -> Decimal {
        self.day_hours + self.night_hours
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
