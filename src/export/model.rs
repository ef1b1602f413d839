// src/export/model.rs

use crate::models::{DayRecord, Employee, PeriodOvertimeTotals};
use crate::utils::formatting::hours2;
use serde::Serialize;

/// Flat day record row for downstream consumers. Hours are written as fixed
/// two-decimal strings so no consumer sees binary floats.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DayRecordExport {
    pub employee_id: i64,
    pub device_id: String,
    pub name: String,
    pub date: String,
    pub day_hours: String,
    pub night_hours: String,
    pub meal_premium_units: u8,
    pub is_weekend: bool,
    pub is_holiday_50: bool,
    pub is_holiday_100: bool,
    pub note: String,
    pub period: String,
}

impl DayRecordExport {
    pub fn new(employee: &Employee, rec: &DayRecord) -> Self {
        Self {
            employee_id: rec.employee_id,
            device_id: employee.device_id.clone(),
            name: employee.name.clone(),
            date: rec.date_str(),
            day_hours: hours2(rec.day_hours),
            night_hours: hours2(rec.night_hours),
            meal_premium_units: rec.meal_premium_units,
            is_weekend: rec.is_weekend,
            is_holiday_50: rec.is_holiday_50,
            is_holiday_100: rec.is_holiday_100,
            note: rec.note.clone(),
            period: rec.period.clone(),
        }
    }
}

/// Period totals row, one per employee.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TotalsExport {
    pub employee_id: i64,
    pub device_id: String,
    pub name: String,
    pub period: String,
    pub days: usize,
    pub day_hours: String,
    pub night_hours: String,
    pub meal_premium_units: u32,
    pub weekend_hours: String,
    pub holiday_hours: String,
    pub excess_hours: String,
    pub hs115: String,
    pub hs140: String,
    pub hs150: String,
    pub hs200: String,
}

impl TotalsExport {
    pub fn new(employee: &Employee, t: &PeriodOvertimeTotals) -> Self {
        Self {
            employee_id: t.employee_id,
            device_id: employee.device_id.clone(),
            name: employee.name.clone(),
            period: t.period.clone(),
            days: t.days,
            day_hours: hours2(t.day_hours_total),
            night_hours: hours2(t.night_hours_total),
            meal_premium_units: t.meal_premium_units,
            weekend_hours: hours2(t.weekend_hours),
            holiday_hours: hours2(t.holiday_hours),
            excess_hours: hours2(t.excess_hours),
            hs115: hours2(t.hs115),
            hs140: hours2(t.hs140),
            hs150: hours2(t.hs150),
            hs200: hours2(t.hs200),
        }
    }
}
