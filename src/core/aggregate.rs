//! Period totals, derived from stored day records only.

use crate::core::overtime::classify;
use crate::db::store::DayRecordStore;
use crate::errors::AppResult;
use crate::models::{DayRecord, OvertimeConfig, Period, PeriodOvertimeTotals};
use crate::utils::time::round2;
use rust_decimal::Decimal;

/// Sum a slice of records belonging to one employee and period.
pub fn aggregate_records(
    employee_id: i64,
    period: &Period,
    records: &[DayRecord],
    overtime: &OvertimeConfig,
) -> AppResult<PeriodOvertimeTotals> {
    let mut day = Decimal::ZERO;
    let mut night = Decimal::ZERO;
    let mut weekend = Decimal::ZERO;
    let mut holiday = Decimal::ZERO;
    let mut meals = 0u32;
    let mut days = 0usize;

    for rec in records
        .iter()
        .filter(|r| r.employee_id == employee_id && period.contains(r.date))
    {
        days += 1;
        day += rec.day_hours;
        night += rec.night_hours;
        meals += u32::from(rec.meal_premium_units);
        if rec.is_weekend {
            weekend += rec.total_hours();
        }
        if rec.is_holiday_50 || rec.is_holiday_100 {
            holiday += rec.total_hours();
        }
    }

    let worked = day + night;
    let excess = round2((worked - overtime.contract_hours).max(Decimal::ZERO));
    let tiers = classify(excess, &overtime.tiers)?;

    Ok(PeriodOvertimeTotals {
        employee_id,
        period: period.label(),
        days,
        day_hours_total: round2(day),
        night_hours_total: round2(night),
        meal_premium_units: meals,
        weekend_hours: round2(weekend),
        holiday_hours: round2(holiday),
        excess_hours: excess,
        hs115: tiers.hs115,
        hs140: tiers.hs140,
        hs150: tiers.hs150,
        hs200: tiers.hs200,
    })
}

/// Read-only totals for one employee over one period.
pub fn aggregate<S: DayRecordStore + ?Sized>(
    store: &S,
    employee_id: i64,
    period: &Period,
    overtime: &OvertimeConfig,
) -> AppResult<PeriodOvertimeTotals> {
    let records = store.records_for(employee_id, period)?;
    aggregate_records(employee_id, period, &records, overtime)
}
