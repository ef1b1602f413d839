//! Day reconciliation: punches → shifts → one `DayRecord` per worked date.
//!
//! A shift belongs to the calendar date of its IN punch. Its OUT may fall on
//! the following date (overnight work) but never later. Several shifts
//! starting on the same date add up into that date's single record.

use crate::db::store::{DayRecordStore, PunchStore};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Calendars, DayRecord, Direction, HolidayPremium, Period, Punch, ReconcilePolicy,
};
use crate::utils::time::{hours_between, round2};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const NIGHT_START_HOUR: u32 = 22;
const MEAL_UNITS_CAP: u8 = 2;

/// A paired IN/OUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub in_at: NaiveDateTime,
    pub out_at: NaiveDateTime,
    /// OUT was made up from the policy cut-off.
    pub synthesized: bool,
}

/// Hours of one shift, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftHours {
    pub raw: Decimal,
    pub day: Decimal,
    pub night: Decimal,
}

/// Result of reconciling one employee over one period.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Reconciliation {
    pub records: Vec<DayRecord>,
    /// INs without OUT that received the default OUT.
    pub gaps_synthesized: usize,
    /// INs without OUT under `ignore_days_without_out`; their whole date
    /// gets no record.
    pub gaps_skipped: usize,
    /// OUTs with no IN before them.
    pub orphan_outs: usize,
    /// Dates whose computed duration was zero or negative.
    pub discarded_days: usize,
}

#[derive(Default)]
struct DayAcc {
    raw: Decimal,
    day: Decimal,
    night: Decimal,
    notes: Vec<String>,
}

/// OUT used when the IN has none.
///
/// Only the hour of the cut-off counts: the OUT is minute 59 of that hour,
/// so "18:00" and "18:30" both give 18:59:00.
pub fn synthesized_out(in_at: NaiveDateTime, default_out: NaiveTime) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(default_out.hour(), 59, 0).unwrap_or(default_out);
    in_at.date().and_time(time)
}

/// Split a shift into day and night hours.
///
/// The night boundary is 22:00 of the OUT's own calendar date, so a shift
/// ending the next morning before 22:00 carries no night hours.
pub fn shift_hours(in_at: NaiveDateTime, out_at: NaiveDateTime) -> ShiftHours {
    let mut raw = hours_between(in_at, out_at);

    if raw < Decimal::ZERO {
        // OUT is on the clock before IN: count to the end of IN's day, then
        // from the start of OUT's day.
        let end_of_in_day = in_at.date().and_time(
            NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        );
        let start_of_out_day = out_at.date().and_time(NaiveTime::MIN);
        raw = hours_between(in_at, end_of_in_day) + hours_between(start_of_out_day, out_at);
    }

    let boundary = out_at.date().and_time(
        NaiveTime::from_hms_opt(NIGHT_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
    );

    let night = if out_at > boundary {
        hours_between(boundary, out_at).min(raw).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    ShiftHours {
        raw,
        day: raw - night,
        night,
    }
}

/// Meal premium units for one day's (unrounded) hours.
pub fn meal_units(day: Decimal, night: Decimal, policy: &ReconcilePolicy) -> u8 {
    if !policy.meal_premium_auto {
        return 0;
    }
    let mut units = 0u8;
    if day >= policy.meal_day_threshold {
        units += 1;
    }
    if night >= policy.meal_night_threshold {
        units += 1;
    }
    units.min(MEAL_UNITS_CAP)
}

/// Index of the OUT closing the IN at `in_idx`, if any.
///
/// Takes the nearest unconsumed OUT after the IN, on the IN's date or the
/// next one. The search gives up at an IN dated after the shift's own date:
/// that punch opens another day's work.
fn find_out(punches: &[Punch], consumed: &[bool], in_idx: usize) -> Option<usize> {
    let in_date = punches[in_idx].date();
    let last_date = in_date.checked_add_days(Days::new(1))?;

    for (j, p) in punches.iter().enumerate().skip(in_idx + 1) {
        if p.date() > last_date {
            return None;
        }
        match p.direction {
            Direction::In if p.date() > in_date => return None,
            Direction::In => continue,
            Direction::Out if !consumed[j] => return Some(j),
            Direction::Out => continue,
        }
    }
    None
}

/// Punches paired into shifts.
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    pub shifts: Vec<Shift>,
    /// IN dates left without an OUT under `ignore_days_without_out`; no
    /// record is produced for them.
    pub skipped_dates: BTreeSet<NaiveDate>,
    pub stats: Reconciliation,
}

/// Pair punches into shifts.
///
/// INs dated from the day before `period` to its end open shifts; the day
/// before only consumes OUTs of shifts started earlier. Gaps and orphan OUTs
/// are counted only inside `period`.
pub fn pair_shifts(
    punches: &[Punch],
    period: &Period,
    policy: &ReconcilePolicy,
    cancel: &CancellationToken,
) -> AppResult<Pairing> {
    let mut sorted = punches.to_vec();
    sorted.sort_by_key(|p| (p.timestamp, p.direction));

    let from = period.start.checked_sub_days(Days::new(1)).unwrap_or(period.start);
    let mut consumed = vec![false; sorted.len()];
    let mut pairing = Pairing::default();

    for i in 0..sorted.len() {
        let p = &sorted[i];
        if consumed[i] || !p.direction.is_in() || p.date() < from || p.date() > period.end {
            continue;
        }
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        consumed[i] = true;

        match find_out(&sorted, &consumed, i) {
            Some(j) => {
                // repeated badges between IN and OUT belong to the same shift
                for k in i + 1..j {
                    if sorted[k].direction.is_in() && !consumed[k] {
                        debug!(at = %sorted[k].timestamp, "absorbing repeated IN");
                        consumed[k] = true;
                    }
                }
                consumed[j] = true;
                pairing.shifts.push(Shift {
                    in_at: p.timestamp,
                    out_at: sorted[j].timestamp,
                    synthesized: false,
                });
            }
            None if !period.contains(p.date()) => {
                debug!(at = %p.timestamp, "IN without OUT before the period");
            }
            None if policy.ignore_days_without_out => {
                warn!(
                    employee = p.employee_id,
                    at = %p.timestamp,
                    "IN without OUT, day skipped"
                );
                pairing.skipped_dates.insert(p.date());
                pairing.stats.gaps_skipped += 1;
            }
            None => {
                let out_at = synthesized_out(p.timestamp, policy.default_out_time);
                warn!(
                    employee = p.employee_id,
                    at = %p.timestamp,
                    out = %out_at,
                    "IN without OUT, default OUT applied"
                );
                pairing.stats.gaps_synthesized += 1;
                pairing.shifts.push(Shift {
                    in_at: p.timestamp,
                    out_at,
                    synthesized: true,
                });
            }
        }
    }

    for (i, p) in sorted.iter().enumerate() {
        if !consumed[i] && p.direction.is_out() && period.contains(p.date()) {
            warn!(employee = p.employee_id, at = %p.timestamp, "OUT without IN ignored");
            pairing.stats.orphan_outs += 1;
        }
    }

    Ok(pairing)
}

/// Pure reconciliation over an in-memory punch list.
///
/// `punches` should cover the day before the period (to recognise OUTs of
/// shifts started earlier) and the day after it (OUTs of overnight shifts).
pub fn reconcile_punches(
    employee_id: i64,
    punches: &[Punch],
    period: &Period,
    policy: &ReconcilePolicy,
    calendars: &Calendars,
    cancel: &CancellationToken,
) -> AppResult<Reconciliation> {
    let own: Vec<Punch> = punches
        .iter()
        .filter(|p| p.employee_id == employee_id)
        .cloned()
        .collect();

    let Pairing {
        shifts,
        skipped_dates,
        stats: mut result,
    } = pair_shifts(&own, period, policy, cancel)?;

    let mut days: BTreeMap<NaiveDate, DayAcc> = BTreeMap::new();
    for shift in shifts.iter().filter(|s| {
        let date = s.in_at.date();
        period.contains(date) && !skipped_dates.contains(&date)
    }) {
        let hours = shift_hours(shift.in_at, shift.out_at);
        if hours.raw <= Decimal::ZERO {
            warn!(
                employee = employee_id,
                in_at = %shift.in_at,
                out_at = %shift.out_at,
                "non-positive shift discarded"
            );
            continue;
        }

        let acc = days.entry(shift.in_at.date()).or_default();
        acc.raw += hours.raw;
        acc.day += hours.day;
        acc.night += hours.night;
        if shift.synthesized {
            acc.notes.push(format!(
                "default OUT {} applied",
                shift.out_at.format("%H:%M:%S")
            ));
        }
    }

    let label = period.label();
    for date in period.days() {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        let Some(acc) = days.remove(&date) else {
            continue;
        };

        let day_hours = round2(acc.day);
        let night_hours = round2(acc.night);
        if acc.raw <= Decimal::ZERO || day_hours + night_hours <= Decimal::ZERO {
            result.discarded_days += 1;
            continue;
        }

        let holiday = calendars.holidays.premium_for(date);
        result.records.push(DayRecord {
            employee_id,
            date,
            day_hours,
            night_hours,
            meal_premium_units: meal_units(acc.day, acc.night, policy),
            is_weekend: calendars.weekly.is_weekend(date),
            is_holiday_50: holiday == Some(HolidayPremium::Fifty),
            is_holiday_100: holiday == Some(HolidayPremium::Hundred),
            note: acc.notes.join("; "),
            period: label.clone(),
        });
    }

    Ok(result)
}

/// Recompute and persist the day records of one employee over `period`.
///
/// Every stored record of the window is replaced in one transaction; on any
/// error (or cancellation) nothing in the window changes.
pub fn reconcile<S>(
    store: &S,
    employee_id: i64,
    period: &Period,
    policy: &ReconcilePolicy,
    calendars: &Calendars,
    cancel: &CancellationToken,
) -> AppResult<Reconciliation>
where
    S: PunchStore + DayRecordStore + ?Sized,
{
    let first = period.start.checked_sub_days(Days::new(1)).unwrap_or(period.start);
    let punches = store.punches_between(employee_id, first, period.end_exclusive())?;

    let result = reconcile_punches(employee_id, &punches, period, policy, calendars, cancel)?;

    if cancel.is_cancelled() {
        return Err(AppError::Cancelled);
    }
    store.replace_window(employee_id, period, &result.records)?;

    debug!(
        employee = employee_id,
        period = %period,
        records = result.records.len(),
        "window replaced"
    );
    Ok(result)
}
