//! Storage seams used by the engine. The SQLite implementations live in the
//! sibling modules and are written against `rusqlite::Connection`, so a
//! `Transaction` (which derefs to a connection) can be passed as well.

use crate::errors::AppResult;
use crate::models::{DayRecord, Period, Punch};
use chrono::NaiveDate;
use std::collections::HashMap;

pub trait PunchStore {
    /// Stores the punch unless an identical (employee, timestamp, direction)
    /// already exists. Returns `true` when a row was written.
    fn insert_if_absent(&self, punch: &Punch) -> AppResult<bool>;

    /// Punches of one employee whose date falls in `[first, last]`, oldest
    /// first.
    fn punches_between(
        &self,
        employee_id: i64,
        first: NaiveDate,
        last: NaiveDate,
    ) -> AppResult<Vec<Punch>>;

    fn delete_punch(&self, id: i64) -> AppResult<()>;
}

pub trait DayRecordStore {
    /// Deletes every record of `employee_id` inside `period` and inserts
    /// `records`, atomically.
    fn replace_window(
        &self,
        employee_id: i64,
        period: &Period,
        records: &[DayRecord],
    ) -> AppResult<()>;

    fn records_for(&self, employee_id: i64, period: &Period) -> AppResult<Vec<DayRecord>>;
}

/// Resolves the id printed by the time-clock to the internal employee id.
pub trait EmployeeDirectory {
    fn resolve(&self, device_id: &str) -> Option<i64>;
}

impl EmployeeDirectory for HashMap<String, i64> {
    fn resolve(&self, device_id: &str) -> Option<i64> {
        self.get(device_id.trim()).copied()
    }
}
