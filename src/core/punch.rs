use crate::db::log::audit_quiet;
use crate::db::store::PunchStore;
use crate::errors::AppResult;
use crate::models::{Direction, Employee, Period, Punch, PunchSource};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;

/// Manual punch maintenance (corrections entered by an operator).
pub struct PunchLogic;

impl PunchLogic {
    /// Record a manual punch. Returns `false` when the same punch exists.
    pub fn add(
        conn: &Connection,
        employee: &Employee,
        date: NaiveDate,
        time: NaiveTime,
        direction: Direction,
    ) -> AppResult<bool> {
        let punch = Punch::new(
            employee.id,
            date.and_time(time),
            direction,
            PunchSource::Manual,
        );
        let written = conn.insert_if_absent(&punch)?;

        if written {
            audit_quiet(
                conn,
                "punch_add",
                &employee.device_id,
                &format!(
                    "{} {} {}",
                    punch.date_str(),
                    punch.time_str(),
                    direction.to_db_str()
                ),
            );
        }
        Ok(written)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        conn.delete_punch(id)?;
        audit_quiet(conn, "punch_del", &id.to_string(), "punch deleted");
        Ok(())
    }

    pub fn list(conn: &Connection, employee: &Employee, period: &Period) -> AppResult<Vec<Punch>> {
        conn.punches_between(employee.id, period.start, period.end)
    }
}
