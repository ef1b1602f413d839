use crate::db::store::PunchStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Direction, Punch, PunchSource};
use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Row, params};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn conversion_error(what: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidTime(what)),
    )
}

pub fn map_row(row: &Row) -> rusqlite::Result<Punch> {
    let ts_str: String = row.get("ts")?;
    let timestamp = NaiveDateTime::parse_from_str(&ts_str, TS_FORMAT)
        .map_err(|_| conversion_error(format!("Invalid timestamp: {}", ts_str)))?;

    let dir_str: String = row.get("direction")?;
    let direction = Direction::from_db_str(&dir_str)
        .ok_or_else(|| conversion_error(format!("Invalid direction: {}", dir_str)))?;

    let src_str: String = row.get("source")?;
    let source = PunchSource::from_db_str(&src_str)
        .ok_or_else(|| conversion_error(format!("Invalid source: {}", src_str)))?;

    Ok(Punch {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        timestamp,
        direction,
        source,
    })
}

fn day_start(d: NaiveDate) -> String {
    d.format("%Y-%m-%d 00:00:00").to_string()
}

impl PunchStore for Connection {
    fn insert_if_absent(&self, punch: &Punch) -> AppResult<bool> {
        let mut stmt = self.prepare_cached(
            "INSERT OR IGNORE INTO punches (employee_id, ts, direction, source, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let written = stmt.execute(params![
            punch.employee_id,
            punch.timestamp.format(TS_FORMAT).to_string(),
            punch.direction.to_db_str(),
            punch.source.to_db_str(),
            Local::now().to_rfc3339(),
        ])?;
        Ok(written == 1)
    }

    fn punches_between(
        &self,
        employee_id: i64,
        first: NaiveDate,
        last: NaiveDate,
    ) -> AppResult<Vec<Punch>> {
        let upper = last.checked_add_days(Days::new(1)).unwrap_or(last);

        let mut stmt = self.prepare_cached(
            "SELECT id, employee_id, ts, direction, source FROM punches
             WHERE employee_id = ?1 AND ts >= ?2 AND ts < ?3
             ORDER BY ts ASC, direction ASC",
        )?;
        let rows = stmt.query_map(
            params![employee_id, day_start(first), day_start(upper)],
            map_row,
        )?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn delete_punch(&self, id: i64) -> AppResult<()> {
        let deleted = self.execute("DELETE FROM punches WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(AppError::PunchNotFound(id));
        }
        Ok(())
    }
}

pub fn count_punches(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM punches", [], |row| row.get(0))?)
}
