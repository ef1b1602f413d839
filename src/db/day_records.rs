use crate::db::store::DayRecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::{DayRecord, Period};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, Row, Transaction, TransactionBehavior, params};
use rust_decimal::Decimal;
use std::str::FromStr;

fn conversion_error(what: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidDate(what)),
    )
}

fn decimal_col(row: &Row, col: &str) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(col)?;
    Decimal::from_str(&raw).map_err(|_| conversion_error(format!("{col}: {raw}")))
}

pub fn map_row(row: &Row) -> rusqlite::Result<DayRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(date_str.clone()))?;

    Ok(DayRecord {
        employee_id: row.get("employee_id")?,
        date,
        day_hours: decimal_col(row, "day_hours")?,
        night_hours: decimal_col(row, "night_hours")?,
        meal_premium_units: row.get("meal_units")?,
        is_weekend: row.get::<_, i32>("is_weekend")? == 1,
        is_holiday_50: row.get::<_, i32>("is_holiday_50")? == 1,
        is_holiday_100: row.get::<_, i32>("is_holiday_100")? == 1,
        note: row.get("note")?,
        period: row.get("period")?,
    })
}

fn insert_record(conn: &Connection, rec: &DayRecord, computed_at: &str) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO day_records (employee_id, date, day_hours, night_hours, meal_units,
                                  is_weekend, is_holiday_50, is_holiday_100, note, period, computed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    stmt.execute(params![
        rec.employee_id,
        rec.date_str(),
        rec.day_hours.to_string(),
        rec.night_hours.to_string(),
        rec.meal_premium_units,
        rec.is_weekend as i32,
        rec.is_holiday_50 as i32,
        rec.is_holiday_100 as i32,
        rec.note,
        rec.period,
        computed_at,
    ])?;
    Ok(())
}

impl DayRecordStore for Connection {
    fn replace_window(
        &self,
        employee_id: i64,
        period: &Period,
        records: &[DayRecord],
    ) -> AppResult<()> {
        // Dropping the transaction without commit rolls the window back.
        let tx = Transaction::new_unchecked(self, TransactionBehavior::Immediate)?;

        tx.execute(
            "DELETE FROM day_records WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3",
            params![
                employee_id,
                period.start.format("%Y-%m-%d").to_string(),
                period.end.format("%Y-%m-%d").to_string(),
            ],
        )?;

        let computed_at = Local::now().to_rfc3339();
        for rec in records {
            if rec.employee_id != employee_id || !period.contains(rec.date) {
                return Err(AppError::OutsideWindow(format!(
                    "{} / {} not in {}",
                    rec.employee_id, rec.date, period
                )));
            }
            insert_record(&tx, rec, &computed_at)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn records_for(&self, employee_id: i64, period: &Period) -> AppResult<Vec<DayRecord>> {
        let mut stmt = self.prepare_cached(
            "SELECT * FROM day_records
             WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(
            params![
                employee_id,
                period.start.format("%Y-%m-%d").to_string(),
                period.end.format("%Y-%m-%d").to_string(),
            ],
            map_row,
        )?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}
