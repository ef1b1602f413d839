use crate::errors::{AppError, AppResult};
use crate::models::{Holiday, HolidayCalendar, HolidayPremium, WeekdayEntry, WeeklyCalendar};
use crate::utils::date::{weekday_from_db, weekday_to_db};
use crate::utils::time::parse_time;
use chrono::{NaiveDate, Weekday};
use rusqlite::{Connection, params};

pub fn load_weekly_calendar(conn: &Connection) -> AppResult<WeeklyCalendar> {
    let mut stmt = conn.prepare(
        "SELECT weekday, begin_time, end_time, is_weekend FROM weekly_calendar ORDER BY weekday",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i32>(3)? == 1,
        ))
    })?;

    let mut entries = Vec::new();
    for r in rows {
        let (wd, begin, end, is_weekend) = r?;
        let weekday = weekday_from_db(wd)
            .ok_or_else(|| AppError::Config(format!("invalid weekday index {wd}")))?;
        entries.push(WeekdayEntry {
            weekday,
            begin: parse_time(&begin).ok_or(AppError::InvalidTime(begin))?,
            end: parse_time(&end).ok_or(AppError::InvalidTime(end))?,
            is_weekend,
        });
    }

    WeeklyCalendar::from_entries(entries)
}

/// Flag exactly `weekend` as weekend days; every other weekday becomes a
/// working day.
pub fn set_weekend_days(conn: &Connection, weekend: &[Weekday]) -> AppResult<()> {
    let tx = rusqlite::Transaction::new_unchecked(conn, rusqlite::TransactionBehavior::Immediate)?;
    for entry in WeeklyCalendar::with_weekend(weekend).entries() {
        tx.execute(
            "UPDATE weekly_calendar SET is_weekend = ?1 WHERE weekday = ?2",
            params![entry.is_weekend as i32, weekday_to_db(entry.weekday)],
        )?;
    }
    tx.commit()?;
    Ok(())
}

pub fn load_holidays(conn: &Connection) -> AppResult<HolidayCalendar> {
    let mut stmt = conn.prepare("SELECT date, premium, label FROM holidays ORDER BY date")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, u8>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (date, premium, label) = r?;
        out.push(Holiday {
            date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| AppError::InvalidDate(date.clone()))?,
            premium: HolidayPremium::from_percent(premium)
                .ok_or_else(|| AppError::Config(format!("invalid holiday premium {premium}")))?,
            label,
        });
    }
    Ok(HolidayCalendar::new(out))
}

pub fn upsert_holiday(conn: &Connection, holiday: &Holiday) -> AppResult<()> {
    conn.execute(
        "INSERT INTO holidays (date, premium, label) VALUES (?1, ?2, ?3)
         ON CONFLICT(date) DO UPDATE SET premium = excluded.premium, label = excluded.label",
        params![
            holiday.date.format("%Y-%m-%d").to_string(),
            holiday.premium.percent(),
            holiday.label,
        ],
    )?;
    Ok(())
}

pub fn delete_holiday(conn: &Connection, date: NaiveDate) -> AppResult<bool> {
    let n = conn.execute(
        "DELETE FROM holidays WHERE date = ?1",
        [date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(n > 0)
}

pub fn load_calendars(conn: &Connection) -> AppResult<crate::models::Calendars> {
    Ok(crate::models::Calendars {
        weekly: load_weekly_calendar(conn)?,
        holidays: load_holidays(conn)?,
    })
}
