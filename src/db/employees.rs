use crate::errors::{AppError, AppResult};
use crate::models::Employee;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashMap;

fn map_row(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        device_id: row.get("device_id")?,
        name: row.get("name")?,
    })
}

/// Register an employee, or return the existing id for that device id.
pub fn add_employee(conn: &Connection, device_id: &str, name: &str) -> AppResult<i64> {
    let device_id = device_id.trim();
    if device_id.is_empty() {
        return Err(AppError::UnknownEmployee("empty device id".into()));
    }

    conn.execute(
        "INSERT INTO employees (device_id, name, created_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(device_id) DO UPDATE SET name = excluded.name",
        params![device_id, name, Local::now().to_rfc3339()],
    )?;

    let id = conn.query_row(
        "SELECT id FROM employees WHERE device_id = ?1",
        [device_id],
        |row| row.get(0),
    )?;
    Ok(id)
}

pub fn list_employees(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare("SELECT id, device_id, name FROM employees ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_employee(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let emp = conn
        .query_row(
            "SELECT id, device_id, name FROM employees WHERE id = ?1",
            [id],
            map_row,
        )
        .optional()?;
    Ok(emp)
}

/// Look an employee up by internal id first, then by device id.
pub fn resolve_reference(conn: &Connection, reference: &str) -> AppResult<Employee> {
    if let Ok(id) = reference.trim().parse::<i64>()
        && let Some(emp) = find_employee(conn, id)?
    {
        return Ok(emp);
    }

    conn.query_row(
        "SELECT id, device_id, name FROM employees WHERE device_id = ?1",
        [reference.trim()],
        map_row,
    )
    .optional()?
    .ok_or_else(|| AppError::UnknownEmployee(reference.to_string()))
}

/// Snapshot of the directory for an import batch.
pub fn load_directory(conn: &Connection) -> AppResult<HashMap<String, i64>> {
    Ok(list_employees(conn)?
        .into_iter()
        .map(|e| (e.device_id, e.id))
        .collect())
}
