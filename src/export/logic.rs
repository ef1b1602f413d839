// src/export/logic.rs

use crate::core::aggregate::aggregate;
use crate::db::employees::list_employees;
use crate::db::store::DayRecordStore;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{DayRecordExport, TotalsExport};
use crate::models::{Employee, OvertimeConfig, Period};
use crate::ui::messages::warning;
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// What to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportContent {
    /// One row per stored day record.
    DayRecords,
    /// One row of period totals per employee.
    Totals,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export stored results of `period`.
    ///
    /// - `file` must be an absolute path
    /// - `employee`: restrict to one employee, otherwise everyone
    /// - `overtime`: used for `ExportContent::Totals`
    ///
    /// Returns the number of rows written (0 means no file was written).
    #[allow(clippy::too_many_arguments)]
    pub fn export(
        conn: &Connection,
        format: ExportFormat,
        file: &str,
        period: &Period,
        employee: Option<&Employee>,
        content: ExportContent,
        overtime: &OvertimeConfig,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let employees = match employee {
            Some(e) => vec![e.clone()],
            None => list_employees(conn)?,
        };

        // one snapshot for the whole file
        let tx = conn.unchecked_transaction()?;
        let written = match content {
            ExportContent::DayRecords => {
                let mut rows = Vec::new();
                for emp in &employees {
                    for rec in tx.records_for(emp.id, period)? {
                        rows.push(DayRecordExport::new(emp, &rec));
                    }
                }
                write_rows(&rows, format, path, period)?
            }
            ExportContent::Totals => {
                let mut rows = Vec::new();
                for emp in &employees {
                    let totals = aggregate(&*tx, emp.id, period, overtime)?;
                    if totals.days > 0 {
                        rows.push(TotalsExport::new(emp, &totals));
                    }
                }
                write_rows(&rows, format, path, period)?
            }
        };
        tx.finish()?;

        Ok(written)
    }
}

fn write_rows<T: Serialize>(
    rows: &[T],
    format: ExportFormat,
    path: &Path,
    period: &Period,
) -> AppResult<usize> {
    if rows.is_empty() {
        warning(format!("No day records found for {period}."));
        return Ok(0);
    }

    match format {
        ExportFormat::Csv => export_csv(rows, path)?,
        ExportFormat::Json => export_json(rows, path)?,
    }
    Ok(rows.len())
}
