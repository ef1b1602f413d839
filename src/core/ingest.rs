//! Punch ingestion: raw device / spreadsheet rows → canonical `Punch`es.
//!
//! Row-level problems never abort a batch. They are collected into the
//! `ImportSummary` so the caller can show counts and reasons at the end.

use crate::config::ImportLayout;
use crate::db::log::audit_quiet;
use crate::db::store::{EmployeeDirectory, PunchStore};
use crate::db::employees::load_directory;
use crate::errors::AppResult;
use crate::models::{Direction, Punch};
use crate::utils::time::parse_time;
use chrono::NaiveTime;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One line of an import file, split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new<S: Into<String>>(line: usize, fields: Vec<S>) -> Self {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("line {line}: unknown device employee id '{device_id}'")]
    Lookup { line: usize, device_id: String },
}

impl RowError {
    pub fn line(&self) -> usize {
        match self {
            RowError::Parse { line, .. } | RowError::Lookup { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub parse_errors: usize,
    pub lookup_errors: usize,
    /// (line, reason) for every skipped row.
    pub issues: Vec<(usize, String)>,
    pub cancelled: bool,
}

impl ImportSummary {
    pub fn skipped(&self) -> usize {
        self.parse_errors + self.lookup_errors
    }

    fn record(&mut self, err: &RowError) {
        match err {
            RowError::Parse { .. } => self.parse_errors += 1,
            RowError::Lookup { .. } => self.lookup_errors += 1,
        }
        self.issues.push((err.line(), err.to_string()));
    }
}

/// Device clocks print "hh:mm:ss a"; the value is brought to 24-hour
/// "HH:mm" (seconds dropped) before use. Plain 24-hour values pass through
/// with the same minute precision.
pub fn parse_device_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();

    let parsed = NaiveTime::parse_from_str(raw, "%I:%M:%S %p")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%I:%M %p"))
        .ok()
        .or_else(|| parse_time(raw))?;

    let hhmm = parsed.format("%H:%M").to_string();
    NaiveTime::parse_from_str(&hhmm, "%H:%M").ok()
}

fn parse_direction(raw: &str, layout: &ImportLayout) -> Option<Direction> {
    let token = raw.trim().to_lowercase();
    if layout.in_tokens.iter().any(|t| t.to_lowercase() == token) {
        Some(Direction::In)
    } else if layout.out_tokens.iter().any(|t| t.to_lowercase() == token) {
        Some(Direction::Out)
    } else {
        None
    }
}

fn field<'a>(row: &'a RawRow, idx: usize, name: &str) -> Result<&'a str, RowError> {
    match row.fields.get(idx).map(|s| s.trim()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RowError::Parse {
            line: row.line,
            reason: format!("missing {name} (column {idx})"),
        }),
    }
}

/// Turn one raw row into a `Punch`.
pub fn normalize<D: EmployeeDirectory + ?Sized>(
    row: &RawRow,
    layout: &ImportLayout,
    directory: &D,
) -> Result<Punch, RowError> {
    let device_id = field(row, layout.employee_col, "employee id")?;
    let date_raw = field(row, layout.date_col, "date")?;
    let time_raw = field(row, layout.time_col, "time")?;
    let dir_raw = field(row, layout.direction_col, "direction")?;

    let date = layout
        .date_pattern
        .parse(date_raw)
        .ok_or_else(|| RowError::Parse {
            line: row.line,
            reason: format!(
                "date '{}' does not match {}",
                date_raw,
                layout.date_pattern.label()
            ),
        })?;

    let time = parse_device_time(time_raw).ok_or_else(|| RowError::Parse {
        line: row.line,
        reason: format!("invalid time '{time_raw}'"),
    })?;

    let direction = parse_direction(dir_raw, layout).ok_or_else(|| RowError::Parse {
        line: row.line,
        reason: format!("unknown direction '{dir_raw}'"),
    })?;

    let employee_id = directory
        .resolve(device_id)
        .ok_or_else(|| RowError::Lookup {
            line: row.line,
            device_id: device_id.to_string(),
        })?;

    Ok(Punch::new(
        employee_id,
        date.and_time(time),
        direction,
        layout.source,
    ))
}

/// Rows read from an import file.
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub rows: Vec<RawRow>,
    /// Data rows that could not be decoded as text.
    pub unreadable: Vec<RowError>,
}

/// Read a delimited file into raw rows, starting at `first_data_row`.
///
/// A data row that is not valid UTF-8 is reported in `unreadable` and the
/// rest of the file is still read.
pub fn read_rows(path: &Path, layout: &ImportLayout) -> AppResult<SourceRows> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(layout.delimiter_byte())
        .from_path(path)?;

    let mut out = SourceRows::default();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);

        if line < layout.first_data_row
            || record.iter().all(|f| f.iter().all(u8::is_ascii_whitespace))
        {
            continue;
        }

        let mut fields = Vec::with_capacity(record.len());
        let mut bad_col = None;
        for (col, raw) in record.iter().enumerate() {
            match std::str::from_utf8(raw) {
                Ok(f) => fields.push(f.to_string()),
                Err(_) => {
                    bad_col = Some(col);
                    break;
                }
            }
        }

        match bad_col {
            Some(col) => out.unreadable.push(RowError::Parse {
                line,
                reason: format!("column {col} is not valid UTF-8"),
            }),
            None => out.rows.push(RawRow { line, fields }),
        }
    }

    Ok(out)
}

/// Normalize and store a batch of rows.
///
/// Duplicates (same employee, timestamp and direction) are counted, never
/// stored twice. Cancellation is checked before each row; everything stored
/// up to that point stays valid.
pub fn import_rows<S, D>(
    rows: &[RawRow],
    layout: &ImportLayout,
    directory: &D,
    store: &S,
    cancel: &CancellationToken,
) -> AppResult<ImportSummary>
where
    S: PunchStore + ?Sized,
    D: EmployeeDirectory + ?Sized,
{
    let mut summary = ImportSummary::default();
    let mut seen = HashSet::new();

    for row in rows {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        summary.rows_read += 1;

        let punch = match normalize(row, layout, directory) {
            Ok(p) => p,
            Err(e) => {
                warn!(line = row.line, "skipping import row: {}", e);
                summary.record(&e);
                continue;
            }
        };

        if !seen.insert(punch.key()) {
            summary.duplicates += 1;
            continue;
        }

        if store.insert_if_absent(&punch)? {
            summary.inserted += 1;
        } else {
            debug!(line = row.line, "punch already stored");
            summary.duplicates += 1;
        }
    }

    Ok(summary)
}

/// Import a whole file in one transaction against the SQLite store.
pub fn import_file(
    conn: &Connection,
    path: &Path,
    layout: &ImportLayout,
    cancel: &CancellationToken,
) -> AppResult<ImportSummary> {
    let source = read_rows(path, layout)?;
    let directory = load_directory(conn)?;

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let mut summary = import_rows(&source.rows, layout, &directory, &*tx, cancel)?;
    tx.commit()?;

    for err in &source.unreadable {
        warn!(line = err.line(), "skipping import row: {}", err);
        summary.rows_read += 1;
        summary.record(err);
    }
    summary.issues.sort_by_key(|(line, _)| *line);

    info!(
        file = %path.display(),
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        skipped = summary.skipped(),
        cancelled = summary.cancelled,
        "import finished"
    );

    audit_quiet(
        conn,
        "import",
        &path.display().to_string(),
        &format!(
            "read={} inserted={} duplicates={} parse_errors={} lookup_errors={}{}",
            summary.rows_read,
            summary.inserted,
            summary.duplicates,
            summary.parse_errors,
            summary.lookup_errors,
            if summary.cancelled { " (cancelled)" } else { "" }
        ),
    );

    Ok(summary)
}
