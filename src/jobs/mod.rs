//! Background execution: worker pool, cancellation and per-employee locks.

pub mod batch;
pub mod import;
pub mod locks;

pub use batch::{
    BatchReport, BatchRunner, JobEvent, ReconcileJob, reconcile_employee, run_reconcile,
};
pub use import::{run_import_blocking, spawn_import};
pub use locks::EmployeeLocks;
pub use tokio_util::sync::CancellationToken;

use crate::core::aggregate::aggregate;
use crate::errors::AppResult;
use crate::models::{OvertimeConfig, Period, PeriodOvertimeTotals};
use rusqlite::Connection;

/// Period totals read under the employee lock and inside one read
/// transaction, so an in-flight replace-window of the same employee is never
/// observed half done.
pub fn read_totals(
    conn: &Connection,
    locks: &EmployeeLocks,
    employee_id: i64,
    period: &Period,
    overtime: &OvertimeConfig,
) -> AppResult<PeriodOvertimeTotals> {
    locks.with_lock(employee_id, || -> AppResult<PeriodOvertimeTotals> {
        let tx = conn.unchecked_transaction()?;
        let totals = aggregate(&*tx, employee_id, period, overtime)?;
        tx.finish()?;
        Ok(totals)
    })
}
