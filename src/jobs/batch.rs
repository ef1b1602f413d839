//! Batch reconciliation on a worker pool.
//!
//! Each employee is one unit of work run on tokio's blocking pool with its
//! own SQLite connection. At most `workers` units run at once. Progress is
//! reported over an mpsc channel; a failing employee produces a `Failed`
//! event and the batch carries on.

use crate::core::reconcile::{Reconciliation, reconcile};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::jobs::locks::EmployeeLocks;
use crate::models::{Calendars, Period, ReconcilePolicy};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const CHANNEL_CAPACITY: usize = 64;

/// Everything a batch needs, fixed before it starts.
#[derive(Debug, Clone)]
pub struct ReconcileJob {
    pub db_path: String,
    pub period: Period,
    pub policy: ReconcilePolicy,
    pub calendars: Arc<Calendars>,
    pub workers: usize,
}

#[derive(Debug)]
pub enum JobEvent {
    Started { employee_id: i64 },
    Finished { employee_id: i64, result: Reconciliation },
    Failed { employee_id: i64, error: String },
    Cancelled { employee_id: i64 },
}

impl JobEvent {
    pub fn employee_id(&self) -> i64 {
        match self {
            JobEvent::Started { employee_id }
            | JobEvent::Finished { employee_id, .. }
            | JobEvent::Failed { employee_id, .. }
            | JobEvent::Cancelled { employee_id } => *employee_id,
        }
    }
}

/// Outcome of a whole batch, built from its events.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub finished: Vec<(i64, Reconciliation)>,
    pub failed: Vec<(i64, String)>,
    pub cancelled: Vec<i64>,
}

impl BatchReport {
    pub fn push(&mut self, event: JobEvent) {
        match event {
            JobEvent::Started { .. } => {}
            JobEvent::Finished {
                employee_id,
                result,
            } => self.finished.push((employee_id, result)),
            JobEvent::Failed { employee_id, error } => self.failed.push((employee_id, error)),
            JobEvent::Cancelled { employee_id } => self.cancelled.push(employee_id),
        }
    }

    pub fn records_written(&self) -> usize {
        self.finished.iter().map(|(_, r)| r.records.len()).sum()
    }
}

/// Reconcile one employee: own connection, employee lock held for the
/// whole replace-window.
pub fn reconcile_employee(
    db_path: &str,
    employee_id: i64,
    period: &Period,
    policy: &ReconcilePolicy,
    calendars: &Calendars,
    locks: &EmployeeLocks,
    cancel: &CancellationToken,
) -> AppResult<Reconciliation> {
    if cancel.is_cancelled() {
        return Err(AppError::Cancelled);
    }

    let pool = DbPool::new(db_path)?;
    let result = locks.with_lock(employee_id, || {
        reconcile(&pool.conn, employee_id, period, policy, calendars, cancel)
    })?;

    audit_quiet(
        &pool.conn,
        "reconcile",
        &employee_id.to_string(),
        &format!(
            "{}: records={} synthesized={} skipped={} orphan_outs={}",
            period,
            result.records.len(),
            result.gaps_synthesized,
            result.gaps_skipped,
            result.orphan_outs
        ),
    );

    Ok(result)
}

async fn send(tx: &mpsc::Sender<JobEvent>, event: JobEvent) {
    // receiver gone means nobody listens any more; the work itself still counts
    if tx.send(event).await.is_err() {
        warn!("job event dropped: receiver closed");
    }
}

/// Run the batch, sending one event stream per employee into `tx`.
pub async fn run_reconcile(
    job: ReconcileJob,
    employees: Vec<i64>,
    locks: Arc<EmployeeLocks>,
    cancel: CancellationToken,
    tx: mpsc::Sender<JobEvent>,
) {
    let job = Arc::new(job);
    let permits = Arc::new(Semaphore::new(job.workers.max(1)));
    let mut set = JoinSet::new();

    for employee_id in employees {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            p = permits.clone().acquire_owned() => p.ok(),
        };
        let Some(permit) = permit else {
            send(&tx, JobEvent::Cancelled { employee_id }).await;
            continue;
        };

        send(&tx, JobEvent::Started { employee_id }).await;

        let (job, locks, cancel, tx) = (job.clone(), locks.clone(), cancel.clone(), tx.clone());
        set.spawn(async move {
            let work = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                reconcile_employee(
                    &job.db_path,
                    employee_id,
                    &job.period,
                    &job.policy,
                    &job.calendars,
                    &locks,
                    &cancel,
                )
            })
            .await
            .map_err(|e| AppError::Worker(e.to_string()))
            .and_then(|r| r);

            let event = match work {
                Ok(result) => JobEvent::Finished {
                    employee_id,
                    result,
                },
                Err(AppError::Cancelled) => JobEvent::Cancelled { employee_id },
                Err(e) => {
                    warn!(employee = employee_id, error = %e, "reconciliation failed");
                    JobEvent::Failed {
                        employee_id,
                        error: e.to_string(),
                    }
                }
            };
            send(&tx, event).await;
        });
    }

    while set.join_next().await.is_some() {}
    info!("reconcile batch drained");
}

/// Handle over batch runs: the lock registry they share and the token that
/// stops them.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    locks: Arc<EmployeeLocks>,
    cancel: CancellationToken,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locks(locks: Arc<EmployeeLocks>) -> Self {
        Self {
            locks,
            cancel: CancellationToken::new(),
        }
    }

    pub fn locks(&self) -> &Arc<EmployeeLocks> {
        &self.locks
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Start a batch on the current runtime and hand back its event stream.
    /// The stream ends once every employee has reported.
    pub fn spawn(&self, job: ReconcileJob, employees: Vec<i64>) -> mpsc::Receiver<JobEvent> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(run_reconcile(
            job,
            employees,
            self.locks.clone(),
            self.cancel.clone(),
            tx,
        ));
        rx
    }

    /// Blocking front-end used by the CLI: builds a runtime, runs the batch
    /// and feeds every event to `on_event` as it arrives. Ctrl-C cancels.
    pub fn run_blocking(
        &self,
        job: ReconcileJob,
        employees: Vec<i64>,
        mut on_event: impl FnMut(&JobEvent),
    ) -> AppResult<BatchReport> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(job.workers.clamp(1, 16))
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            let ctrl_c = self.cancel.clone();
            let watcher = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            let mut rx = self.spawn(job, employees);
            let mut report = BatchReport::default();
            while let Some(event) = rx.recv().await {
                on_event(&event);
                report.push(event);
            }
            watcher.abort();
            Ok(report)
        })
    }
}
