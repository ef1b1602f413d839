use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::calendar::load_calendars;
use crate::db::employees::{list_employees, resolve_reference};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::jobs::{BatchRunner, JobEvent, ReconcileJob};
use crate::models::{Period, ReconcilePolicy};
use crate::ui::messages::{error, info, success, warning};
use crate::utils::time::parse_time_strict;
use std::sync::Arc;

/// Configured policy with the command-line overrides applied.
fn effective_policy(
    base: &ReconcilePolicy,
    ignore_missing_out: bool,
    default_out: Option<&str>,
    meal_auto: bool,
    no_meal_auto: bool,
) -> AppResult<ReconcilePolicy> {
    let mut policy = base.clone();
    if ignore_missing_out {
        policy.ignore_days_without_out = true;
    }
    if let Some(t) = default_out {
        policy.default_out_time = parse_time_strict(t)?;
    }
    if meal_auto {
        policy.meal_premium_auto = true;
    }
    if no_meal_auto {
        policy.meal_premium_auto = false;
    }
    Ok(policy)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reconcile {
        period,
        employee,
        all,
        ignore_missing_out,
        default_out,
        meal_auto,
        no_meal_auto,
        workers,
    } = cmd
    {
        let period = Period::parse(period)?;
        let policy = effective_policy(
            &cfg.policy,
            *ignore_missing_out,
            default_out.as_deref(),
            *meal_auto,
            *no_meal_auto,
        )?;

        let pool = DbPool::new(&cfg.database)?;
        let employees: Vec<i64> = match (employee, *all) {
            (Some(reference), _) => vec![resolve_reference(&pool.conn, reference)?.id],
            (None, true) => list_employees(&pool.conn)?.into_iter().map(|e| e.id).collect(),
            (None, false) => {
                return Err(AppError::Config(
                    "either --employee or --all is required".to_string(),
                ));
            }
        };
        if employees.is_empty() {
            warning("No employees registered, nothing to reconcile.");
            return Ok(());
        }

        let calendars = Arc::new(load_calendars(&pool.conn)?);
        drop(pool);

        let job = ReconcileJob {
            db_path: cfg.database.clone(),
            period,
            policy,
            calendars,
            workers: workers.unwrap_or(cfg.workers).max(1),
        };

        info(format!(
            "Reconciling {} employee(s) over {}…",
            employees.len(),
            period
        ));

        let runner = BatchRunner::new();
        let report = runner.run_blocking(job, employees, |event| match event {
            JobEvent::Finished {
                employee_id,
                result,
            } => {
                println!(
                    "  #{:<5} {:>3} day(s)  default OUT: {}  skipped: {}  orphan OUT: {}",
                    employee_id,
                    result.records.len(),
                    result.gaps_synthesized,
                    result.gaps_skipped,
                    result.orphan_outs
                );
            }
            JobEvent::Failed { employee_id, error: e } => {
                error(format!("employee #{employee_id}: {e}"));
            }
            JobEvent::Started { .. } | JobEvent::Cancelled { .. } => {}
        })?;

        if !report.cancelled.is_empty() {
            warning(format!(
                "{} employee(s) cancelled; their stored records are unchanged.",
                report.cancelled.len()
            ));
        }

        if !report.failed.is_empty() {
            return Err(AppError::Worker(format!(
                "{} of {} employee(s) failed",
                report.failed.len(),
                report.failed.len() + report.finished.len() + report.cancelled.len()
            )));
        }

        success(format!(
            "Reconciliation completed: {} day record(s) written for {}",
            report.records_written(),
            period
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn flags_override_configured_policy() {
        let base = ReconcilePolicy::default();
        let p = effective_policy(&base, true, Some("17:30"), false, true).unwrap();
        assert!(p.ignore_days_without_out);
        assert_eq!(p.default_out_time, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert!(!p.meal_premium_auto);
    }

    #[test]
    fn no_flags_keep_configured_policy() {
        let base = ReconcilePolicy::default();
        let p = effective_policy(&base, false, None, false, false).unwrap();
        assert_eq!(p, base);
    }
}
