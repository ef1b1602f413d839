use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::employees::resolve_reference;
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ExportContent, ExportLogic};
use crate::models::Period;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        period,
        employee,
        totals,
        force,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        let period = Period::parse(period)?;
        let employee = match employee {
            Some(reference) => Some(resolve_reference(&pool.conn, reference)?),
            None => None,
        };
        let content = if *totals {
            ExportContent::Totals
        } else {
            ExportContent::DayRecords
        };

        let rows = ExportLogic::export(
            &pool.conn,
            *format,
            file,
            &period,
            employee.as_ref(),
            content,
            &cfg.overtime,
            *force,
        )?;

        if rows > 0 {
            audit_quiet(
                &pool.conn,
                "export",
                file,
                &format!("{} rows, {} {}", rows, format.as_str(), period),
            );
        }
    }
    Ok(())
}
