use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::punch::PunchLogic;
use crate::db::employees::resolve_reference;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{Direction, Period};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_direction;
use crate::utils::date::{parse_date_strict, today};
use crate::utils::table::Table;
use crate::utils::time::parse_time_strict;
use chrono::Datelike;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Punch {
        add,
        del,
        list,
        period,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if let Some(args) = add {
            let [employee, date, time, direction] = args.as_slice() else {
                return Err(AppError::InvalidDirection(args.join(" ")));
            };
            let employee = resolve_reference(&pool.conn, employee)?;
            let date = parse_date_strict(date)?;
            let time = parse_time_strict(time)?;
            let direction = Direction::from_code(direction)
                .ok_or_else(|| AppError::InvalidDirection(direction.clone()))?;

            if PunchLogic::add(&pool.conn, &employee, date, time, direction)? {
                success(format!(
                    "Punch {} {} {} recorded for {}",
                    date,
                    time.format("%H:%M"),
                    direction.to_db_str(),
                    employee.name
                ));
            } else {
                warning("Identical punch already recorded, nothing changed.");
            }
        }

        if let Some(id) = del {
            PunchLogic::delete(&pool.conn, *id)?;
            success(format!("Punch {id} deleted"));
            info("Run `reconcile` again to refresh the affected day records.");
        }

        if let Some(employee) = list {
            let employee = resolve_reference(&pool.conn, employee)?;
            let period = match period {
                Some(p) => Period::parse(p)?,
                None => {
                    let now = today();
                    Period::month(now.year(), now.month())?
                }
            };

            let punches = PunchLogic::list(&pool.conn, &employee, &period)?;
            if punches.is_empty() {
                info(format!("No punches for {} in {}", employee.name, period));
                return Ok(());
            }

            let mut table = Table::new(vec!["ID", "DATE", "TIME", "DIR", "SOURCE"]);
            for p in &punches {
                table.add_row(vec![
                    p.id.to_string(),
                    p.date_str(),
                    p.time_str(),
                    colorize_direction(p.direction.to_db_str(), p.direction.is_in()),
                    p.source.to_db_str().to_string(),
                ]);
            }
            println!("🕒 Punches of {} ({}):\n", employee.name, period);
            println!("{}", table.render());
        }
    }

    Ok(())
}
