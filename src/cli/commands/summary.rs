use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::overtime::validate;
use crate::db::employees::{list_employees, resolve_reference};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::jobs::{EmployeeLocks, read_totals};
use crate::models::Period;
use crate::ui::messages::{header, info};
use crate::utils::formatting::hours2;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { employee, period } = cmd {
        validate(&cfg.overtime.tiers)?;

        let pool = DbPool::new(&cfg.database)?;
        let period = Period::parse(period)?;
        let employees = match employee {
            Some(reference) => vec![resolve_reference(&pool.conn, reference)?],
            None => list_employees(&pool.conn)?,
        };

        let locks = EmployeeLocks::new();
        let mut table = Table::new(vec![
            "EMPLOYEE", "DAYS", "DAY H", "NIGHT H", "MEAL", "WE H", "HOL H", "EXCESS", "HS115",
            "HS140", "HS150", "HS200",
        ]);

        for e in &employees {
            let t = read_totals(&pool.conn, &locks, e.id, &period, &cfg.overtime)?;
            if t.days == 0 && employee.is_none() {
                continue;
            }
            table.add_row(vec![
                format!("{} ({})", e.name, e.device_id),
                t.days.to_string(),
                hours2(t.day_hours_total),
                hours2(t.night_hours_total),
                t.meal_premium_units.to_string(),
                hours2(t.weekend_hours),
                hours2(t.holiday_hours),
                hours2(t.excess_hours),
                hours2(t.hs115),
                hours2(t.hs140),
                hours2(t.hs150),
                hours2(t.hs200),
            ]);
        }

        if table.is_empty() {
            info(format!("No day records in {period}."));
            return Ok(());
        }

        header(format!(
            "Period {} (contract {} h)",
            period,
            hours2(cfg.overtime.contract_hours)
        ));
        println!("{}", table.render());
    }

    Ok(())
}
