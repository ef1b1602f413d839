use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::employees::{add_employee, list_employees};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Employee { add, name, list } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        if let (Some(device_id), Some(name)) = (add, name) {
            let id = add_employee(&pool.conn, device_id, name)?;
            audit_quiet(&pool.conn, "employee_add", device_id, name);
            success(format!("Employee '{name}' registered (id {id}, device id {device_id})"));
        }

        if *list {
            let employees = list_employees(&pool.conn)?;
            if employees.is_empty() {
                info("No employees registered.");
                return Ok(());
            }

            let mut table = Table::new(vec!["ID", "DEVICE ID", "NAME"]);
            for e in employees {
                table.add_row(vec![e.id.to_string(), e.device_id, e.name]);
            }
            println!("{}", table.render());
        }
    }

    Ok(())
}
