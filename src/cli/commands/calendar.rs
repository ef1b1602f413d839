use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::calendar::{load_weekly_calendar, set_weekend_days};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::parse_weekdays;
use crate::utils::formatting::flag;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Calendar { weekend } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        if let Some(days) = weekend {
            let weekdays = parse_weekdays(days)?;
            set_weekend_days(&pool.conn, &weekdays)?;
            audit_quiet(&pool.conn, "calendar", "weekend", days);
            success(format!("Weekend set to: {days}"));
        }

        let calendar = load_weekly_calendar(&pool.conn)?;
        let mut table = Table::new(vec!["DAY", "BEGIN", "END", "WEEKEND"]);
        for e in calendar.entries() {
            table.add_row(vec![
                e.weekday.to_string(),
                e.begin.format("%H:%M").to_string(),
                e.end.format("%H:%M").to_string(),
                flag(e.is_weekend).to_string(),
            ]);
        }
        println!("📅 Weekly calendar:\n");
        println!("{}", table.render());
    }

    Ok(())
}
