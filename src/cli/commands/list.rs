use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::employees::resolve_reference;
use crate::db::pool::DbPool;
use crate::db::store::DayRecordStore;
use crate::errors::AppResult;
use crate::models::Period;
use crate::ui::messages::info;
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::{bold, flag, hours2};
use crate::utils::table::Table;
use chrono::Datelike;
use rust_decimal::Decimal;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { employee, period } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let employee = resolve_reference(&pool.conn, employee)?;
        let period = Period::parse(period)?;

        let records = pool.conn.records_for(employee.id, &period)?;
        if records.is_empty() {
            info(format!(
                "No day records for {} in {} (run `reconcile` first?)",
                employee.name, period
            ));
            return Ok(());
        }

        let mut table = Table::new(vec![
            "DATE", "DAY", "HOURS", "NIGHT", "MEAL", "WE", "H50", "H100", "NOTE",
        ]);
        let (mut day, mut night, mut meals) = (Decimal::ZERO, Decimal::ZERO, 0u32);

        for r in &records {
            day += r.day_hours;
            night += r.night_hours;
            meals += u32::from(r.meal_premium_units);
            table.add_row(vec![
                r.date_str(),
                r.date.weekday().to_string(),
                hours2(r.day_hours),
                hours2(r.night_hours),
                r.meal_premium_units.to_string(),
                flag(r.is_weekend).to_string(),
                flag(r.is_holiday_50).to_string(),
                flag(r.is_holiday_100).to_string(),
                colorize_optional(&r.note),
            ]);
        }
        table.add_row(vec![
            bold("TOTAL"),
            String::new(),
            bold(&hours2(day)),
            bold(&hours2(night)),
            bold(&meals.to_string()),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]);

        println!(
            "📋 Day records of {} ({}) for {}:\n",
            employee.name, employee.device_id, period
        );
        println!("{}", table.render());
    }

    Ok(())
}
