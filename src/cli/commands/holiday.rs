use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::calendar::{delete_holiday, load_holidays, upsert_holiday};
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{Holiday, HolidayPremium};
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_date_strict;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Holiday {
        add,
        premium,
        label,
        del,
        list,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if let Some(date) = add {
            let date = parse_date_strict(date)?;
            let premium = HolidayPremium::from_percent(*premium).ok_or_else(|| {
                AppError::Config(format!("holiday premium must be 50 or 100, got {premium}"))
            })?;
            upsert_holiday(
                &pool.conn,
                &Holiday {
                    date,
                    premium,
                    label: label.clone(),
                },
            )?;
            audit_quiet(
                &pool.conn,
                "holiday_add",
                &date.to_string(),
                &format!("{}% {}", premium.percent(), label),
            );
            success(format!("Holiday {date} stored ({}%)", premium.percent()));
        }

        if let Some(date) = del {
            let date = parse_date_strict(date)?;
            if delete_holiday(&pool.conn, date)? {
                audit_quiet(&pool.conn, "holiday_del", &date.to_string(), "holiday removed");
                success(format!("Holiday {date} removed"));
            } else {
                warning(format!("No holiday on {date}"));
            }
        }

        if *list {
            let holidays = load_holidays(&pool.conn)?;
            let mut table = Table::new(vec!["DATE", "PREMIUM", "LABEL"]);
            for h in holidays.iter() {
                table.add_row(vec![
                    h.date.to_string(),
                    format!("{}%", h.premium.percent()),
                    h.label.clone(),
                ]);
            }
            if table.is_empty() {
                info("No holidays configured.");
            } else {
                println!("🎉 Holidays:\n");
                println!("{}", table.render());
            }
        }
    }

    Ok(())
}
