//! Schema migrations. Each applied migration is recorded in the `log` table
//! as `migration_applied` with its version as target, so running the engine
//! again is a no-op.

use rusqlite::{Connection, OptionalExtension, Result, params};
use tracing::info;

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240110_0001_employees_and_punches",
        description: "Created employees and punches tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS employees (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id   TEXT NOT NULL UNIQUE,
            name        TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS punches (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  INTEGER NOT NULL,
            ts           TEXT NOT NULL,
            direction    TEXT NOT NULL CHECK(direction IN ('in','out')),
            source       TEXT NOT NULL DEFAULT 'manual'
                         CHECK(source IN ('imported','device','manual')),
            created_at   TEXT NOT NULL,
            UNIQUE(employee_id, ts, direction)
        );

        CREATE INDEX IF NOT EXISTS idx_punches_employee_ts ON punches(employee_id, ts);
        "#,
    },
    Migration {
        version: "20240110_0002_day_records",
        description: "Created day_records table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS day_records (
            employee_id     INTEGER NOT NULL,
            date            TEXT NOT NULL,
            day_hours       TEXT NOT NULL,
            night_hours     TEXT NOT NULL,
            meal_units      INTEGER NOT NULL DEFAULT 0,
            is_weekend      INTEGER NOT NULL DEFAULT 0,
            is_holiday_50   INTEGER NOT NULL DEFAULT 0,
            is_holiday_100  INTEGER NOT NULL DEFAULT 0,
            note            TEXT NOT NULL DEFAULT '',
            period          TEXT NOT NULL,
            computed_at     TEXT NOT NULL,
            PRIMARY KEY (employee_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_day_records_period ON day_records(employee_id, period);
        "#,
    },
    Migration {
        version: "20240112_0003_calendars",
        description: "Created weekly_calendar and holidays tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS weekly_calendar (
            weekday     INTEGER PRIMARY KEY CHECK(weekday BETWEEN 0 AND 6),
            begin_time  TEXT NOT NULL DEFAULT '08:00',
            end_time    TEXT NOT NULL DEFAULT '17:00',
            is_weekend  INTEGER NOT NULL DEFAULT 0
        );

        INSERT OR IGNORE INTO weekly_calendar (weekday, is_weekend) VALUES
            (0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 1), (6, 1);

        CREATE TABLE IF NOT EXISTS holidays (
            date     TEXT PRIMARY KEY,
            premium  INTEGER NOT NULL CHECK(premium IN (50, 100)),
            label    TEXT NOT NULL DEFAULT ''
        );
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = rusqlite::Transaction::new_unchecked(conn, rusqlite::TransactionBehavior::Immediate)?;

    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.description],
    )?;

    tx.commit()?;

    info!(version = m.version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
            applied += 1;
        }
    }

    Ok(applied)
}
