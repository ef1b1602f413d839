#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use pointage::db::PunchStore;
use pointage::db::employees::add_employee;
use pointage::db::initialize::init_db;
use pointage::db::pool::DbPool;
use pointage::models::{Direction, Punch, PunchSource};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("pointage")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_pointage.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    for suffix in ["", "-wal", "-shm"] {
        fs::remove_file(format!("{db_path}{suffix}")).ok();
    }
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write `content` to a temp file and return its path
pub fn temp_input(name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_pointage_input.csv", name));
    fs::write(&path, content).expect("write input file");
    path
}

/// Open (and migrate) a database through the library API
pub fn open_db(db_path: &str) -> DbPool {
    let pool = DbPool::new(db_path).expect("open db");
    init_db(&pool.conn).expect("init db");
    pool
}

pub fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").expect("timestamp")
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("date")
}

pub fn punch_in(employee_id: i64, at: &str) -> Punch {
    Punch::new(employee_id, ts(at), Direction::In, PunchSource::Manual)
}

pub fn punch_out(employee_id: i64, at: &str) -> Punch {
    Punch::new(employee_id, ts(at), Direction::Out, PunchSource::Manual)
}

/// Register an employee and store the given punches; returns the employee id
pub fn seed_employee(pool: &DbPool, device_id: &str, punches: &[(&str, Direction)]) -> i64 {
    let id = add_employee(&pool.conn, device_id, &format!("Employee {device_id}")).expect("add");
    for (at, dir) in punches {
        let p = Punch::new(id, ts(at), *dir, PunchSource::Device);
        pool.conn.insert_if_absent(&p).expect("insert punch");
    }
    id
}

/// Initialize DB via the CLI and register two employees
pub fn init_db_with_employees(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for (device, name) in [("1001", "Awa"), ("1002", "Koffi")] {
        rti()
            .args(["--db", db_path, "employee", "--add", device, "--name", name])
            .assert()
            .success();
    }
}
