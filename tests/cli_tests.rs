mod common;
use common::{init_db_with_employees, rti, setup_test_db, temp_input, temp_out};
use predicates::prelude::*;
use std::fs;

fn add_punch(db: &str, emp: &str, day: &str, time: &str, dir: &str) {
    rti()
        .args(["--db", db, "punch", "--add", emp, day, time, dir])
        .assert()
        .success();
}

#[test]
fn test_init_and_list_employees() {
    let db = setup_test_db("cli_employees");
    init_db_with_employees(&db);

    rti()
        .args(["--db", &db, "employee", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Awa"))
        .stdout(predicate::str::contains("1002"));
}

#[test]
fn test_reconcile_and_list_day_records() {
    let db = setup_test_db("cli_reconcile");
    init_db_with_employees(&db);

    add_punch(&db, "1001", "2023-03-01", "08:00", "in");
    add_punch(&db, "1001", "2023-03-02", "08:00", "in");
    add_punch(&db, "1001", "2023-03-02", "16:00", "out");

    rti()
        .args(["--db", &db, "reconcile", "--period", "2023-03", "--employee", "1001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reconciliation completed"));

    rti()
        .args(["--db", &db, "list", "--employee", "1001", "--period", "2023-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.98"))
        .stdout(predicate::str::contains("8.00"))
        .stdout(predicate::str::contains("default OUT 18:59:00 applied"));
}

#[test]
fn test_reconcile_ignore_missing_out_flag() {
    let db = setup_test_db("cli_reconcile_ignore");
    init_db_with_employees(&db);

    add_punch(&db, "1001", "2023-03-01", "08:00", "in");

    rti()
        .args([
            "--db",
            &db,
            "reconcile",
            "--period",
            "2023-03",
            "--employee",
            "1001",
            "--ignore-missing-out",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db, "list", "--employee", "1001", "--period", "2023-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No day records"));
}

#[test]
fn test_reconcile_unknown_employee_fails() {
    let db = setup_test_db("cli_unknown_employee");
    init_db_with_employees(&db);

    rti()
        .args(["--db", &db, "reconcile", "--period", "2023-03", "--employee", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown employee"));
}

#[test]
fn test_import_then_summary() {
    let db = setup_test_db("cli_import");
    init_db_with_employees(&db);

    let file = temp_input(
        "cli_import",
        "id,date,time,state\n\
         1001,01/03/2023,07:00:00 AM,in\n\
         1001,01/03/2023,07:00:00 PM,out\n\
         1002,01/03/2023,02:00:00 PM,in\n\
         1002,01/03/2023,11:00:00 PM,out\n\
         9999,01/03/2023,08:00:00 AM,in\n",
    );
    let file = file.to_string_lossy().to_string();

    rti()
        .args(["--db", &db, "import", "--file", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("inserted      : 4"))
        .stdout(predicate::str::contains("unknown device employee id '9999'"));

    // same file again: nothing new
    rti()
        .args(["--db", &db, "import", "--file", &file, "--layout", "device"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicates    : 4"));

    rti()
        .args(["--db", &db, "reconcile", "--period", "2023-03", "--all", "--workers", "2"])
        .assert()
        .success();

    rti()
        .args(["--db", &db, "summary", "--period", "2023-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HS115"))
        .stdout(predicate::str::contains("12.00"))
        .stdout(predicate::str::contains("Koffi"));
}

#[test]
fn test_export_day_records_csv_and_totals_json() {
    let db = setup_test_db("cli_export");
    init_db_with_employees(&db);

    add_punch(&db, "1002", "2023-03-06", "08:00", "in");
    add_punch(&db, "1002", "2023-03-06", "16:00", "out");

    rti()
        .args(["--db", &db, "reconcile", "--period", "2023-03", "--all"])
        .assert()
        .success();

    let csv_out = temp_out("cli_export_records", "csv");
    rti()
        .args([
            "--db", &db, "export", "--format", "csv", "--file", &csv_out, "--period", "2023-03",
            "--force",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&csv_out).expect("read exported csv");
    assert!(content.starts_with("employee_id,device_id,name,date,day_hours"));
    assert!(content.contains("2023-03-06,8.00,0.00"));

    let json_out = temp_out("cli_export_totals", "json");
    rti()
        .args([
            "--db", &db, "export", "--format", "json", "--file", &json_out, "--period", "2023-03",
            "--employee", "1002", "--totals", "--force",
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("read json")).unwrap();
    assert_eq!(json[0]["device_id"], "1002");
    assert_eq!(json[0]["day_hours"], "8.00");
    assert_eq!(json[0]["hs115"], "0.00");
}

#[test]
fn test_export_requires_absolute_path() {
    let db = setup_test_db("cli_export_relative");
    init_db_with_employees(&db);

    rti()
        .args([
            "--db", &db, "export", "--format", "csv", "--file", "out.csv", "--period", "2023-03",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be absolute"));
}

#[test]
fn test_holiday_and_calendar() {
    let db = setup_test_db("cli_calendar");
    init_db_with_employees(&db);

    rti()
        .args([
            "--db", &db, "holiday", "--add", "2023-03-08", "--premium", "50", "--label",
            "Women's day",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db, "holiday", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-03-08"))
        .stdout(predicate::str::contains("50%"));

    rti()
        .args(["--db", &db, "holiday", "--add", "2023-03-09", "--premium", "75"])
        .assert()
        .failure();

    rti()
        .args(["--db", &db, "calendar", "--weekend", "fri"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weekend set to: fri"));
}

#[test]
fn test_punch_list_and_delete() {
    let db = setup_test_db("cli_punch");
    init_db_with_employees(&db);

    add_punch(&db, "1001", "2023-03-01", "08:00", "in");

    rti()
        .args(["--db", &db, "punch", "--add", "1001", "2023-03-01", "08:00", "in"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already recorded"));

    rti()
        .args(["--db", &db, "punch", "--list", "1001", "--period", "2023-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00:00"))
        .stdout(predicate::str::contains("manual"));

    rti()
        .args(["--db", &db, "punch", "--del", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Punch not found"));

    rti()
        .args(["--db", &db, "punch", "--add", "1001", "2023-03-01", "09:00", "sideways"])
        .assert()
        .failure();
}

#[test]
fn test_log_records_operations() {
    let db = setup_test_db("cli_log");
    init_db_with_employees(&db);

    rti()
        .args(["--db", &db, "reconcile", "--period", "2023-03-01", "--all"])
        .assert()
        .success();

    rti()
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("migration_applied"))
        .stdout(predicate::str::contains("employee_add"))
        .stdout(predicate::str::contains("reconcile"));
}

#[test]
fn test_db_info_and_check() {
    let db = setup_test_db("cli_db_info");
    init_db_with_employees(&db);

    rti()
        .args(["--db", &db, "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Employees"))
        .stdout(predicate::str::contains("Integrity check passed"));
}
