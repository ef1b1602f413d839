mod common;
use common::{date, open_db, seed_employee, setup_test_db, temp_input};

use chrono::NaiveTime;
use pointage::config::{DatePattern, ImportLayout};
use pointage::core::ingest::{
    RawRow, RowError, import_file, import_rows, normalize, parse_device_time, read_rows,
};
use pointage::db::PunchStore;
use pointage::db::punches::count_punches;
use pointage::jobs::CancellationToken;
use pointage::models::{Direction, PunchSource};
use std::collections::HashMap;

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn directory() -> HashMap<String, i64> {
    HashMap::from([("1001".to_string(), 1), ("1002".to_string(), 2)])
}

#[test]
fn device_time_is_brought_to_24h_minutes() {
    assert_eq!(parse_device_time("08:15:42 PM"), Some(hm(20, 15)));
    assert_eq!(parse_device_time("12:05:00 AM"), Some(hm(0, 5)));
    assert_eq!(parse_device_time("07:30"), Some(hm(7, 30)));
    assert_eq!(parse_device_time("17:45:59"), Some(hm(17, 45)));
    assert_eq!(parse_device_time("25:00"), None);
}

#[test]
fn date_patterns_are_never_guessed() {
    assert_eq!(DatePattern::DayMonthYear.parse("01/03/2023"), Some(date("2023-03-01")));
    assert_eq!(DatePattern::MonthDayYear.parse("01/03/2023"), Some(date("2023-01-03")));
    assert_eq!(DatePattern::Iso.parse("2023-03-01"), Some(date("2023-03-01")));
    assert_eq!(DatePattern::CompactYearFirst.parse("230301"), Some(date("2023-03-01")));
    assert_eq!(DatePattern::CompactDayFirst.parse("010323"), Some(date("2023-03-01")));
    assert_eq!(DatePattern::CompactDayFirst.parse("10323"), None);
    assert_eq!(DatePattern::Iso.parse("01/03/2023"), None);
}

#[test]
fn normalize_device_row() {
    let layout = ImportLayout::device_default();
    let row = RawRow::new(2, vec!["1001", "01/03/2023", "08:02:10 AM", "C/In"]);

    let punch = normalize(&row, &layout, &directory()).unwrap();
    assert_eq!(punch.employee_id, 1);
    assert_eq!(punch.timestamp, date("2023-03-01").and_time(hm(8, 2)));
    assert_eq!(punch.direction, Direction::In);
    assert_eq!(punch.source, PunchSource::Device);
}

#[test]
fn normalize_reports_parse_and_lookup_errors() {
    let layout = ImportLayout::device_default();

    let missing = RawRow::new(3, vec!["1001", "01/03/2023", "", "in"]);
    assert!(matches!(
        normalize(&missing, &layout, &directory()),
        Err(RowError::Parse { line: 3, .. })
    ));

    let bad_dir = RawRow::new(4, vec!["1001", "01/03/2023", "08:00", "lunch"]);
    assert!(matches!(
        normalize(&bad_dir, &layout, &directory()),
        Err(RowError::Parse { line: 4, .. })
    ));

    let unknown = RawRow::new(5, vec!["9999", "01/03/2023", "08:00", "in"]);
    assert_eq!(
        normalize(&unknown, &layout, &directory()),
        Err(RowError::Lookup {
            line: 5,
            device_id: "9999".into()
        })
    );
}

#[test]
fn batch_collapses_duplicates_and_keeps_going() {
    let db = setup_test_db("ingest_batch");
    let pool = open_db(&db);
    let emp = seed_employee(&pool, "1001", &[]);
    let dir = HashMap::from([("1001".to_string(), emp)]);

    let layout = ImportLayout::device_default();
    let rows = vec![
        RawRow::new(2, vec!["1001", "01/03/2023", "08:00:00 AM", "in"]),
        RawRow::new(3, vec!["1001", "01/03/2023", "08:00:30 AM", "in"]),
        RawRow::new(4, vec!["1001", "01/03/2023", "bad", "out"]),
        RawRow::new(5, vec!["4242", "01/03/2023", "05:00:00 PM", "out"]),
        RawRow::new(6, vec!["1001", "01/03/2023", "05:00:00 PM", "out"]),
    ];

    let summary = import_rows(&rows, &layout, &dir, &pool.conn, &CancellationToken::new()).unwrap();
    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.inserted, 2);
    // seconds are dropped, so line 3 repeats line 2
    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.parse_errors, 1);
    assert_eq!(summary.lookup_errors, 1);
    assert_eq!(
        summary.issues.iter().map(|(l, _)| *l).collect::<Vec<_>>(),
        vec![4, 5]
    );

    let stored = pool
        .conn
        .punches_between(emp, date("2023-03-01"), date("2023-03-01"))
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[test]
fn cancelled_import_stops_before_rows() {
    let db = setup_test_db("ingest_cancel");
    let pool = open_db(&db);
    let emp = seed_employee(&pool, "1001", &[]);
    let dir = HashMap::from([("1001".to_string(), emp)]);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let rows = vec![RawRow::new(2, vec!["1001", "01/03/2023", "08:00", "in"])];
    let summary =
        import_rows(&rows, &ImportLayout::device_default(), &dir, &pool.conn, &cancel).unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.inserted, 0);
    assert_eq!(count_punches(&pool.conn).unwrap(), 0);
}

#[test]
fn reimporting_a_file_adds_nothing() {
    let db = setup_test_db("ingest_reimport");
    let pool = open_db(&db);
    seed_employee(&pool, "1001", &[]);
    seed_employee(&pool, "1002", &[]);

    let file = temp_input(
        "ingest_reimport",
        "employee,date,time,direction\n\
         1001,01/03/2023,08:00:00 AM,in\n\
         1001,01/03/2023,05:00:00 PM,out\n\
         \n\
         1002,01/03/2023,10:00:00 PM,in\n\
         1002,02/03/2023,06:00:00 AM,out\n",
    );
    let layout = ImportLayout::device_default();

    let source = read_rows(&file, &layout).unwrap();
    assert_eq!(source.rows.len(), 4);
    assert_eq!(source.rows[0].line, 2);
    assert!(source.unreadable.is_empty());

    let first = import_file(&pool.conn, &file, &layout, &CancellationToken::new()).unwrap();
    assert_eq!(first.inserted, 4);
    let second = import_file(&pool.conn, &file, &layout, &CancellationToken::new()).unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.duplicates, 4);
    assert_eq!(count_punches(&pool.conn).unwrap(), 4);
}

#[test]
fn sheet_layout_reads_semicolon_export() {
    let db = setup_test_db("ingest_sheet");
    let pool = open_db(&db);
    let emp = seed_employee(&pool, "1001", &[]);

    let file = temp_input(
        "ingest_sheet",
        "ATTENDANCE REPORT;;;;;\n\
         ;;;;;\n\
         Department;;;;;\n\
         No;ID;Name;Date;Time;State\n\
         1;1001;Awa;01/03/2023;07:58:00 AM;C/In\n\
         2;1001;Awa;01/03/2023;04:03:00 PM;C/Out\n",
    );

    let summary = import_file(
        &pool.conn,
        &file,
        &ImportLayout::sheet_default(),
        &CancellationToken::new(),
    )
    .unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped(), 0);

    let stored = pool
        .conn
        .punches_between(emp, date("2023-03-01"), date("2023-03-01"))
        .unwrap();
    assert!(stored.iter().all(|p| p.source == PunchSource::Imported));
}

#[test]
fn undecodable_row_is_skipped_and_counted() {
    let db = setup_test_db("ingest_bad_bytes");
    let pool = open_db(&db);
    seed_employee(&pool, "1001", &[]);

    let mut content = b"employee,date,time,direction\n\
        1001,01/03/2023,08:00:00 AM,in\n\
        1001,01/03/2023,"
        .to_vec();
    content.extend_from_slice(b"\xff\xfe,out\n");
    content.extend_from_slice(b"1001,01/03/2023,05:00:00 PM,out\n");
    let file = temp_input("ingest_bad_bytes", content);

    let summary = import_file(
        &pool.conn,
        &file,
        &ImportLayout::device_default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.parse_errors, 1);
    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.issues.len(), 1);
    assert_eq!(summary.issues[0].0, 3);
    assert_eq!(count_punches(&pool.conn).unwrap(), 2);
}
