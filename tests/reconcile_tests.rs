mod common;
use common::{date, open_db, punch_in, punch_out, seed_employee, setup_test_db, ts};

use chrono::NaiveTime;
use pointage::core::reconcile::{
    meal_units, reconcile, reconcile_punches, shift_hours, synthesized_out,
};
use pointage::db::{DayRecordStore, PunchStore};
use pointage::models::{
    Calendars, Direction, Holiday, HolidayCalendar, HolidayPremium, Period, ReconcilePolicy,
};
use pointage::jobs::CancellationToken;
use pointage::utils::round2;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn march() -> Period {
    Period::month(2023, 3).unwrap()
}

#[test]
fn overnight_shift_belongs_to_in_date() {
    let punches = vec![
        punch_in(1, "2023-01-01 23:00:00"),
        punch_out(1, "2023-01-02 06:00:00"),
    ];
    let period = Period::month(2023, 1).unwrap();
    let r = reconcile_punches(
        1,
        &punches,
        &period,
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(r.records.len(), 1);
    let rec = &r.records[0];
    assert_eq!(rec.date, date("2023-01-01"));
    assert_eq!(rec.day_hours, dec("7.00"));
    // boundary is 22:00 of the OUT's day, the OUT is well before it
    assert_eq!(rec.night_hours, Decimal::ZERO);
    assert_eq!(rec.period, "2023-01");
}

#[test]
fn missing_out_gets_default_cutoff() {
    let punches = vec![punch_in(1, "2023-03-01 08:00:00")];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(r.gaps_synthesized, 1);
    assert_eq!(r.records.len(), 1);
    let rec = &r.records[0];
    assert_eq!(rec.day_hours, dec("10.98"));
    assert_eq!(rec.night_hours, Decimal::ZERO);
    assert_eq!(rec.meal_premium_units, 1);
    assert!(rec.note.contains("18:59:00"));
}

#[test]
fn missing_out_ignored_by_policy() {
    let policy = ReconcilePolicy {
        ignore_days_without_out: true,
        ..ReconcilePolicy::default()
    };
    let punches = vec![punch_in(1, "2023-03-01 08:00:00")];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &policy,
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(r.records.is_empty());
    assert_eq!(r.gaps_skipped, 1);
}

#[test]
fn rounding_is_half_up() {
    // 7h plus 18s = 7.005h
    let punches = vec![
        punch_in(1, "2023-03-01 08:00:00"),
        punch_out(1, "2023-03-01 15:00:18"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(r.records[0].day_hours, dec("7.01"));
}

#[test]
fn night_hours_after_22() {
    let punches = vec![
        punch_in(1, "2023-03-01 14:00:00"),
        punch_out(1, "2023-03-01 23:30:00"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    let rec = &r.records[0];
    assert_eq!(rec.day_hours, dec("8.00"));
    assert_eq!(rec.night_hours, dec("1.50"));
    assert_eq!(rec.total_hours(), dec("9.50"));
    assert_eq!(rec.meal_premium_units, 0);
}

#[test]
fn weekend_and_holiday_flags() {
    let calendars = Calendars {
        holidays: HolidayCalendar::new(vec![Holiday {
            date: date("2023-03-08"),
            premium: HolidayPremium::Fifty,
            label: "Women's day".into(),
        }]),
        ..Calendars::default()
    };
    let punches = vec![
        // Saturday
        punch_in(1, "2023-03-04 09:00:00"),
        punch_out(1, "2023-03-04 10:00:00"),
        // Wednesday, holiday
        punch_in(1, "2023-03-08 09:00:00"),
        punch_out(1, "2023-03-08 10:00:00"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &calendars,
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(r.records.len(), 2);
    assert!(r.records[0].is_weekend);
    assert!(!r.records[0].is_holiday_50);
    assert!(!r.records[1].is_weekend);
    assert!(r.records[1].is_holiday_50);
    assert!(!r.records[1].is_holiday_100);
}

#[test]
fn shifts_of_one_day_accumulate() {
    let punches = vec![
        punch_in(1, "2023-03-01 08:00:00"),
        punch_out(1, "2023-03-01 12:00:00"),
        punch_in(1, "2023-03-01 13:00:00"),
        punch_out(1, "2023-03-01 17:30:00"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(r.records.len(), 1);
    assert_eq!(r.records[0].day_hours, dec("8.50"));
}

#[test]
fn orphan_out_is_ignored() {
    let punches = vec![punch_out(1, "2023-03-05 10:00:00")];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(r.records.is_empty());
    assert_eq!(r.orphan_outs, 1);
}

#[test]
fn out_of_shift_started_before_period_is_not_orphan() {
    let punches = vec![
        punch_in(1, "2023-02-28 22:00:00"),
        punch_out(1, "2023-03-01 06:00:00"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(r.records.is_empty());
    assert_eq!(r.orphan_outs, 0);
}

#[test]
fn zero_length_shift_emits_nothing() {
    let punches = vec![
        punch_in(1, "2023-03-01 08:00:00"),
        punch_out(1, "2023-03-01 08:00:00"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert!(r.records.is_empty());
}

#[test]
fn default_out_before_in_wraps_the_day() {
    let out = synthesized_out(ts("2023-03-01 20:00:00"), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    assert_eq!(out, ts("2023-03-01 18:59:00"));

    let h = shift_hours(ts("2023-03-01 20:00:00"), out);
    // 20:00 → 23:59:59 plus 00:00 → 18:59
    assert_eq!(round2(h.raw), dec("22.98"));
    assert_eq!(h.night, Decimal::ZERO);
}

#[test]
fn meal_units_are_capped() {
    let policy = ReconcilePolicy::default();
    assert_eq!(meal_units(dec("10"), dec("6"), &policy), 2);
    assert_eq!(meal_units(dec("9"), dec("0"), &policy), 1);
    assert_eq!(meal_units(dec("8.99"), dec("5.99"), &policy), 0);

    let off = ReconcilePolicy {
        meal_premium_auto: false,
        ..policy
    };
    assert_eq!(meal_units(dec("12"), dec("7"), &off), 0);
}

#[test]
fn other_employees_punches_are_not_used() {
    let punches = vec![
        punch_in(1, "2023-03-01 08:00:00"),
        punch_out(2, "2023-03-01 12:00:00"),
        punch_out(1, "2023-03-01 16:00:00"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(r.records[0].day_hours, dec("8.00"));
}

#[test]
fn cancelled_reconcile_leaves_window_untouched() {
    let db = setup_test_db("reconcile_cancelled");
    let pool = open_db(&db);
    let emp = seed_employee(
        &pool,
        "77",
        &[
            ("2023-03-01 08:00:00", Direction::In),
            ("2023-03-01 16:00:00", Direction::Out),
        ],
    );

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = reconcile(
        &pool.conn,
        emp,
        &march(),
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &cancel,
    );
    assert!(err.is_err());
    assert!(pool.conn.records_for(emp, &march()).unwrap().is_empty());
}

#[test]
fn reconcile_is_idempotent_and_replaces_window() {
    let db = setup_test_db("reconcile_idempotent");
    let pool = open_db(&db);
    let emp = seed_employee(
        &pool,
        "42",
        &[
            ("2023-03-01 08:00:00", Direction::In),
            ("2023-03-01 16:00:00", Direction::Out),
            ("2023-03-02 08:00:00", Direction::In),
            ("2023-03-02 17:00:00", Direction::Out),
            ("2023-03-31 22:00:00", Direction::In),
            ("2023-04-01 06:00:00", Direction::Out),
        ],
    );
    let policy = ReconcilePolicy::default();
    let calendars = Calendars::default();
    let cancel = CancellationToken::new();

    let first = reconcile(&pool.conn, emp, &march(), &policy, &calendars, &cancel).unwrap();
    let stored_first = pool.conn.records_for(emp, &march()).unwrap();
    let second = reconcile(&pool.conn, emp, &march(), &policy, &calendars, &cancel).unwrap();
    let stored_second = pool.conn.records_for(emp, &march()).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(stored_first, stored_second);
    assert_eq!(stored_first.len(), 3);
    // overnight shift at the end of the month reads its OUT from April
    assert_eq!(stored_first[2].date, date("2023-03-31"));
    assert_eq!(stored_first[2].day_hours, dec("8.00"));

    // drop the second day's OUT: recompute replaces, never merges
    let day2 = pool
        .conn
        .punches_between(emp, date("2023-03-02"), date("2023-03-02"))
        .unwrap();
    let out_id = day2.iter().find(|p| p.direction.is_out()).unwrap().id;
    pool.conn.delete_punch(out_id).unwrap();

    let policy = ReconcilePolicy {
        ignore_days_without_out: true,
        ..policy
    };
    reconcile(&pool.conn, emp, &march(), &policy, &calendars, &cancel).unwrap();
    let stored = pool.conn.records_for(emp, &march()).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|r| r.date != date("2023-03-02")));
}

#[test]
fn ignore_policy_drops_the_whole_day() {
    let policy = ReconcilePolicy {
        ignore_days_without_out: true,
        ..ReconcilePolicy::default()
    };
    let punches = vec![
        punch_in(1, "2023-03-01 08:00:00"),
        punch_out(1, "2023-03-01 12:00:00"),
        punch_in(1, "2023-03-01 13:00:00"),
        punch_in(1, "2023-03-02 08:00:00"),
        punch_out(1, "2023-03-02 16:00:00"),
    ];
    let r = reconcile_punches(
        1,
        &punches,
        &march(),
        &policy,
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(r.gaps_skipped, 1);
    assert_eq!(r.records.len(), 1);
    assert_eq!(r.records[0].date, date("2023-03-02"));
    assert_eq!(r.records[0].day_hours, dec("8.00"));
}

#[test]
fn default_out_uses_only_the_hour() {
    let half_past = NaiveTime::from_hms_opt(17, 30, 0).unwrap();
    assert_eq!(
        synthesized_out(ts("2023-03-01 08:00:00"), half_past),
        ts("2023-03-01 17:59:00")
    );
}

#[test]
fn gap_before_the_period_is_not_counted() {
    for ignore in [false, true] {
        let policy = ReconcilePolicy {
            ignore_days_without_out: ignore,
            ..ReconcilePolicy::default()
        };
        let punches = vec![
            punch_in(1, "2023-02-28 08:00:00"),
            punch_in(1, "2023-03-01 08:00:00"),
            punch_out(1, "2023-03-01 16:00:00"),
        ];
        let r = reconcile_punches(
            1,
            &punches,
            &march(),
            &policy,
            &Calendars::default(),
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(r.gaps_synthesized, 0);
        assert_eq!(r.gaps_skipped, 0);
        assert_eq!(r.records.len(), 1);
        assert_eq!(r.records[0].day_hours, dec("8.00"));
    }
}
