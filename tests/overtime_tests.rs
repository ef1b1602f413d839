mod common;
use common::{date, open_db, seed_employee, setup_test_db};

use pointage::core::aggregate::{aggregate, aggregate_records};
use pointage::core::overtime::{classify, validate};
use pointage::core::reconcile::reconcile;
use pointage::jobs::CancellationToken;
use pointage::models::{
    Calendars, DayRecord, Direction, OvertimeConfig, OvertimeTier, Period, ReconcilePolicy,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn tiers() -> Vec<OvertimeTier> {
    OvertimeConfig::default().tiers
}

fn record(day: &str, hours: &str, night: &str) -> DayRecord {
    DayRecord {
        employee_id: 1,
        date: date(day),
        day_hours: dec(hours),
        night_hours: dec(night),
        meal_premium_units: 0,
        is_weekend: false,
        is_holiday_50: false,
        is_holiday_100: false,
        note: String::new(),
        period: "2023-03".into(),
    }
}

#[test]
fn tiers_fill_in_order() {
    let a = classify(dec("30"), &tiers()).unwrap();
    assert_eq!(a.hs115, dec("8"));
    assert_eq!(a.hs140, dec("8"));
    assert_eq!(a.hs150, dec("8"));
    assert_eq!(a.hs200, dec("6"));
    assert_eq!(a.total(), dec("30"));

    let small = classify(dec("5.25"), &tiers()).unwrap();
    assert_eq!(small.hs115, dec("5.25"));
    assert_eq!(small.hs140, Decimal::ZERO);
}

#[test]
fn no_excess_no_overtime() {
    assert_eq!(classify(Decimal::ZERO, &tiers()).unwrap().total(), Decimal::ZERO);
    assert_eq!(classify(dec("-3"), &tiers()).unwrap().total(), Decimal::ZERO);
}

#[test]
fn invalid_tier_tables_are_rejected() {
    assert!(validate(&[]).is_err());

    let bounded_last = vec![OvertimeTier {
        rate_percent: 115,
        capacity: Some(dec("8")),
    }];
    assert!(validate(&bounded_last).is_err());

    let open_middle = vec![
        OvertimeTier {
            rate_percent: 115,
            capacity: None,
        },
        OvertimeTier {
            rate_percent: 200,
            capacity: None,
        },
    ];
    assert!(validate(&open_middle).is_err());

    let unknown_rate = vec![OvertimeTier {
        rate_percent: 125,
        capacity: None,
    }];
    assert!(validate(&unknown_rate).is_err());

    let twice = vec![
        OvertimeTier {
            rate_percent: 115,
            capacity: Some(dec("8")),
        },
        OvertimeTier {
            rate_percent: 115,
            capacity: None,
        },
    ];
    assert!(validate(&twice).is_err());

    assert!(validate(&tiers()).is_ok());
}

#[test]
fn period_totals_from_records() {
    let period = Period::month(2023, 3).unwrap();
    // 20 days × 9h = 180h, contract 173.33h
    let records: Vec<DayRecord> = (1..=20)
        .map(|d| record(&format!("2023-03-{d:02}"), "8.00", "1.00"))
        .collect();

    let t = aggregate_records(1, &period, &records, &OvertimeConfig::default()).unwrap();
    assert_eq!(t.days, 20);
    assert_eq!(t.day_hours_total, dec("160.00"));
    assert_eq!(t.night_hours_total, dec("20.00"));
    assert_eq!(t.worked_hours(), dec("180.00"));
    assert_eq!(t.excess_hours, dec("6.67"));
    assert_eq!(t.hs115, dec("6.67"));
    assert_eq!(t.hs140, Decimal::ZERO);
    assert_eq!(t.period, "2023-03");
}

#[test]
fn weekend_and_holiday_hours_are_summed() {
    let period = Period::month(2023, 3).unwrap();
    let mut sat = record("2023-03-04", "4.00", "0.50");
    sat.is_weekend = true;
    let mut hol = record("2023-03-08", "3.00", "0");
    hol.is_holiday_100 = true;

    let t = aggregate_records(1, &period, &[sat, hol], &OvertimeConfig::default()).unwrap();
    assert_eq!(t.weekend_hours, dec("4.50"));
    assert_eq!(t.holiday_hours, dec("3.00"));
    assert_eq!(t.excess_hours, Decimal::ZERO);
}

#[test]
fn aggregate_matches_reconcile_output() {
    let db = setup_test_db("aggregate_round_trip");
    let pool = open_db(&db);
    let emp = seed_employee(
        &pool,
        "5",
        &[
            ("2023-03-01 08:00:00", Direction::In),
            ("2023-03-01 17:20:00", Direction::Out),
            ("2023-03-02 14:00:00", Direction::In),
            ("2023-03-02 23:15:00", Direction::Out),
            ("2023-03-03 08:00:00", Direction::In),
        ],
    );
    let period = Period::month(2023, 3).unwrap();

    let r = reconcile(
        &pool.conn,
        emp,
        &period,
        &ReconcilePolicy::default(),
        &Calendars::default(),
        &CancellationToken::new(),
    )
    .unwrap();
    let t = aggregate(&pool.conn, emp, &period, &OvertimeConfig::default()).unwrap();

    let day: Decimal = r.records.iter().map(|d| d.day_hours).sum();
    let night: Decimal = r.records.iter().map(|d| d.night_hours).sum();
    let meals: u32 = r.records.iter().map(|d| u32::from(d.meal_premium_units)).sum();

    assert_eq!(t.days, r.records.len());
    assert_eq!(t.day_hours_total, day);
    assert_eq!(t.night_hours_total, night);
    assert_eq!(t.meal_premium_units, meals);
    assert_eq!(t.night_hours_total, dec("1.25"));
}
