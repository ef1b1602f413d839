//! Time utilities: parsing HH:MM, exact hour arithmetic, HALF_UP rounding.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_HOUR: i64 = 3600;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

pub fn parse_time_strict(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

/// Exact number of hours between two instants (may be negative).
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> Decimal {
    seconds_to_hours((end - start).num_seconds())
}

pub fn seconds_to_hours(secs: i64) -> Decimal {
    Decimal::from(secs) / Decimal::from(SECONDS_PER_HOUR)
}

/// HALF_UP to 2 decimals: 7.005 → 7.01.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Serde adapter for `NaiveTime` stored as "HH:MM".
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).ok_or_else(|| de::Error::custom(format!("invalid time '{raw}'")))
    }
}
