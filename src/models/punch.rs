use super::direction::Direction;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Where a punch came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PunchSource {
    Imported,
    Device,
    Manual,
}

impl PunchSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchSource::Imported => "imported",
            PunchSource::Device => "device",
            PunchSource::Manual => "manual",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "imported" => Some(PunchSource::Imported),
            "device" => Some(PunchSource::Device),
            "manual" => Some(PunchSource::Manual),
            _ => None,
        }
    }
}

/// A single clock-in or clock-out event.
///
/// Punches are raw evidence: once stored they are never edited, only deleted.
/// `id` is 0 until the store assigns one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Punch {
    pub id: i64,
    pub employee_id: i64,
    pub timestamp: NaiveDateTime,
    pub direction: Direction,
    pub source: PunchSource,
}

impl Punch {
    pub fn new(
        employee_id: i64,
        timestamp: NaiveDateTime,
        direction: Direction,
        source: PunchSource,
    ) -> Self {
        Self {
            id: 0,
            employee_id,
            timestamp,
            direction,
            source,
        }
    }

    /// Identity used for deduplication.
    pub fn key(&self) -> (i64, NaiveDateTime, Direction) {
        (self.employee_id, self.timestamp, self.direction)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn date_str(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
