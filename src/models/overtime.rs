use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One overtime bucket. `capacity = None` marks the open-ended last tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OvertimeTier {
    pub rate_percent: u16,
    #[serde(default)]
    pub capacity: Option<Decimal>,
}

/// Contractual norm and tier table used to classify period overtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OvertimeConfig {
    /// Hours owed per period before overtime starts.
    pub contract_hours: Decimal,
    pub tiers: Vec<OvertimeTier>,
}

impl Default for OvertimeConfig {
    fn default() -> Self {
        Self {
            // 40h a week, monthly
            contract_hours: Decimal::new(17333, 2),
            tiers: vec![
                OvertimeTier {
                    rate_percent: 115,
                    capacity: Some(Decimal::from(8)),
                },
                OvertimeTier {
                    rate_percent: 140,
                    capacity: Some(Decimal::from(8)),
                },
                OvertimeTier {
                    rate_percent: 150,
                    capacity: Some(Decimal::from(8)),
                },
                OvertimeTier {
                    rate_percent: 200,
                    capacity: None,
                },
            ],
        }
    }
}

/// Excess hours split by pay rate.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TierAllocation {
    pub hs115: Decimal,
    pub hs140: Decimal,
    pub hs150: Decimal,
    pub hs200: Decimal,
}

impl TierAllocation {
    pub fn total(&self) -> Decimal {
        self.hs115 + self.hs140 + self.hs150 + self.hs200
    }

    pub(crate) fn slot_mut(&mut self, rate_percent: u16) -> Option<&mut Decimal> {
        match rate_percent {
            115 => Some(&mut self.hs115),
            140 => Some(&mut self.hs140),
            150 => Some(&mut self.hs150),
            200 => Some(&mut self.hs200),
            _ => None,
        }
    }
}

/// Period totals derived from stored day records. Never authoritative:
/// always recomputable from the records themselves.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PeriodOvertimeTotals {
    pub employee_id: i64,
    pub period: String,
    pub days: usize,
    pub day_hours_total: Decimal,
    pub night_hours_total: Decimal,
    pub meal_premium_units: u32,
    pub weekend_hours: Decimal,
    pub holiday_hours: Decimal,
    pub excess_hours: Decimal,
    pub hs115: Decimal,
    pub hs140: Decimal,
    pub hs150: Decimal,
    pub hs200: Decimal,
}

impl PeriodOvertimeTotals {
    pub fn worked_hours(&self) -> Decimal {
        self.day_hours_total + self.night_hours_total
    }
}
