use crate::utils::time::hhmm;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rules applied by the reconciler. Passed explicitly into every
/// reconciliation call and never mutated while one runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReconcilePolicy {
    /// Skip the whole day when one of its INs has no matching OUT, instead
    /// of synthesizing the OUT.
    pub ignore_days_without_out: bool,

    /// Cut-off used to synthesize the missing OUT (HH:MM). Only the hour
    /// counts: the OUT is placed at minute 59 of it.
    #[serde(with = "hhmm")]
    pub default_out_time: NaiveTime,

    /// Grant meal premium units automatically from worked hours.
    pub meal_premium_auto: bool,

    pub meal_day_threshold: Decimal,
    pub meal_night_threshold: Decimal,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            ignore_days_without_out: false,
            default_out_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
            meal_premium_auto: true,
            meal_day_threshold: Decimal::from(9),
            meal_night_threshold: Decimal::from(6),
        }
    }
}
