//! Overtime tier classification.
//!
//! Excess hours fill the tiers in table order; each tier takes at most its
//! capacity and the last, open-ended tier absorbs the rest. The table is
//! configuration: nothing here knows which rates exist beyond the four
//! payroll buckets the totals expose.

use crate::errors::{AppError, AppResult};
use crate::models::{OvertimeTier, TierAllocation};
use crate::utils::time::round2;
use rust_decimal::Decimal;
use std::collections::HashSet;

const KNOWN_RATES: [u16; 4] = [115, 140, 150, 200];

/// Check that a tier table can be used by `classify`.
pub fn validate(tiers: &[OvertimeTier]) -> AppResult<()> {
    let Some((last, head)) = tiers.split_last() else {
        return Err(AppError::InvalidTiers("no tiers configured".into()));
    };

    if last.capacity.is_some() {
        return Err(AppError::InvalidTiers(format!(
            "last tier ({}%) must have no capacity",
            last.rate_percent
        )));
    }

    for tier in head {
        match tier.capacity {
            None => {
                return Err(AppError::InvalidTiers(format!(
                    "only the last tier may be open-ended ({}%)",
                    tier.rate_percent
                )));
            }
            Some(c) if c <= Decimal::ZERO => {
                return Err(AppError::InvalidTiers(format!(
                    "capacity of {}% must be positive",
                    tier.rate_percent
                )));
            }
            Some(_) => {}
        }
    }

    let mut seen = HashSet::new();
    for tier in tiers {
        if !KNOWN_RATES.contains(&tier.rate_percent) {
            return Err(AppError::InvalidTiers(format!(
                "unsupported rate {}%",
                tier.rate_percent
            )));
        }
        if !seen.insert(tier.rate_percent) {
            return Err(AppError::InvalidTiers(format!(
                "rate {}% listed twice",
                tier.rate_percent
            )));
        }
    }

    Ok(())
}

/// Allocate `excess_hours` into the tiers.
pub fn classify(excess_hours: Decimal, tiers: &[OvertimeTier]) -> AppResult<TierAllocation> {
    validate(tiers)?;

    let mut out = TierAllocation::default();
    let mut remaining = excess_hours.max(Decimal::ZERO);

    for tier in tiers {
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = match tier.capacity {
            Some(cap) => remaining.min(cap),
            None => remaining,
        };
        remaining -= take;

        if let Some(slot) = out.slot_mut(tier.rate_percent) {
            *slot += take;
        }
    }

    out.hs115 = round2(out.hs115);
    out.hs140 = round2(out.hs140);
    out.hs150 = round2(out.hs150);
    out.hs200 = round2(out.hs200);
    Ok(out)
}
