//! Plain value types shared by ingestion, reconciliation and aggregation.

pub mod calendar;
pub mod day_record;
pub mod direction;
pub mod employee;
pub mod overtime;
pub mod period;
pub mod policy;
pub mod punch;

pub use calendar::{
    Calendars, Holiday, HolidayCalendar, HolidayPremium, WeekdayEntry, WeeklyCalendar,
};
pub use day_record::DayRecord;
pub use direction::Direction;
pub use employee::Employee;
pub use overtime::{OvertimeConfig, OvertimeTier, PeriodOvertimeTotals, TierAllocation};
pub use period::Period;
pub use policy::ReconcilePolicy;
pub use punch::{Punch, PunchSource};
