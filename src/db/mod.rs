pub mod calendar;
pub mod day_records;
pub mod employees;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod punches;
pub mod stats;
pub mod store;

pub use pool::DbPool;
pub use store::{DayRecordStore, EmployeeDirectory, PunchStore};
