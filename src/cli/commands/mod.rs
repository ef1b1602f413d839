pub mod calendar;
pub mod config;
pub mod db;
pub mod employee;
pub mod export;
pub mod holiday;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod punch;
pub mod reconcile;
pub mod summary;
