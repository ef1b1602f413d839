use serde::Serialize;

/// Employee as known by the directory: internal id plus the id printed on
/// the time-clock device.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub device_id: String,
    pub name: String,
}
