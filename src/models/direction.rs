use serde::{Deserialize, Serialize};

/// Direction of a clock punch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }

    /// Lenient parser for CLI input ("IN", "in", "Out", ...).
    pub fn from_code(s: &str) -> Option<Self> {
        Self::from_db_str(&s.trim().to_lowercase())
    }

    pub fn is_in(&self) -> bool {
        matches!(self, Direction::In)
    }

    pub fn is_out(&self) -> bool {
        matches!(self, Direction::Out)
    }
}
