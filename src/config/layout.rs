//! Column layouts for punch imports.

use crate::models::PunchSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date patterns accepted in import files. Chosen by configuration, never
/// guessed from the data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatePattern {
    #[serde(rename = "dd/MM/yyyy")]
    DayMonthYear,
    #[serde(rename = "MM/dd/yyyy")]
    MonthDayYear,
    #[serde(rename = "yyyy-MM-dd")]
    Iso,
    #[serde(rename = "yyMMdd")]
    CompactYearFirst,
    #[serde(rename = "ddMMyy")]
    CompactDayFirst,
}

impl DatePattern {
    pub fn chrono_format(&self) -> &'static str {
        match self {
            DatePattern::DayMonthYear => "%d/%m/%Y",
            DatePattern::MonthDayYear => "%m/%d/%Y",
            DatePattern::Iso => "%Y-%m-%d",
            DatePattern::CompactYearFirst => "%y%m%d",
            DatePattern::CompactDayFirst => "%d%m%y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatePattern::DayMonthYear => "dd/MM/yyyy",
            DatePattern::MonthDayYear => "MM/dd/yyyy",
            DatePattern::Iso => "yyyy-MM-dd",
            DatePattern::CompactYearFirst => "yyMMdd",
            DatePattern::CompactDayFirst => "ddMMyy",
        }
    }

    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        // compact patterns are fixed width; chrono would otherwise accept "1234"
        let fixed_len = matches!(
            self,
            DatePattern::CompactYearFirst | DatePattern::CompactDayFirst
        );
        if fixed_len && (raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit())) {
            return None;
        }
        NaiveDate::parse_from_str(raw, self.chrono_format()).ok()
    }
}

/// Where each field sits in a raw import row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportLayout {
    /// 1-based line number of the first data row (header lines come before).
    pub first_data_row: usize,
    pub employee_col: usize,
    pub date_col: usize,
    pub time_col: usize,
    pub direction_col: usize,
    pub date_pattern: DatePattern,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_in_tokens")]
    pub in_tokens: Vec<String>,
    #[serde(default = "default_out_tokens")]
    pub out_tokens: Vec<String>,
    pub source: PunchSource,
}

fn default_delimiter() -> char {
    ','
}

fn default_in_tokens() -> Vec<String> {
    ["in", "i", "c/in", "checkin", "entree", "entrée"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_out_tokens() -> Vec<String> {
    ["out", "o", "c/out", "checkout", "sortie"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ImportLayout {
    /// Device CSV: `device_id,date,time,direction` with a header line.
    pub fn device_default() -> Self {
        Self {
            first_data_row: 2,
            employee_col: 0,
            date_col: 1,
            time_col: 2,
            direction_col: 3,
            date_pattern: DatePattern::DayMonthYear,
            delimiter: default_delimiter(),
            in_tokens: default_in_tokens(),
            out_tokens: default_out_tokens(),
            source: PunchSource::Device,
        }
    }

    /// Legacy single-sheet workbook, read from its delimited export.
    pub fn sheet_default() -> Self {
        Self {
            first_data_row: 5,
            employee_col: 1,
            date_col: 3,
            time_col: 4,
            direction_col: 5,
            date_pattern: DatePattern::DayMonthYear,
            delimiter: ';',
            in_tokens: default_in_tokens(),
            out_tokens: default_out_tokens(),
            source: PunchSource::Imported,
        }
    }

    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}
