//! Formatting utilities used for CLI and export outputs.

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    match ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// Fixed two-decimal rendering used in tables and CSV ("7" → "7.00").
pub fn hours2(value: Decimal) -> String {
    format!("{:.2}", value)
}

pub fn flag(b: bool) -> &'static str {
    if b { "yes" } else { "" }
}
