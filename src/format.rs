use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cashback::BillingCycle;

/// Format a decimal amount with a currency symbol, thousand separators and
/// 2 decimal places.
/// e.g. `(1234567.89, "₹")` → `"₹1,234,567.89"`
pub(crate) fn format_money(val: Decimal, currency: &str) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{currency}{with_commas}.{dec_part}")
    } else {
        format!("{currency}{with_commas}.{dec_part}")
    }
}

/// A cashback rate without trailing zeros, e.g. `25%` or `2.5%`.
pub(crate) fn format_percent(val: Decimal) -> String {
    format!("{}%", val.normalize())
}

/// e.g. `5 Jan 2026`
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// The first and last day of a cycle, e.g. `15 Jan 2026 - 14 Feb 2026`.
pub(crate) fn format_window(cycle: &BillingCycle) -> String {
    format!("{} - {}", format_date(cycle.start), format_date(cycle.end))
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
