use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Flags that stand alone; every other `--flag` takes a value.
const SWITCHES: &[&str] = &["--all", "--yes"];

/// The value following `name`, e.g. `--date 2026-01-05`.
pub(crate) fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

pub(crate) fn switch(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// Arguments that are neither flags nor flag values.
pub(crate) fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            if !SWITCHES.contains(&arg.as_str()) {
                iter.next();
            }
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

/// Parse an amount typed by a user, ignoring a leading currency symbol and
/// thousand separators: `₹1,234.50` → `1234.50`.
pub(crate) fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.')
        .replace(',', "");
    Decimal::from_str(cleaned.trim()).with_context(|| format!("Failed to parse '{s}' as an amount"))
}

/// `none` clears a limit; anything else must be an amount.
pub(crate) fn parse_limit(s: &str) -> Result<Option<Decimal>> {
    if s.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_decimal(s).map(Some)
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home_dir())
    } else {
        path.to_string()
    }
}

pub(crate) fn home_dir() -> String {
    std::env::var("HOME").unwrap_or_else(|_| ".".into())
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
