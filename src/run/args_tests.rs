#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ── flags ─────────────────────────────────────────────────────

#[test]
fn test_flag_value() {
    let a = args(&["Fuel", "500", "--date", "2026-01-05", "--note", "petrol"]);
    assert_eq!(flag(&a, "--date"), Some("2026-01-05"));
    assert_eq!(flag(&a, "--note"), Some("petrol"));
    assert_eq!(flag(&a, "--color"), None);
}

#[test]
fn test_flag_without_value() {
    let a = args(&["--date"]);
    assert_eq!(flag(&a, "--date"), None);
}

#[test]
fn test_switch() {
    let a = args(&["--all", "--from", "2026-01-01"]);
    assert!(switch(&a, "--all"));
    assert!(!switch(&a, "--yes"));
}

#[test]
fn test_positionals_skip_flag_values() {
    let a = args(&["Fuel", "--date", "2026-01-05", "500", "--all", "extra"]);
    assert_eq!(positionals(&a), ["Fuel", "500", "extra"]);
}

#[test]
fn test_positionals_empty() {
    assert!(positionals(&[]).is_empty());
}

// ── parse_decimal ─────────────────────────────────────────────

#[test]
fn test_parse_plain() {
    assert_eq!(parse_decimal("942").unwrap(), dec!(942));
    assert_eq!(parse_decimal(" 12.50 ").unwrap(), dec!(12.50));
}

#[test]
fn test_parse_with_currency_and_commas() {
    assert_eq!(parse_decimal("₹1,234.50").unwrap(), dec!(1234.50));
    assert_eq!(parse_decimal("$99").unwrap(), dec!(99));
    assert_eq!(parse_decimal("Rs 2,000").unwrap(), dec!(2000));
}

#[test]
fn test_parse_negative() {
    assert_eq!(parse_decimal("-5").unwrap(), dec!(-5));
}

#[test]
fn test_parse_invalid() {
    assert!(parse_decimal("abc").is_err());
    assert!(parse_decimal("").is_err());
}

#[test]
fn test_parse_limit() {
    assert_eq!(parse_limit("none").unwrap(), None);
    assert_eq!(parse_limit("NONE").unwrap(), None);
    assert_eq!(parse_limit("250").unwrap(), Some(dec!(250)));
    assert!(parse_limit("lots").is_err());
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date() {
    assert_eq!(
        parse_date("2026-01-05").unwrap(),
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    );
    assert!(parse_date("05/01/2026").is_err());
    assert!(parse_date("2026-02-30").is_err());
}

// ── shellexpand ───────────────────────────────────────────────

#[test]
fn test_shellexpand_leaves_plain_paths() {
    assert_eq!(shellexpand("/tmp/backup.json"), "/tmp/backup.json");
    assert_eq!(shellexpand("backup.json"), "backup.json");
}

#[test]
fn test_shellexpand_home() {
    let expanded = shellexpand("~/backup.json");
    assert!(expanded.ends_with("/backup.json"));
    assert!(!expanded.starts_with('~'));
}
