#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn run(db: &mut Database, list: &[&str]) -> Result<()> {
    let mut args = vec!["cashback".to_string()];
    args.extend(list.iter().map(|s| s.to_string()));
    as_cli(&args, db)
}

fn domain_error(err: &anyhow::Error) -> &Error {
    err.downcast_ref::<Error>().unwrap()
}

#[test]
fn test_no_command_prints_summary() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &[]).unwrap();
}

#[test]
fn test_unknown_command() {
    let mut db = Database::open_in_memory().unwrap();
    let err = run(&mut db, &["frobnicate"]).unwrap_err();
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn test_add_category_and_expense() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["add-category", "Fuel", "2.5", "--limit", "₹150"]).unwrap();

    let categories = db.get_categories().unwrap();
    let fuel = Category::find_by_name(&categories, "fuel").unwrap();
    assert_eq!(fuel.cashback_percent, dec!(2.5));
    assert_eq!(fuel.monthly_limit, Some(dec!(150)));
    assert_eq!(fuel.color, PALETTE[3]);

    run(
        &mut db,
        &["add-expense", "fuel", "1,200", "--date", "2026-01-05", "--note", " full tank "],
    )
    .unwrap();
    let expenses = db.get_expenses().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category_id, fuel.id);
    assert_eq!(expenses[0].amount, dec!(1200));
    assert_eq!(expenses[0].note, "full tank");
    assert_eq!(expenses[0].date.to_string(), "2026-01-05");
}

#[test]
fn test_add_expense_unknown_category() {
    let mut db = Database::open_in_memory().unwrap();
    let err = run(&mut db, &["add-expense", "Nope", "100"]).unwrap_err();
    assert_eq!(domain_error(&err), &Error::CategoryNotFound("Nope".into()));
}

#[test]
fn test_add_expense_rejects_zero() {
    let mut db = Database::open_in_memory().unwrap();
    let err = run(&mut db, &["add-expense", "Airtel Payment", "0"]).unwrap_err();
    assert!(matches!(domain_error(&err), Error::NonPositiveAmount(_)));
    assert!(db.get_expenses().unwrap().is_empty());
}

#[test]
fn test_oversized_values_are_rejected() {
    let mut db = Database::open_in_memory().unwrap();
    let err = run(
        &mut db,
        &["add-expense", "Airtel Payment", "1000000000000000000000000000"],
    )
    .unwrap_err();
    assert!(matches!(domain_error(&err), Error::AmountTooLarge(_)));
    assert!(db.get_expenses().unwrap().is_empty());

    let err = run(
        &mut db,
        &["edit-category", "Airtel Payment", "--limit", "0.0000000000000000000000001"],
    )
    .unwrap_err();
    assert!(matches!(domain_error(&err), Error::LimitTooSmall(_)));

    run(&mut db, &["add-expense", "Airtel Payment", "10000", "--date", "2026-01-05"]).unwrap();
    run(&mut db, &["summary", "--date", "2026-01-05"]).unwrap();
}

#[test]
fn test_add_expense_needs_two_arguments() {
    let mut db = Database::open_in_memory().unwrap();
    assert!(run(&mut db, &["add-expense", "Airtel Payment"]).is_err());
}

#[test]
fn test_edit_and_delete_expense() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["add-expense", "Airtel Payment", "500", "--date", "2026-01-05"]).unwrap();
    let id = db.get_expenses().unwrap()[0].id.clone();

    run(&mut db, &["edit-expense", id.as_str(), "--amount", "750"]).unwrap();
    assert_eq!(db.get_expense(&id).unwrap().unwrap().amount, dec!(750));

    assert!(run(&mut db, &["edit-expense", id.as_str()]).is_err());

    run(&mut db, &["delete-expense", id.as_str()]).unwrap();
    assert!(db.get_expenses().unwrap().is_empty());
}

#[test]
fn test_edit_category_clears_limit() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["edit-category", "Airtel Payment", "--limit", "none", "--percent", "20"]).unwrap();

    let categories = db.get_categories().unwrap();
    let airtel = Category::find_by_name(&categories, "Airtel Payment").unwrap();
    assert_eq!(airtel.monthly_limit, None);
    assert_eq!(airtel.cashback_percent, dec!(20));
}

#[test]
fn test_delete_category_cascades() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["add-expense", "Other Utilities", "100", "--date", "2026-01-05"]).unwrap();
    run(&mut db, &["add-expense", "Airtel Payment", "100", "--date", "2026-01-05"]).unwrap();

    run(&mut db, &["delete-category", "other utilities"]).unwrap();
    assert_eq!(db.get_categories().unwrap().len(), 2);
    assert_eq!(db.get_expenses().unwrap().len(), 1);
}

#[test]
fn test_settings_update() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["settings", "--cycle-start", "15", "--currency", "$"]).unwrap();
    let settings = db.get_settings().unwrap();
    assert_eq!(settings.billing_cycle_start, 15);
    assert_eq!(settings.currency, "$");

    let err = run(&mut db, &["settings", "--cycle-start", "30"]).unwrap_err();
    assert_eq!(domain_error(&err), &Error::CycleStartOutOfRange(30));
    assert!(run(&mut db, &["settings", "--cycle-start", "soon"]).is_err());
    assert_eq!(db.get_settings().unwrap().billing_cycle_start, 15);
}

#[test]
fn test_expense_views_accept_filters() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["add-expense", "Airtel Payment", "500", "--date", "2026-01-05"]).unwrap();

    run(&mut db, &["expenses"]).unwrap();
    run(&mut db, &["expenses", "--all"]).unwrap();
    run(&mut db, &["expenses", "--cycle", "JAN 26"]).unwrap();
    run(&mut db, &["expenses", "--from", "2026-01-01", "--to", "2026-01-31"]).unwrap();
    run(&mut db, &["summary", "--date", "2026-01-05"]).unwrap();
    run(&mut db, &["categories"]).unwrap();

    let err = run(&mut db, &["expenses", "--cycle", "someday"]).unwrap_err();
    assert!(matches!(domain_error(&err), Error::InvalidCycleKey(_)));
    assert!(run(&mut db, &["summary", "--date", "tomorrow"]).is_err());
}

#[test]
fn test_backup_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let backup = dir.path().join("backup.json");
    let backup = backup.to_str().unwrap();

    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["add-expense", "Airtel Payment", "942", "--date", "2026-01-05"]).unwrap();
    run(&mut db, &["export", backup]).unwrap();

    let mut restored = Database::open_in_memory().unwrap();
    run(&mut restored, &["import", backup]).unwrap();
    assert_eq!(restored.get_expenses().unwrap(), db.get_expenses().unwrap());
    assert_eq!(restored.get_categories().unwrap(), db.get_categories().unwrap());
}

#[test]
fn test_import_missing_file() {
    let mut db = Database::open_in_memory().unwrap();
    let err = run(&mut db, &["import", "/no/such/backup.json"]).unwrap_err();
    assert!(err.to_string().contains("File not found"));
}

#[test]
fn test_export_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");

    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["add-expense", "Airtel Payment", "500", "--date", "2026-01-05"]).unwrap();
    run(&mut db, &["export-csv", path.to_str().unwrap()]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("JAN 26,2026-01-05,Airtel Payment,500,125,125,0,"));
}

#[test]
fn test_reset_requires_confirmation() {
    let mut db = Database::open_in_memory().unwrap();
    run(&mut db, &["add-expense", "Airtel Payment", "500"]).unwrap();

    assert!(run(&mut db, &["reset"]).is_err());
    assert_eq!(db.get_expenses().unwrap().len(), 1);

    run(&mut db, &["reset", "--yes"]).unwrap();
    assert!(db.get_expenses().unwrap().is_empty());
    assert_eq!(db.get_categories().unwrap().len(), 3);
}
