mod category;
mod expense;
mod settings;

use rust_decimal::Decimal;

pub(crate) use category::{default_categories, Category, CategoryUpdate, PALETTE};
pub(crate) use expense::{Expense, ExpenseUpdate};
pub(crate) use settings::{Settings, CYCLE_START_RANGE};

/// Largest expense amount or monthly limit accepted on input: one trillion.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Smallest non-zero monthly limit: one hundredth of a currency unit.
pub(crate) const MIN_LIMIT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A fresh random record ID.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
