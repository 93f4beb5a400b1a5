//! Domain errors surfaced by validation, the store and backup restore.

use rust_decimal::Decimal;

/// The errors that callers may want to tell apart.
///
/// Store and CLI code wraps these in [anyhow::Error]; use
/// `err.downcast_ref::<Error>()` to match on them.
#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum Error {
    /// An empty (or whitespace only) string was used as a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// Cashback percentages are whole-rate numbers between 0 and 100.
    #[error("cashback percent must be between 0 and 100, got {0}")]
    PercentOutOfRange(Decimal),

    /// A monthly cap was given but is below zero.
    ///
    /// Zero is allowed and means "no cap".
    #[error("monthly limit cannot be negative, got {0}")]
    NegativeLimit(Decimal),

    /// A non-zero monthly cap below one hundredth of a currency unit.
    #[error("monthly limit must be at least 0.01, got {0}")]
    LimitTooSmall(Decimal),

    #[error("monthly limit cannot exceed 1000000000000, got {0}")]
    LimitTooLarge(Decimal),

    /// Expenses record money that was spent, so the amount must be above zero.
    #[error("expense amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("expense amount cannot exceed 1000000000000, got {0}")]
    AmountTooLarge(Decimal),

    /// The expense does not point at any category.
    #[error("expense must belong to a category")]
    MissingCategory,

    /// Billing cycles start on day 1 to 28 so that every month has the day.
    #[error("billing cycle start day must be between 1 and 28, got {0}")]
    CycleStartOutOfRange(u32),

    #[error("currency symbol cannot be empty")]
    EmptyCurrency,

    /// No category with the given ID or name exists.
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// No expense with the given ID exists.
    #[error("expense not found: {0}")]
    ExpenseNotFound(String),

    /// The backup payload could not be parsed. Nothing was written.
    #[error("backup could not be read: {0}")]
    MalformedBackup(String),

    /// A cycle label such as "JAN 26" could not be parsed.
    #[error("invalid billing cycle \"{0}\", expected a label like \"JAN 26\"")]
    InvalidCycleKey(String),
}
