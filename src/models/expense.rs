use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MAX_AMOUNT;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Expense {
    pub(crate) id: String,
    pub(crate) category_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
    #[serde(default)]
    pub(crate) note: String,
}

impl Expense {
    pub(crate) fn new(category_id: String, amount: Decimal, date: NaiveDate, note: String) -> Self {
        Self {
            id: super::new_id(),
            category_id,
            amount,
            date,
            note: note.trim().to_string(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.category_id.is_empty() {
            return Err(Error::MissingCategory);
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(self.amount));
        }
        if self.amount > MAX_AMOUNT {
            return Err(Error::AmountTooLarge(self.amount));
        }
        Ok(())
    }

    pub(crate) fn apply(&mut self, update: ExpenseUpdate) {
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(note) = update.note {
            self.note = note.trim().to_string();
        }
    }
}

/// Fields to change on an existing expense. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseUpdate {
    pub(crate) category_id: Option<String>,
    pub(crate) amount: Option<Decimal>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) note: Option<String>,
}
