use std::collections::HashMap;

use rust_decimal::Decimal;

use super::cycle::{cycle_key, CycleKey};
use super::rule::{raw_cashback, CashbackResult};
use crate::models::{Category, Expense};

/// An expense together with the cashback it earned once caps were applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExpenseCashback<'a> {
    pub(crate) expense: &'a Expense,
    /// `None` when the expense points at a category that no longer exists.
    pub(crate) category: Option<&'a Category>,
    pub(crate) cycle: CycleKey,
    pub(crate) cashback: CashbackResult,
}

/// Apportions each category's cycle cap across its expenses in date order,
/// so the earliest expenses in a cycle use up the cap first.
///
/// Running totals are kept per `(cycle, category)` and only live for one
/// [CapTracker::apportion] call.
pub(crate) struct CapTracker<'a> {
    categories: HashMap<&'a str, &'a Category>,
    cycle_start_day: u32,
    running: HashMap<(CycleKey, &'a str), Decimal>,
}

impl<'a> CapTracker<'a> {
    fn new(categories: &'a [Category], cycle_start_day: u32) -> Self {
        Self {
            categories: categories.iter().map(|c| (c.id.as_str(), c)).collect(),
            cycle_start_day,
            running: HashMap::new(),
        }
    }

    /// Compute eligible and lost cashback for every expense.
    ///
    /// Results come back in processing order: ascending by date, with
    /// same-day expenses kept in input order.
    pub(crate) fn apportion(
        expenses: &'a [Expense],
        categories: &'a [Category],
        cycle_start_day: u32,
    ) -> Vec<ExpenseCashback<'a>> {
        let mut ordered: Vec<&Expense> = expenses.iter().collect();
        ordered.sort_by_key(|e| e.date);

        let mut tracker = Self::new(categories, cycle_start_day);
        ordered.into_iter().map(|e| tracker.process(e)).collect()
    }

    fn process(&mut self, expense: &'a Expense) -> ExpenseCashback<'a> {
        let cycle = cycle_key(self.cycle_start_day, expense.date);
        let Some(&category) = self.categories.get(expense.category_id.as_str()) else {
            return ExpenseCashback {
                expense,
                category: None,
                cycle,
                cashback: CashbackResult::ZERO,
            };
        };

        let raw = raw_cashback(expense.amount, category.cashback_percent);
        let cashback = match category.limit() {
            None => CashbackResult::uncapped(raw),
            Some(limit) => {
                let used = self
                    .running
                    .entry((cycle, category.id.as_str()))
                    .or_insert(Decimal::ZERO);
                let result = CashbackResult::capped(raw, limit.saturating_sub(*used));
                // The running total tracks raw cashback, so it keeps growing
                // past the cap and every later expense is fully lost.
                *used = used.saturating_add(raw);
                result
            }
        };

        ExpenseCashback {
            expense,
            category: Some(category),
            cycle,
            cashback,
        }
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
