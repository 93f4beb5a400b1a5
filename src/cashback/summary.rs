use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::cycle::{resolve_cycle, BillingCycle, CycleKey};
use super::rule::raw_cashback;
use super::tracker::{CapTracker, ExpenseCashback};
use crate::models::{Category, Expense};

/// Spending and cashback for one category within one billing cycle.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryCycleStats {
    pub(crate) total_spent: Decimal,
    /// Cashback before the cap is applied.
    pub(crate) raw_cashback: Decimal,
    /// Cashback actually credited: raw, capped at the limit.
    pub(crate) effective_cashback: Decimal,
    pub(crate) has_limit: bool,
    pub(crate) monthly_limit: Option<Decimal>,
    /// Share of the cap used, 0 to 100. Always 0 without a cap.
    pub(crate) limit_used_percent: Decimal,
    pub(crate) remaining_limit: Option<Decimal>,
    pub(crate) is_limit_reached: bool,
    pub(crate) expense_count: usize,
}

pub(crate) fn category_cycle_stats(
    expenses: &[Expense],
    category: &Category,
    cycle: &BillingCycle,
) -> CategoryCycleStats {
    let mut total_spent = Decimal::ZERO;
    let mut raw = Decimal::ZERO;
    let mut expense_count = 0;

    for expense in expenses
        .iter()
        .filter(|e| e.category_id == category.id && cycle.contains(e.date))
    {
        total_spent = total_spent.saturating_add(expense.amount);
        raw = raw.saturating_add(raw_cashback(expense.amount, category.cashback_percent));
        expense_count += 1;
    }

    let limit = category.limit();
    CategoryCycleStats {
        total_spent,
        raw_cashback: raw,
        effective_cashback: limit.map_or(raw, |l| raw.min(l)),
        has_limit: category.has_limit(),
        monthly_limit: category.monthly_limit,
        limit_used_percent: limit.map_or(Decimal::ZERO, |l| used_percent(raw, l)),
        remaining_limit: limit.map(|l| l.saturating_sub(raw).max(Decimal::ZERO)),
        is_limit_reached: limit.is_some_and(|l| raw >= l),
        expense_count,
    }
}

/// `raw` as a share of `limit`, capped at 100. A ratio too large to
/// represent counts as a full cap.
fn used_percent(raw: Decimal, limit: Decimal) -> Decimal {
    raw.checked_div(limit)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED))
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategorySummary<'a> {
    pub(crate) category: &'a Category,
    pub(crate) stats: CategoryCycleStats,
}

/// Totals across every category for a single billing cycle.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OverallSummary<'a> {
    pub(crate) total_spent: Decimal,
    pub(crate) total_cashback: Decimal,
    pub(crate) total_potential_cashback: Decimal,
    pub(crate) lost_to_capping: Decimal,
    pub(crate) transaction_count: usize,
    pub(crate) category_stats: Vec<CategorySummary<'a>>,
    pub(crate) billing_cycle: BillingCycle,
}

/// Summarize the cycle containing `reference`.
///
/// Expenses whose category no longer exists are not counted.
pub(crate) fn overall_summary<'a>(
    expenses: &[Expense],
    categories: &'a [Category],
    cycle_start_day: u32,
    reference: NaiveDate,
) -> OverallSummary<'a> {
    let billing_cycle = resolve_cycle(cycle_start_day, reference);

    let category_stats: Vec<CategorySummary> = categories
        .iter()
        .map(|category| CategorySummary {
            category,
            stats: category_cycle_stats(expenses, category, &billing_cycle),
        })
        .collect();

    let total_spent = saturating_sum(category_stats.iter().map(|c| c.stats.total_spent));
    let total_cashback =
        saturating_sum(category_stats.iter().map(|c| c.stats.effective_cashback));
    let total_potential_cashback =
        saturating_sum(category_stats.iter().map(|c| c.stats.raw_cashback));
    let transaction_count: usize = category_stats.iter().map(|c| c.stats.expense_count).sum();

    OverallSummary {
        total_spent,
        total_cashback,
        total_potential_cashback,
        lost_to_capping: total_potential_cashback.saturating_sub(total_cashback),
        transaction_count,
        category_stats,
        billing_cycle,
    }
}

/// Narrows the all-time view. Every field is optional; an empty filter keeps
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct GroupFilter {
    pub(crate) cycle: Option<CycleKey>,
    /// Inclusive.
    pub(crate) from: Option<NaiveDate>,
    /// Inclusive.
    pub(crate) to: Option<NaiveDate>,
}

impl GroupFilter {
    pub(crate) fn cycle(cycle: CycleKey) -> Self {
        Self {
            cycle: Some(cycle),
            ..Self::default()
        }
    }

    fn matches(&self, item: &ExpenseCashback) -> bool {
        let date = item.expense.date;
        self.cycle.map_or(true, |c| c == item.cycle)
            && self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct GroupSummary {
    pub(crate) total_spent: Decimal,
    pub(crate) raw_cashback: Decimal,
    pub(crate) eligible_cashback: Decimal,
    pub(crate) lost_cashback: Decimal,
    pub(crate) expense_count: usize,
}

impl GroupSummary {
    fn add(&mut self, item: &ExpenseCashback) {
        self.total_spent = self.total_spent.saturating_add(item.expense.amount);
        self.raw_cashback = self.raw_cashback.saturating_add(item.cashback.raw);
        self.eligible_cashback = self.eligible_cashback.saturating_add(item.cashback.eligible);
        self.lost_cashback = self.lost_cashback.saturating_add(item.cashback.lost);
        self.expense_count += 1;
    }
}

/// The expenses of one billing cycle, newest first.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CycleGroup<'a> {
    pub(crate) key: CycleKey,
    pub(crate) cycle: BillingCycle,
    pub(crate) expenses: Vec<ExpenseCashback<'a>>,
    pub(crate) summary: GroupSummary,
}

/// Group every expense by billing cycle, newest cycle first.
///
/// Caps are apportioned over the full history before `filter` is applied, so
/// filtering never changes an expense's eligible or lost cashback. Cycles
/// left with no expenses after filtering are dropped.
pub(crate) fn all_time_grouped<'a>(
    expenses: &'a [Expense],
    categories: &'a [Category],
    cycle_start_day: u32,
    filter: &GroupFilter,
) -> Vec<CycleGroup<'a>> {
    let mut by_cycle: BTreeMap<CycleKey, Vec<ExpenseCashback<'a>>> = BTreeMap::new();
    for item in CapTracker::apportion(expenses, categories, cycle_start_day) {
        by_cycle.entry(item.cycle).or_default().push(item);
    }

    by_cycle
        .into_iter()
        .rev()
        .filter_map(|(key, items)| {
            // Apportioned items are oldest first; flip to newest first.
            let expenses: Vec<ExpenseCashback> =
                items.into_iter().rev().filter(|i| filter.matches(i)).collect();
            if expenses.is_empty() {
                return None;
            }
            let mut summary = GroupSummary::default();
            for item in &expenses {
                summary.add(item);
            }
            Some(CycleGroup {
                key,
                cycle: key.cycle(),
                expenses,
                summary,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
