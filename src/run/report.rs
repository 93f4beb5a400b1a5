//! Plain-text views printed by the CLI.

use std::fmt::Write;

use crate::cashback::{CategoryCycleStats, CycleGroup, ExpenseCashback, OverallSummary};
use crate::format::{format_date, format_money, format_percent, format_window, truncate};
use crate::models::{Category, Settings};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// Totals and per-category standing for one billing cycle.
pub(crate) fn summary(summary: &OverallSummary, currency: &str) -> String {
    let cycle = &summary.billing_cycle;
    let money = |v| format_money(v, currency);
    let mut out = String::new();

    let _ = writeln!(out, "Cashback — {} ({})", cycle.key(), format_window(cycle));
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "  Spent:          {}", money(summary.total_spent));
    let _ = writeln!(out, "  Cashback:       {}", money(summary.total_cashback));
    let _ = writeln!(out, "  Potential:      {}", money(summary.total_potential_cashback));
    let _ = writeln!(out, "  Lost to caps:   {}", money(summary.lost_to_capping));
    let _ = writeln!(out, "  Transactions:   {}", summary.transaction_count);

    if !summary.category_stats.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "By category:");
        for entry in &summary.category_stats {
            let _ = writeln!(out, "  {}", category_line(entry.category, &entry.stats, currency));
        }
    }
    out
}

pub(crate) fn category_line(category: &Category, stats: &CategoryCycleStats, currency: &str) -> String {
    let mut line = format!(
        "{:<28} {:>6}  spent {:<14} earned {}",
        truncate(&category.name, 28),
        format_percent(category.cashback_percent),
        format_money(stats.total_spent, currency),
        format_money(stats.effective_cashback, currency),
    );
    if let Some(limit) = stats.monthly_limit.filter(|_| stats.has_limit) {
        let _ = write!(
            line,
            " of {} ({}%)",
            format_money(limit, currency),
            stats.limit_used_percent.round_dp(0)
        );
        if stats.is_limit_reached {
            line.push_str(" LIMIT REACHED");
        }
    }
    line
}

/// Every category with its rate, cap and standing in the current cycle.
pub(crate) fn categories(summary: &OverallSummary, currency: &str) -> String {
    let mut out = String::new();
    if summary.category_stats.is_empty() {
        let _ = writeln!(out, "No categories");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<36}  {:<28} {:>6}  {:<12} {:<12} Remaining",
        "ID", "Name", "Rate", "Limit", "Earned"
    );
    let _ = writeln!(out, "{}", "─".repeat(110));
    for entry in &summary.category_stats {
        let stats = &entry.stats;
        let limit = match stats.monthly_limit.filter(|_| stats.has_limit) {
            Some(limit) => format_money(limit, currency),
            None => "none".into(),
        };
        let remaining = match stats.remaining_limit {
            Some(remaining) => format_money(remaining, currency),
            None => "-".into(),
        };
        let _ = writeln!(
            out,
            "{:<36}  {:<28} {:>6}  {:<12} {:<12} {}",
            entry.category.id,
            truncate(&entry.category.name, 28),
            format_percent(entry.category.cashback_percent),
            limit,
            format_money(stats.effective_cashback, currency),
            remaining,
        );
    }
    out
}

/// Expenses grouped by cycle, newest first, with what each one earned.
pub(crate) fn ledger(groups: &[CycleGroup], currency: &str) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        let _ = writeln!(out, "No expenses");
        return out;
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out);
        }
        let s = &group.summary;
        let _ = writeln!(
            out,
            "{} ({}) • {} expense(s)",
            group.key,
            format_window(&group.cycle),
            s.expense_count
        );
        let _ = writeln!(
            out,
            "  Spent {}  Cashback {}  Lost {}",
            format_money(s.total_spent, currency),
            format_money(s.eligible_cashback, currency),
            format_money(s.lost_cashback, currency),
        );
        let _ = writeln!(out, "{}", rule());
        for item in &group.expenses {
            let _ = writeln!(out, "  {}", expense_line(item, currency));
        }
    }
    out
}

fn expense_line(item: &ExpenseCashback, currency: &str) -> String {
    let category = item.category.map_or("Unknown", |c| c.name.as_str());
    let mut line = format!(
        "{:<12} {:<22} {:>12}  +{}",
        format_date(item.expense.date),
        truncate(category, 22),
        format_money(item.expense.amount, currency),
        format_money(item.cashback.eligible, currency),
    );
    if !item.cashback.lost.is_zero() {
        let _ = write!(line, " (-{} limit)", format_money(item.cashback.lost, currency));
    }
    if !item.expense.note.is_empty() {
        let _ = write!(line, "  {}", truncate(&item.expense.note, 30));
    }
    let _ = write!(line, "  [{}]", item.expense.id);
    line
}

pub(crate) fn settings(settings: &Settings) -> String {
    format!(
        "Billing cycle starts on day {}\nCurrency: {}\n",
        settings.billing_cycle_start, settings.currency
    )
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
