use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::cashback::CycleGroup;

/// One line of the cashback ledger.
#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    cycle: String,
    date: NaiveDate,
    category: &'a str,
    amount: Decimal,
    raw: Decimal,
    eligible: Decimal,
    lost: Decimal,
    note: &'a str,
}

/// Write every expense in `groups` as CSV, in the order given.
///
/// Returns the number of rows written, not counting the header.
pub(crate) fn write_ledger<W: Write>(groups: &[CycleGroup], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut count = 0;
    for group in groups {
        let cycle = group.key.to_string();
        for item in &group.expenses {
            wtr.serialize(LedgerRow {
                cycle: cycle.clone(),
                date: item.expense.date,
                category: item.category.map_or("Unknown", |c| c.name.as_str()),
                amount: item.expense.amount,
                raw: item.cashback.raw,
                eligible: item.cashback.eligible,
                lost: item.cashback.lost,
                note: &item.expense.note,
            })
            .context("Failed to write CSV row")?;
            count += 1;
        }
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(count)
}

/// Write the ledger to a file, replacing it if it exists.
pub(crate) fn export_ledger(groups: &[CycleGroup], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_ledger(groups, file)?;
    tracing::info!("Wrote {count} ledger rows to {}", path.display());
    Ok(count)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
