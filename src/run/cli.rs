use anyhow::{Context, Result};
use std::path::Path;

use super::args::{
    flag, home_dir, parse_date, parse_decimal, parse_limit, positionals, shellexpand, switch,
};
use super::report;
use crate::cashback::{
    all_time_grouped, category_cycle_stats, current_cycle, overall_summary, today, CapTracker,
    CycleKey, GroupFilter,
};
use crate::db::Database;
use crate::error::Error;
use crate::format::{format_date, format_money};
use crate::models::{Category, CategoryUpdate, Expense, ExpenseUpdate, PALETTE};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_summary(&[], db);
    };
    let rest = &args[2..];
    match command.as_str() {
        "summary" | "s" => cli_summary(rest, db),
        "expenses" | "e" => cli_expenses(rest, db),
        "add-expense" | "add" => cli_add_expense(rest, db),
        "edit-expense" => cli_edit_expense(rest, db),
        "delete-expense" => cli_delete_expense(rest, db),
        "categories" | "c" => cli_categories(db),
        "add-category" => cli_add_category(rest, db),
        "edit-category" => cli_edit_category(rest, db),
        "delete-category" => cli_delete_category(rest, db),
        "settings" => cli_settings(rest, db),
        "export" => cli_export(rest, db),
        "import" => cli_import(rest, db),
        "export-csv" => cli_export_csv(rest, db),
        "reset" => cli_reset(rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("cashback {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Cashback — credit card cashback tracker");
    println!();
    println!("Usage: cashback [command]");
    println!();
    println!("Commands:");
    println!("  (none), summary               Summary of the current billing cycle");
    println!("    --date <YYYY-MM-DD>         Summarize the cycle containing this date");
    println!("  expenses                      Expenses of the current cycle with cashback");
    println!("    --all                       Every cycle, newest first");
    println!("    --cycle <\"JAN 26\">          One cycle");
    println!("    --from, --to <YYYY-MM-DD>   Date range (inclusive)");
    println!("  add-expense <category> <amount>");
    println!("    --date <YYYY-MM-DD>         Default: today");
    println!("    --note <text>");
    println!("  edit-expense <id>             --category, --amount, --date, --note");
    println!("  delete-expense <id>");
    println!("  categories                    List categories and this cycle's cashback");
    println!("  add-category <name> <percent> --limit <amount>, --color <#RRGGBB>");
    println!("  edit-category <id|name>       --name, --percent, --limit <amount|none>, --color");
    println!("  delete-category <id|name>     Also deletes its expenses");
    println!("  settings                      Show settings");
    println!("    --cycle-start <1-28>        Day of the month billing cycles start");
    println!("    --currency <symbol>");
    println!("  export [path]                 Back up all data to JSON");
    println!("  import <path>                 Restore a JSON backup");
    println!("  export-csv [path]             Write the cashback ledger as CSV");
    println!("  reset --yes                   Delete all data and restore defaults");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Views ─────────────────────────────────────────────────────

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let settings = db.get_settings()?;
    let categories = db.get_categories()?;
    let expenses = db.get_expenses()?;

    let reference = match flag(args, "--date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let summary = overall_summary(
        &expenses,
        &categories,
        settings.billing_cycle_start,
        reference,
    );
    tracing::debug!(
        "Summarizing {} expense(s) from {} to {}",
        summary.transaction_count,
        summary.billing_cycle.starts_at(),
        summary.billing_cycle.ends_at()
    );
    print!("{}", report::summary(&summary, &settings.currency));
    Ok(())
}

fn cli_expenses(args: &[String], db: &mut Database) -> Result<()> {
    let settings = db.get_settings()?;
    let categories = db.get_categories()?;
    let expenses = db.get_expenses()?;
    let start_day = settings.billing_cycle_start;

    let cycle = flag(args, "--cycle")
        .map(|label| CycleKey::parse(label, start_day))
        .transpose()?;
    let from = flag(args, "--from").map(parse_date).transpose()?;
    let to = flag(args, "--to").map(parse_date).transpose()?;

    let filter = if cycle.is_none() && from.is_none() && to.is_none() && !switch(args, "--all") {
        GroupFilter::cycle(current_cycle(start_day).key())
    } else {
        GroupFilter { cycle, from, to }
    };

    let groups = all_time_grouped(&expenses, &categories, start_day, &filter);
    print!("{}", report::ledger(&groups, &settings.currency));
    Ok(())
}

fn cli_categories(db: &mut Database) -> Result<()> {
    let settings = db.get_settings()?;
    let categories = db.get_categories()?;
    let expenses = db.get_expenses()?;
    let summary = overall_summary(
        &expenses,
        &categories,
        settings.billing_cycle_start,
        today(),
    );
    print!("{}", report::categories(&summary, &settings.currency));
    Ok(())
}

// ── Expenses ──────────────────────────────────────────────────

fn cli_add_expense(args: &[String], db: &mut Database) -> Result<()> {
    let positional = positionals(args);
    let [category, amount, ..] = positional[..] else {
        anyhow::bail!("Usage: cashback add-expense <category> <amount> [--date D] [--note TEXT]");
    };

    let categories = db.get_categories()?;
    let category = find_category(&categories, category)?;
    let amount = parse_decimal(amount)?;
    let date = match flag(args, "--date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let note = flag(args, "--note").unwrap_or_default().to_string();

    let expense = Expense::new(category.id.clone(), amount, date, note);
    db.insert_expense(&expense)?;

    let settings = db.get_settings()?;
    let expenses = db.get_expenses()?;
    let cashback = CapTracker::apportion(&expenses, &categories, settings.billing_cycle_start)
        .into_iter()
        .find(|item| item.expense.id == expense.id)
        .map(|item| item.cashback)
        .unwrap_or_default();

    let currency = &settings.currency;
    print!(
        "Added {} on {} to {}: +{} cashback",
        format_money(amount, currency),
        format_date(date),
        category.name,
        format_money(cashback.eligible, currency),
    );
    if !cashback.lost.is_zero() {
        print!(
            " ({} over the limit)",
            format_money(cashback.lost, currency)
        );
    }
    println!();
    println!("ID: {}", expense.id);
    Ok(())
}

fn cli_edit_expense(args: &[String], db: &mut Database) -> Result<()> {
    let Some(&id) = positionals(args).first() else {
        anyhow::bail!(
            "Usage: cashback edit-expense <id> [--category C] [--amount A] [--date D] [--note TEXT]"
        );
    };

    let category_id = match flag(args, "--category") {
        Some(c) => Some(find_category(&db.get_categories()?, c)?.id.clone()),
        None => None,
    };
    let update = ExpenseUpdate {
        category_id,
        amount: flag(args, "--amount").map(parse_decimal).transpose()?,
        date: flag(args, "--date").map(parse_date).transpose()?,
        note: flag(args, "--note").map(str::to_string),
    };
    if update.category_id.is_none()
        && update.amount.is_none()
        && update.date.is_none()
        && update.note.is_none()
    {
        anyhow::bail!("Nothing to change. Use --category, --amount, --date or --note");
    }

    let expense = db.update_expense(id, update)?;
    println!("Updated expense {}", expense.id);
    Ok(())
}

fn cli_delete_expense(args: &[String], db: &mut Database) -> Result<()> {
    let Some(&id) = positionals(args).first() else {
        anyhow::bail!("Usage: cashback delete-expense <id>");
    };
    let expense = db
        .get_expense(id)?
        .ok_or_else(|| Error::ExpenseNotFound(id.to_string()))?;
    db.delete_expense(id)?;
    let currency = db.get_settings()?.currency;
    println!(
        "Deleted {} expense from {}",
        format_money(expense.amount, &currency),
        format_date(expense.date)
    );
    Ok(())
}

// ── Categories ────────────────────────────────────────────────

fn find_category<'a>(categories: &'a [Category], id_or_name: &str) -> Result<&'a Category> {
    Category::find(categories, id_or_name)
        .ok_or_else(|| Error::CategoryNotFound(id_or_name.to_string()).into())
}

fn cli_add_category(args: &[String], db: &mut Database) -> Result<()> {
    let positional = positionals(args);
    let [name, percent, ..] = positional[..] else {
        anyhow::bail!(
            "Usage: cashback add-category <name> <percent> [--limit N] [--color #RRGGBB]"
        );
    };

    let categories = db.get_categories()?;
    if Category::find_by_name(&categories, name).is_some() {
        tracing::warn!("A category named '{name}' already exists");
    }
    let percent = parse_decimal(percent)?;
    let limit = flag(args, "--limit").map(parse_limit).transpose()?.flatten();
    let color = match flag(args, "--color") {
        Some(c) => c.to_string(),
        None => PALETTE[categories.len() % PALETTE.len()].to_string(),
    };

    let category = Category::new(name.trim().to_string(), percent, limit, color);
    db.insert_category(&category)?;
    println!("Added category {} ({})", category.name, category.id);
    Ok(())
}

fn cli_edit_category(args: &[String], db: &mut Database) -> Result<()> {
    let Some(&target) = positionals(args).first() else {
        anyhow::bail!(
            "Usage: cashback edit-category <id|name> [--name N] [--percent P] [--limit N|none] [--color C]"
        );
    };

    let id = find_category(&db.get_categories()?, target)?.id.clone();
    let update = CategoryUpdate {
        name: flag(args, "--name").map(|n| n.trim().to_string()),
        cashback_percent: flag(args, "--percent").map(parse_decimal).transpose()?,
        monthly_limit: flag(args, "--limit").map(parse_limit).transpose()?,
        color: flag(args, "--color").map(str::to_string),
    };
    if update.name.is_none()
        && update.cashback_percent.is_none()
        && update.monthly_limit.is_none()
        && update.color.is_none()
    {
        anyhow::bail!("Nothing to change. Use --name, --percent, --limit or --color");
    }

    let category = db.update_category(&id, update)?;
    println!("Updated category {} ({})", category.name, category.id);

    let settings = db.get_settings()?;
    let cycle = current_cycle(settings.billing_cycle_start);
    let stats = category_cycle_stats(&db.get_expenses()?, &category, &cycle);
    println!("  {}", report::category_line(&category, &stats, &settings.currency));
    Ok(())
}

fn cli_delete_category(args: &[String], db: &mut Database) -> Result<()> {
    let Some(&target) = positionals(args).first() else {
        anyhow::bail!("Usage: cashback delete-category <id|name>");
    };

    let category = find_category(&db.get_categories()?, target)?.clone();
    let removed = db.delete_category(&category.id)?;
    println!(
        "Deleted category {} and {removed} expense(s)",
        category.name
    );
    Ok(())
}

// ── Settings ──────────────────────────────────────────────────

fn cli_settings(args: &[String], db: &mut Database) -> Result<()> {
    let mut settings = db.get_settings()?;
    let cycle_start = flag(args, "--cycle-start");
    let currency = flag(args, "--currency");

    if cycle_start.is_some() || currency.is_some() {
        if let Some(day) = cycle_start {
            settings.billing_cycle_start = day
                .trim()
                .parse()
                .with_context(|| format!("Invalid day '{day}', expected a number from 1 to 28"))?;
        }
        if let Some(symbol) = currency {
            settings.currency = symbol.trim().to_string();
        }
        db.save_settings(&settings)?;
        println!("Settings saved");
    }
    print!("{}", report::settings(&settings));
    Ok(())
}

// ── Backup ────────────────────────────────────────────────────

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let output_path = output_path(args, "cashback-backup", "json");
    let json = db.export_all()?;
    std::fs::write(&output_path, json)
        .with_context(|| format!("Failed to write {output_path}"))?;
    println!("Exported backup to {output_path}");
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let Some(&file_path) = positionals(args).first() else {
        anyhow::bail!("Usage: cashback import <backup.json>");
    };
    let file_path = shellexpand(file_path);
    let path = Path::new(&file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_path}"))?;
    let report = db.import_all(&json)?;

    if let Some(n) = report.categories {
        println!("Restored {n} categories");
    }
    if let Some(n) = report.expenses {
        println!("Restored {n} expenses");
    }
    if report.settings {
        println!("Restored settings");
    }
    if report.categories.is_none() && report.expenses.is_none() && !report.settings {
        println!("Backup contained nothing to restore");
    }
    Ok(())
}

fn cli_export_csv(args: &[String], db: &mut Database) -> Result<()> {
    let output_path = output_path(args, "cashback-ledger", "csv");
    let settings = db.get_settings()?;
    let categories = db.get_categories()?;
    let expenses = db.get_expenses()?;

    let groups = all_time_grouped(
        &expenses,
        &categories,
        settings.billing_cycle_start,
        &GroupFilter::default(),
    );
    let count = crate::export::export_ledger(&groups, Path::new(&output_path))?;
    if count == 0 {
        println!("No expenses to export");
    } else {
        println!("Exported {count} expenses to {output_path}");
    }
    Ok(())
}

fn cli_reset(args: &[String], db: &mut Database) -> Result<()> {
    if !switch(args, "--yes") {
        anyhow::bail!("This deletes every expense and category. Run `cashback reset --yes` to confirm");
    }
    db.clear_all()?;
    println!("All data cleared. Default categories restored");
    Ok(())
}

/// The first positional argument, or `~/<stem>-<today>.<ext>`.
fn output_path(args: &[String], stem: &str, ext: &str) -> String {
    positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| format!("{}/{stem}-{}.{ext}", home_dir(), today().format("%Y-%m-%d")))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
