mod backup;
mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::Error;
use crate::models::*;

use schema::{CATEGORIES_KEY, EXPENSES_KEY, SETTINGS_KEY};

/// Local store for categories, expenses and settings.
///
/// Each collection is a JSON document in a key-value table, so reading one is
/// a single lookup and writing one replaces it whole.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let mut conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        migrate(&mut conn, schema::MIGRATIONS).context("Database migration failed")?;
        seed_defaults(&conn)?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migrate(&mut conn, schema::MIGRATIONS)?;
        seed_defaults(&conn)?;
        Ok(Self { conn })
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        Ok(read_json(&self.conn, CATEGORIES_KEY)?.unwrap_or_default())
    }

    pub(crate) fn get_category(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.get_categories()?.into_iter().find(|c| c.id == id))
    }

    pub(crate) fn insert_category(&self, category: &Category) -> Result<()> {
        category.validate()?;
        let mut categories = self.get_categories()?;
        categories.push(category.clone());
        write_json(&self.conn, CATEGORIES_KEY, &categories)?;
        tracing::info!("Added category {} ({})", category.name, category.id);
        Ok(())
    }

    pub(crate) fn update_category(&self, id: &str, update: CategoryUpdate) -> Result<Category> {
        let mut categories = self.get_categories()?;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))?;

        let mut updated = category.clone();
        updated.apply(update);
        updated.validate()?;
        *category = updated.clone();

        write_json(&self.conn, CATEGORIES_KEY, &categories)?;
        tracing::info!("Updated category {} ({id})", updated.name);
        Ok(updated)
    }

    /// Delete a category and every expense filed under it.
    ///
    /// Returns the number of expenses removed.
    pub(crate) fn delete_category(&mut self, id: &str) -> Result<usize> {
        let mut categories = self.get_categories()?;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(Error::CategoryNotFound(id.to_string()).into());
        }

        let mut expenses = self.get_expenses()?;
        let expense_count = expenses.len();
        expenses.retain(|e| e.category_id != id);
        let removed = expense_count - expenses.len();

        let tx = self.conn.transaction()?;
        write_json(&tx, CATEGORIES_KEY, &categories)?;
        write_json(&tx, EXPENSES_KEY, &expenses)?;
        tx.commit()?;

        tracing::info!("Deleted category {id} and {removed} expense(s)");
        Ok(removed)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn get_expenses(&self) -> Result<Vec<Expense>> {
        Ok(read_json(&self.conn, EXPENSES_KEY)?.unwrap_or_default())
    }

    pub(crate) fn get_expense(&self, id: &str) -> Result<Option<Expense>> {
        Ok(self.get_expenses()?.into_iter().find(|e| e.id == id))
    }

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<()> {
        expense.validate()?;
        self.ensure_category_exists(&expense.category_id)?;
        let mut expenses = self.get_expenses()?;
        expenses.push(expense.clone());
        write_json(&self.conn, EXPENSES_KEY, &expenses)?;
        tracing::info!("Added expense {} of {}", expense.id, expense.amount);
        Ok(())
    }

    pub(crate) fn update_expense(&self, id: &str, update: ExpenseUpdate) -> Result<Expense> {
        let mut expenses = self.get_expenses()?;
        let expense = expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::ExpenseNotFound(id.to_string()))?;

        let category_changed = update.category_id.is_some();
        let mut updated = expense.clone();
        updated.apply(update);
        updated.validate()?;
        if category_changed {
            self.ensure_category_exists(&updated.category_id)?;
        }
        *expense = updated.clone();

        write_json(&self.conn, EXPENSES_KEY, &expenses)?;
        tracing::info!("Updated expense {id}");
        Ok(updated)
    }

    pub(crate) fn delete_expense(&self, id: &str) -> Result<()> {
        let mut expenses = self.get_expenses()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != id);
        if expenses.len() == before {
            return Err(Error::ExpenseNotFound(id.to_string()).into());
        }
        write_json(&self.conn, EXPENSES_KEY, &expenses)?;
        tracing::info!("Deleted expense {id}");
        Ok(())
    }

    fn ensure_category_exists(&self, category_id: &str) -> Result<()> {
        if self.get_category(category_id)?.is_none() {
            return Err(Error::CategoryNotFound(category_id.to_string()).into());
        }
        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_settings(&self) -> Result<Settings> {
        Ok(read_json(&self.conn, SETTINGS_KEY)?.unwrap_or_default())
    }

    pub(crate) fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        write_json(&self.conn, SETTINGS_KEY, settings)?;
        tracing::info!(
            "Saved settings: cycle starts on day {}, currency {}",
            settings.billing_cycle_start,
            settings.currency
        );
        Ok(())
    }

    /// Remove every category, expense and setting, then restore the defaults.
    pub(crate) fn clear_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for key in [CATEGORIES_KEY, EXPENSES_KEY, SETTINGS_KEY] {
            remove_value(&tx, key)?;
        }
        seed_defaults(&tx)?;
        tx.commit()?;
        tracing::info!("Cleared all data");
        Ok(())
    }
}

/// The version recorded in `schema_version`, or `None` on a database that has
/// never been set up. A table with no row reads as version 0.
fn stored_version(conn: &Connection) -> Result<Option<i32>> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(None);
    }
    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .optional()?;
    Ok(Some(version.unwrap_or(0)))
}

/// Create the schema on a new database, or step an older one up to
/// [schema::CURRENT_VERSION].
///
/// `migrations` are `(from_version, sql)` pairs. Only steps starting at or
/// after the stored version run, and the version bump commits with them.
fn migrate(conn: &mut Connection, migrations: &[(i32, &str)]) -> Result<()> {
    let target = schema::CURRENT_VERSION;
    let Some(stored) = stored_version(conn)? else {
        conn.execute_batch(schema::SCHEMA_V1)?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![target],
        )?;
        tracing::info!("Created schema version {target}");
        return Ok(());
    };
    if stored >= target {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &(from, sql) in migrations.iter().filter(|(from, _)| (stored..target).contains(from)) {
        tracing::info!("Migrating schema from version {from}");
        tx.execute_batch(sql)
            .with_context(|| format!("Migration from schema version {from} failed"))?;
    }
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        params![target],
    )?;
    tx.commit()?;
    tracing::info!("Upgraded schema from version {stored} to {target}");
    Ok(())
}

/// Write the default categories and settings if they are missing.
fn seed_defaults(conn: &Connection) -> Result<()> {
    if get_value(conn, CATEGORIES_KEY)?.is_none() {
        tracing::debug!("Seeding default categories");
        write_json(conn, CATEGORIES_KEY, &default_categories())?;
    }
    if get_value(conn, SETTINGS_KEY)?.is_none() {
        write_json(conn, SETTINGS_KEY, &Settings::default())?;
    }
    Ok(())
}

// ── Key-value access ──────────────────────────────────────────

fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?)
}

fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
        params![key, value, chrono::Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn remove_value(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let Some(raw) = get_value(conn, key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("Stored value for '{key}' is not valid"))?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize '{key}'"))?;
    set_value(conn, key, &raw)?;
    tracing::debug!("Wrote {} bytes to '{key}'", raw.len());
    Ok(())
}
