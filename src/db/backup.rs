//! JSON backup of the whole store.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::schema::{CATEGORIES_KEY, EXPENSES_KEY, SETTINGS_KEY};
use super::{write_json, Database};
use crate::error::Error;
use crate::models::{Category, Expense, Settings};

/// The backup document. Every collection is optional on import; absent ones
/// are left untouched.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Backup {
    #[serde(default)]
    categories: Option<Vec<Category>>,
    #[serde(default)]
    expenses: Option<Vec<Expense>>,
    #[serde(default)]
    settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exported_at: Option<String>,
}

/// What an import replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ImportReport {
    pub(crate) categories: Option<usize>,
    pub(crate) expenses: Option<usize>,
    pub(crate) settings: bool,
}

impl Database {
    /// Serialize categories, expenses and settings as pretty-printed JSON.
    pub(crate) fn export_all(&self) -> Result<String> {
        let backup = Backup {
            categories: Some(self.get_categories()?),
            expenses: Some(self.get_expenses()?),
            settings: Some(self.get_settings()?),
            exported_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        Ok(serde_json::to_string_pretty(&backup)?)
    }

    /// Restore a backup produced by [Database::export_all].
    ///
    /// Each collection present in the payload replaces the stored one
    /// verbatim. The payload is fully parsed and checked before anything is
    /// written, and all writes happen in one transaction, so a bad payload
    /// leaves the store unchanged.
    pub(crate) fn import_all(&mut self, json: &str) -> Result<ImportReport> {
        let backup: Backup =
            serde_json::from_str(json).map_err(|e| Error::MalformedBackup(e.to_string()))?;
        if let Some(settings) = &backup.settings {
            settings.validate()?;
        }

        if let Some(expenses) = &backup.expenses {
            let categories = match &backup.categories {
                Some(categories) => categories.clone(),
                None => self.get_categories()?,
            };
            let orphans = expenses
                .iter()
                .filter(|e| Category::find_by_id(&categories, &e.category_id).is_none())
                .count();
            if orphans > 0 {
                tracing::warn!("Imported {orphans} expense(s) with an unknown category");
            }
        }

        let tx = self.conn.transaction()?;
        let mut report = ImportReport::default();
        if let Some(categories) = &backup.categories {
            write_json(&tx, CATEGORIES_KEY, categories)?;
            report.categories = Some(categories.len());
        }
        if let Some(expenses) = &backup.expenses {
            write_json(&tx, EXPENSES_KEY, expenses)?;
            report.expenses = Some(expenses.len());
        }
        if let Some(settings) = &backup.settings {
            write_json(&tx, SETTINGS_KEY, settings)?;
            report.settings = true;
        }
        tx.commit()?;

        tracing::info!("Imported backup: {report:?}");
        Ok(report)
    }
}
