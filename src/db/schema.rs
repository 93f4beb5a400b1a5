pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS kv_store (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Upgrade steps for databases written by older releases, oldest first.
/// Empty while version 1 is the only layout that has shipped.
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

/// Keys the collections are stored under.
pub(crate) const CATEGORIES_KEY: &str = "cc_cashback_categories";
pub(crate) const EXPENSES_KEY: &str = "cc_cashback_expenses";
pub(crate) const SETTINGS_KEY: &str = "cc_cashback_settings";
