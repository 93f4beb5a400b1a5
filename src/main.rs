mod cashback;
mod db;
mod error;
mod export;
mod format;
mod logging;
mod models;
mod run;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Overrides the database location, e.g. `CASHBACK_DB=/tmp/test.db`.
const DB_ENV: &str = "CASHBACK_DB";

fn main() -> Result<()> {
    logging::init();
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    let mut db = db::Database::open(&db_path)?;
    run::as_cli(&args, &mut db)
}

fn get_db_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let proj_dirs = directories::ProjectDirs::from("com", "cashback", "Cashback")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("cashback.db"))
}
