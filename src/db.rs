use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;

/// Connection options shared by the migration runner and the unit-of-work
/// factory. Foreign keys must be ON for the schema's cascade and set-null
/// behavior to apply.
pub fn connect_options(db_path: &Path) -> Result<SqliteConnectOptions> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    Ok(options)
}

pub async fn connect(config: &Config) -> Result<SqliteConnection> {
    let options = connect_options(&config.db.path)?;
    let conn = SqliteConnection::connect_with(&options).await?;
    Ok(conn)
}
