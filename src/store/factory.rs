//! Produces isolated, request-scoped units of work.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;

use crate::config::Config;
use crate::db;
use crate::store::UnitOfWork;

/// Creates a [`UnitOfWork`] bound to a fresh SQLite connection per call, so
/// concurrent requests never share a session. The factory itself is cheap
/// to share (`Arc`) across handlers.
#[derive(Debug, Clone)]
pub struct UnitOfWorkFactory {
    options: SqliteConnectOptions,
}

impl UnitOfWorkFactory {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(db::connect_options(&config.db.path)?))
    }

    /// Opens a new, independent session. The returned unit of work owns the
    /// connection; dropping it releases the session and rolls back anything
    /// not yet saved.
    pub async fn create(&self) -> Result<UnitOfWork> {
        let conn = SqliteConnection::connect_with(&self.options).await?;
        Ok(UnitOfWork::new(conn))
    }
}
