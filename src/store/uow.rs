//! Unit of work: one database session, one repository per entity type,
//! explicit transaction boundaries.

use anyhow::Result;
use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;

use crate::models::{
    Comic, ComicCreator, ComicSource, ComicTag, Creator, DownloadSource, Engine, EngineHistory,
    OverlayBox, Page, Source, Tag, TagGroup, TextStyle,
};
use crate::store::repo::Repo;
use crate::store::Entity;

/// Transaction state of the session.
///
/// Staged writes always run inside some open transaction so that nothing
/// is durable before `save_changes`: either an implicit one opened on the
/// first write of a batch, or an explicit one the caller opened, in which
/// case each batch runs under a savepoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TxnState {
    None,
    Implicit,
    Explicit { batch_open: bool },
}

const BATCH_SAVEPOINT: &str = "staged_batch";

/// The shared database session behind every repository of one unit of work.
pub(crate) struct Session {
    pub(crate) conn: SqliteConnection,
    pub(crate) txn: TxnState,
    /// Rows affected by writes staged since the last `save_changes`.
    pub(crate) staged_rows: u64,
}

impl Session {
    /// Opens the transaction scope a staged write runs under, if one is not
    /// already open.
    pub(crate) async fn enter_write(&mut self) -> Result<()> {
        match self.txn {
            TxnState::None => {
                sqlx::query("BEGIN IMMEDIATE").execute(&mut self.conn).await?;
                self.txn = TxnState::Implicit;
            }
            TxnState::Explicit { batch_open: false } => {
                sqlx::query(&format!("SAVEPOINT {}", BATCH_SAVEPOINT))
                    .execute(&mut self.conn)
                    .await?;
                self.txn = TxnState::Explicit { batch_open: true };
            }
            TxnState::Implicit | TxnState::Explicit { batch_open: true } => {}
        }
        Ok(())
    }

    /// Discards the current staged batch after a failed write, so a later
    /// `save_changes` cannot commit a partial batch. Best effort: the
    /// original write error is what propagates to the caller.
    pub(crate) async fn abort_batch(&mut self) {
        match self.txn {
            TxnState::Implicit => {
                let _ = sqlx::query("ROLLBACK").execute(&mut self.conn).await;
                self.txn = TxnState::None;
            }
            TxnState::Explicit { batch_open: true } => {
                let _ = sqlx::query(&format!("ROLLBACK TO {}", BATCH_SAVEPOINT))
                    .execute(&mut self.conn)
                    .await;
                let _ = sqlx::query(&format!("RELEASE {}", BATCH_SAVEPOINT))
                    .execute(&mut self.conn)
                    .await;
                self.txn = TxnState::Explicit { batch_open: false };
            }
            _ => {}
        }
        self.staged_rows = 0;
    }
}

/// A request-scoped grouping of repositories over one SQLite connection.
///
/// All repositories obtained from one unit of work share the session, so
/// writes staged across entity types commit together on
/// [`save_changes`](UnitOfWork::save_changes). Dropping the unit of work
/// without saving rolls every staged write back: SQLite discards an open
/// transaction when its connection closes.
///
/// Not shareable across concurrent callers; create one per request via
/// [`UnitOfWorkFactory`](crate::store::UnitOfWorkFactory).
pub struct UnitOfWork {
    session: Session,
}

impl UnitOfWork {
    pub(crate) fn new(conn: SqliteConnection) -> Self {
        Self {
            session: Session {
                conn,
                txn: TxnState::None,
                staged_rows: 0,
            },
        }
    }

    /// Repository over an arbitrary entity type. The named accessors below
    /// cover the catalog schema; this is the seam they all go through.
    pub fn repo<E: Entity>(&mut self) -> Repo<'_, E> {
        Repo::new(&mut self.session)
    }

    pub fn comics(&mut self) -> Repo<'_, Comic> {
        self.repo()
    }

    pub fn pages(&mut self) -> Repo<'_, Page> {
        self.repo()
    }

    pub fn overlay_boxes(&mut self) -> Repo<'_, OverlayBox> {
        self.repo()
    }

    pub fn tags(&mut self) -> Repo<'_, Tag> {
        self.repo()
    }

    pub fn tag_groups(&mut self) -> Repo<'_, TagGroup> {
        self.repo()
    }

    pub fn creators(&mut self) -> Repo<'_, Creator> {
        self.repo()
    }

    pub fn sources(&mut self) -> Repo<'_, Source> {
        self.repo()
    }

    pub fn comic_tags(&mut self) -> Repo<'_, ComicTag> {
        self.repo()
    }

    pub fn comic_creators(&mut self) -> Repo<'_, ComicCreator> {
        self.repo()
    }

    pub fn comic_sources(&mut self) -> Repo<'_, ComicSource> {
        self.repo()
    }

    pub fn text_styles(&mut self) -> Repo<'_, TextStyle> {
        self.repo()
    }

    pub fn engines(&mut self) -> Repo<'_, Engine> {
        self.repo()
    }

    pub fn engine_histories(&mut self) -> Repo<'_, EngineHistory> {
        self.repo()
    }

    pub fn download_sources(&mut self) -> Repo<'_, DownloadSource> {
        self.repo()
    }

    /// Makes all staged writes durable atomically and returns the number of
    /// rows they affected. A no-op returning 0 when nothing is staged.
    ///
    /// Write faults (constraint violations included) are reported by the
    /// staging call itself, which also discards the batch; this method does
    /// not re-raise them, so after a failed write it returns `Ok(0)`.
    ///
    /// Inside an explicit transaction this releases the current batch
    /// savepoint; durability is then deferred to
    /// [`commit_transaction`](Self::commit_transaction).
    pub async fn save_changes(&mut self) -> Result<u64> {
        match self.session.txn {
            TxnState::Implicit => {
                sqlx::query("COMMIT").execute(&mut self.session.conn).await?;
                self.session.txn = TxnState::None;
            }
            TxnState::Explicit { batch_open: true } => {
                sqlx::query(&format!("RELEASE {}", BATCH_SAVEPOINT))
                    .execute(&mut self.session.conn)
                    .await?;
                self.session.txn = TxnState::Explicit { batch_open: false };
            }
            TxnState::None | TxnState::Explicit { batch_open: false } => {}
        }

        let affected = self.session.staged_rows;
        self.session.staged_rows = 0;
        Ok(affected)
    }

    /// Opens an explicit transaction spanning multiple `save_changes`
    /// calls. If writes are already staged, they join the explicit scope.
    /// A no-op when one is already open.
    pub async fn begin_transaction(&mut self) -> Result<()> {
        match self.session.txn {
            TxnState::None => {
                sqlx::query("BEGIN IMMEDIATE")
                    .execute(&mut self.session.conn)
                    .await?;
                self.session.txn = TxnState::Explicit { batch_open: false };
            }
            TxnState::Implicit => {
                sqlx::query(&format!("SAVEPOINT {}", BATCH_SAVEPOINT))
                    .execute(&mut self.session.conn)
                    .await?;
                self.session.txn = TxnState::Explicit { batch_open: true };
            }
            TxnState::Explicit { .. } => {}
        }
        Ok(())
    }

    /// Commits the explicit transaction, making every batch saved inside it
    /// durable. A no-op when no explicit transaction is open.
    pub async fn commit_transaction(&mut self) -> Result<()> {
        if let TxnState::Explicit { .. } = self.session.txn {
            sqlx::query("COMMIT").execute(&mut self.session.conn).await?;
            self.session.txn = TxnState::None;
            self.session.staged_rows = 0;
        }
        Ok(())
    }

    /// Rolls the explicit transaction back, discarding every batch saved
    /// inside it. A no-op when no explicit transaction is open.
    pub async fn rollback_transaction(&mut self) -> Result<()> {
        if let TxnState::Explicit { .. } = self.session.txn {
            sqlx::query("ROLLBACK")
                .execute(&mut self.session.conn)
                .await?;
            self.session.txn = TxnState::None;
            self.session.staged_rows = 0;
        }
        Ok(())
    }

    /// Gracefully tears the session down, rolling back anything uncommitted.
    /// Dropping the unit of work has the same effect; this variant surfaces
    /// close errors instead of swallowing them.
    pub async fn close(mut self) -> Result<()> {
        if self.session.txn != TxnState::None {
            let _ = sqlx::query("ROLLBACK")
                .execute(&mut self.session.conn)
                .await;
        }
        self.session.conn.close().await?;
        Ok(())
    }
}
