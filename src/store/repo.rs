//! Generic CRUD + query surface over one entity type.

use anyhow::Result;
use sqlx::sqlite::SqliteQueryResult;
use sqlx::{FromRow, Row};
use std::marker::PhantomData;

use crate::store::uow::Session;
use crate::store::{bind_value, Entity, Filter, KeyedEntity, SqliteQuery};

/// Repository over one entity type, borrowed from its owning unit of work.
///
/// Stateless apart from the shared session, so re-acquiring the accessor
/// always yields the same repository semantically. Reads run directly
/// against the session; writes stage into the session's open transaction
/// and become durable on `save_changes`.
pub struct Repo<'a, E: Entity> {
    session: &'a mut Session,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Repo<'a, E> {
    pub(crate) fn new(session: &'a mut Session) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    /// Runs a staged write inside the session's transaction scope. On
    /// failure the whole staged batch is discarded before the error
    /// propagates.
    async fn exec_write(&mut self, query: SqliteQuery<'_>) -> Result<SqliteQueryResult> {
        self.session.enter_write().await?;
        match query.execute(&mut self.session.conn).await {
            Ok(result) => {
                self.session.staged_rows += result.rows_affected();
                Ok(result)
            }
            Err(err) => {
                self.session.abort_batch().await;
                Err(err.into())
            }
        }
    }

    /// Unordered, unfiltered full scan.
    pub async fn get_all(&mut self) -> Result<Vec<E>> {
        let sql = format!("SELECT * FROM {}", E::TABLE);
        let rows = sqlx::query(&sql).fetch_all(&mut self.session.conn).await?;
        rows.iter().map(|row| Ok(E::from_row(row)?)).collect()
    }

    /// Every entity satisfying the filter, evaluated by the store.
    pub async fn find(&mut self, filter: Filter) -> Result<Vec<E>> {
        let (clause, values) = filter.to_sql();
        let sql = format!("SELECT * FROM {}{}", E::TABLE, clause);
        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        let rows = query.fetch_all(&mut self.session.conn).await?;
        rows.iter().map(|row| Ok(E::from_row(row)?)).collect()
    }

    /// At most one match; which one is unspecified when several rows
    /// satisfy the filter.
    pub async fn first(&mut self, filter: Filter) -> Result<Option<E>> {
        let (clause, values) = filter.to_sql();
        let sql = format!("SELECT * FROM {}{} LIMIT 1", E::TABLE, clause);
        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        let row = query.fetch_optional(&mut self.session.conn).await?;
        row.as_ref().map(E::from_row).transpose().map_err(Into::into)
    }

    pub async fn count(&mut self, filter: Filter) -> Result<i64> {
        let (clause, values) = filter.to_sql();
        let sql = format!("SELECT COUNT(*) FROM {}{}", E::TABLE, clause);
        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        let row = query.fetch_one(&mut self.session.conn).await?;
        Ok(row.get(0))
    }

    /// Existence check. `EXISTS` lets SQLite stop at the first match
    /// instead of counting.
    pub async fn any(&mut self, filter: Filter) -> Result<bool> {
        let (clause, values) = filter.to_sql();
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {}{})", E::TABLE, clause);
        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        let row = query.fetch_one(&mut self.session.conn).await?;
        let exists: i64 = row.get(0);
        Ok(exists != 0)
    }

    /// Stages an insert and returns the entity with its generated key
    /// populated. Durable only after `save_changes`.
    pub async fn add(&mut self, mut entity: E) -> Result<E> {
        let placeholders = vec!["?"; E::INSERT_COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            E::INSERT_COLUMNS.join(", "),
            placeholders
        );
        let query = entity.bind_insert(sqlx::query(&sql));
        let result = self.exec_write(query).await?;
        entity.set_generated_key(result.last_insert_rowid());
        Ok(entity)
    }

    pub async fn add_range(&mut self, entities: Vec<E>) -> Result<Vec<E>> {
        let mut inserted = Vec::with_capacity(entities.len());
        for entity in entities {
            inserted.push(self.add(entity).await?);
        }
        Ok(inserted)
    }

    /// Stages removal of the given row, identified by its key.
    pub async fn delete(&mut self, entity: &E) -> Result<()> {
        let filter = entity.key_filter();
        let (clause, values) = filter.to_sql();
        let sql = format!("DELETE FROM {}{}", E::TABLE, clause);
        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        self.exec_write(query).await?;
        Ok(())
    }

    pub async fn delete_range(&mut self, entities: &[E]) -> Result<()> {
        for entity in entities {
            self.delete(entity).await?;
        }
        Ok(())
    }
}

impl<'a, E: KeyedEntity> Repo<'a, E> {
    /// Exact single-key lookup; `None` when no row matches.
    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<E>> {
        self.first(Filter::new().eq(E::ID_COLUMN, id)).await
    }

    /// Stages a full-row update of the already-keyed entity. No
    /// partial-field diffing happens here; callers decide what the row
    /// should contain.
    pub async fn update(&mut self, entity: &E) -> Result<()> {
        let assignments = E::INSERT_COLUMNS
            .iter()
            .map(|col| format!("{} = ?", col))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            E::TABLE,
            assignments,
            E::ID_COLUMN
        );
        let query = entity.bind_insert(sqlx::query(&sql)).bind(entity.id());
        self.exec_write(query).await?;
        Ok(())
    }

    pub async fn update_range(&mut self, entities: &[E]) -> Result<()> {
        for entity in entities {
            self.update(entity).await?;
        }
        Ok(())
    }
}
