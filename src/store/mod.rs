//! Generic repository + unit-of-work data-access layer.
//!
//! Every HTTP handler acquires one [`UnitOfWork`] from the
//! [`UnitOfWorkFactory`] per request, issues repository calls against it,
//! and calls [`UnitOfWork::save_changes`] once to make all staged writes
//! durable together. Units of work own a dedicated SQLite connection and
//! must never be shared across requests.
//!
//! | Piece | Purpose |
//! |-------|---------|
//! | [`Entity`] / [`KeyedEntity`] | Per-table mapping metadata |
//! | [`Filter`] | Structured predicate pushed down as a SQL `WHERE` clause |
//! | [`Repo`] | CRUD + query surface over one entity type |
//! | [`UnitOfWork`] | One session, one repository per type, transactional save |
//! | [`UnitOfWorkFactory`] | Fresh isolated session per logical operation |

pub mod entities;
pub mod factory;
pub mod repo;
pub mod uow;

pub use factory::UnitOfWorkFactory;
pub use repo::Repo;
pub use uow::UnitOfWork;

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::Sqlite;

/// Positional query with SQLite arguments, shorthand for trait signatures.
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// A literal bound into a [`Filter`] clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

#[derive(Debug, Clone)]
enum Cond {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
    IsNull(&'static str),
    IsNotNull(&'static str),
}

/// Structured predicate over entity columns, compiled to a parameterized
/// `WHERE` clause and evaluated by SQLite. Conditions are ANDed.
///
/// This is the pushdown contract from the design notes: callers express
/// conditions as data instead of closures, so filtering never happens
/// in-process.
///
/// ```
/// use qrganize::store::Filter;
///
/// let f = Filter::new().eq("comic_id", 5).eq("tag_id", 3);
/// let (clause, values) = f.to_sql();
/// assert_eq!(clause, " WHERE comic_id = ? AND tag_id = ?");
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conds: Vec<Cond>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conds.push(Cond::Eq(column, value.into()));
        self
    }

    /// Membership test, `column IN (..)`. An empty list matches nothing.
    pub fn is_in(mut self, column: &'static str, values: Vec<Value>) -> Self {
        self.conds.push(Cond::In(column, values));
        self
    }

    pub fn in_ids(self, column: &'static str, ids: &[i64]) -> Self {
        self.is_in(column, ids.iter().map(|id| Value::Int(*id)).collect())
    }

    pub fn is_null(mut self, column: &'static str) -> Self {
        self.conds.push(Cond::IsNull(column));
        self
    }

    pub fn is_not_null(mut self, column: &'static str) -> Self {
        self.conds.push(Cond::IsNotNull(column));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conds.is_empty()
    }

    /// Renders the clause (with a leading ` WHERE ` when non-empty) and the
    /// values to bind, in placeholder order.
    pub fn to_sql(&self) -> (String, Vec<&Value>) {
        if self.conds.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut fragments = Vec::with_capacity(self.conds.len());
        let mut values = Vec::new();

        for cond in &self.conds {
            match cond {
                Cond::Eq(col, v) => {
                    fragments.push(format!("{} = ?", col));
                    values.push(v);
                }
                Cond::In(col, vs) => {
                    if vs.is_empty() {
                        // IN () is a syntax error; an empty list matches no rows.
                        fragments.push("1 = 0".to_string());
                    } else {
                        let placeholders = vec!["?"; vs.len()].join(", ");
                        fragments.push(format!("{} IN ({})", col, placeholders));
                        values.extend(vs.iter());
                    }
                }
                Cond::IsNull(col) => fragments.push(format!("{} IS NULL", col)),
                Cond::IsNotNull(col) => fragments.push(format!("{} IS NOT NULL", col)),
            }
        }

        (format!(" WHERE {}", fragments.join(" AND ")), values)
    }
}

/// Binds one filter value into a positional query.
pub(crate) fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q Value) -> SqliteQuery<'q> {
    match value {
        Value::Int(v) => query.bind(*v),
        Value::Real(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.as_str()),
        Value::Bool(v) => query.bind(*v),
    }
}

/// Mapping metadata connecting one record type to its table.
///
/// Implementations live in [`entities`]; one per table. The trait stays
/// storage-shaped (column lists plus bind order) so [`Repo`] can build every
/// statement generically.
pub trait Entity: Sized + Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow> {
    const TABLE: &'static str;
    /// Columns written on insert, excluding any store-generated key.
    const INSERT_COLUMNS: &'static [&'static str];

    /// Binds the insert values in `INSERT_COLUMNS` order.
    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    /// Predicate identifying exactly this row (primary-key match). For
    /// join rows this is the composite key.
    fn key_filter(&self) -> Filter;

    /// Receives the generated rowid after a successful insert. Composite-key
    /// join rows carry their full key already and ignore it.
    fn set_generated_key(&mut self, _id: i64) {}
}

/// An entity with a single store-generated integer key.
pub trait KeyedEntity: Entity {
    const ID_COLUMN: &'static str;

    fn id(&self) -> i64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_renders_nothing() {
        let f = Filter::new();
        let (clause, values) = f.to_sql();
        assert_eq!(clause, "");
        assert!(values.is_empty());
    }

    #[test]
    fn conditions_are_anded_in_order() {
        let f = Filter::new()
            .eq("comic_id", 7)
            .is_null("group_id")
            .eq("name", "cover");
        let (clause, values) = f.to_sql();
        assert_eq!(
            clause,
            " WHERE comic_id = ? AND group_id IS NULL AND name = ?"
        );
        assert_eq!(values, vec![&Value::Int(7), &Value::Text("cover".into())]);
    }

    #[test]
    fn in_list_expands_placeholders() {
        let f = Filter::new().in_ids("tag_id", &[1, 2, 3]);
        let (clause, values) = f.to_sql();
        assert_eq!(clause, " WHERE tag_id IN (?, ?, ?)");
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn empty_in_list_matches_no_rows() {
        let f = Filter::new().in_ids("tag_id", &[]);
        let (clause, values) = f.to_sql();
        assert_eq!(clause, " WHERE 1 = 0");
        assert!(values.is_empty());
    }
}
