//! Store gateway - the boundary to the hosted relational store.
//!
//! The gateway exposes a minimal query capability (select/filter/order,
//! insert, update, count) and a uniform error shape. Rows travel as JSON
//! objects; the services own the translation into domain types.
//!
//! Store errors are classified ONCE here into [`StoreErrorKind`] - services
//! branch on the kind and never inspect the underlying message text.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::{PgStore, create_pool};

/// A row as returned by the store: a JSON object keyed by column name.
pub type Row = JsonValue;

/// A record or patch sent to the store: column name to JSON value.
pub type Record = JsonMap<String, JsonValue>;

/// The closed set of tables this layer talks to.
///
/// Table names are never caller-supplied strings, which keeps dynamic SQL
/// injection-proof by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Brands,
    Components,
    Customers,
    Orders,
    OrderItems,
    Products,
    Profiles,
    Discounts,
}

impl Table {
    /// The table's name in the store schema.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brands => "brands",
            Self::Components => "components",
            Self::Customers => "customers",
            Self::Orders => "orders",
            Self::OrderItems => "order_items",
            Self::Products => "products",
            Self::Profiles => "profiles",
            Self::Discounts => "discounts",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed scalar used in equality predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Uuid(Uuid),
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Uuid> for ScalarValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// A predicate over rows of a single table.
///
/// Column names are `&'static str` supplied by the services; they are
/// validated as plain identifiers before reaching SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every row.
    All,
    /// Column equals the given scalar.
    Eq(&'static str, ScalarValue),
    /// Case-insensitive substring match on a text column.
    Contains(&'static str, String),
    /// Timestamp column is at or after the given instant.
    After(&'static str, DateTime<Utc>),
    /// Every sub-filter matches. An empty conjunction matches everything.
    And(Vec<Filter>),
    /// At least one sub-filter matches. An empty disjunction matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    /// Convenience constructor for `id = <uuid> AND active = true`, the
    /// visibility rule shared by every soft-deleting entity family.
    #[must_use]
    pub fn active_by_id(id: Uuid) -> Self {
        Self::And(vec![
            Self::Eq("id", ScalarValue::Uuid(id)),
            Self::Eq("active", ScalarValue::Bool(true)),
        ])
    }

    /// Convenience constructor for `active = true`.
    #[must_use]
    pub fn active() -> Self {
        Self::Eq("active", ScalarValue::Bool(true))
    }
}

/// A stable ordering applied to a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub column: &'static str,
    pub ascending: bool,
}

impl Ordering {
    /// Ascending order on the given column.
    #[must_use]
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    /// Descending order on the given column.
    #[must_use]
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }
}

/// Classification of a store failure, assigned at the gateway boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The store's own policy (e.g., row-level security) rejected the call.
    PermissionDenied,
    /// A uniqueness constraint rejected the write.
    Conflict,
    /// A check constraint rejected the write's values.
    Invalid,
    /// No row matched a single-row operation.
    NotFound,
    /// Connection, pool, or timeout failure; safe to retry.
    Transport,
    /// Anything else, passed through opaquely.
    Other,
}

/// A failure returned by a store gateway.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    /// Create a store error with the given kind.
    #[must_use]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for an [`StoreErrorKind::Other`] error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }
}

/// The minimal query capability this layer requires from the hosted store.
///
/// All operations are single round-trips. The gateway performs no implicit
/// joins; composed fetches are issued explicitly by the entity services.
/// There is no retry and no cancellation here - a transport-level timeout
/// belongs to the pool configuration, not to this contract.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Fetch all rows matching `filter`, optionally ordered.
    async fn select(
        &self,
        table: Table,
        filter: &Filter,
        order: Option<Ordering>,
    ) -> Result<Vec<Row>, StoreError>;

    /// Fetch at most one row matching `filter`.
    async fn select_one(&self, table: Table, filter: &Filter)
    -> Result<Option<Row>, StoreError>;

    /// Insert a record and return the stored row, including store-assigned
    /// identifier and timestamps.
    async fn insert(&self, table: Table, record: Record) -> Result<Row, StoreError>;

    /// Apply a partial patch to the rows matching `filter` and return the
    /// updated row. Fails with [`StoreErrorKind::NotFound`] when nothing
    /// matched.
    async fn update(
        &self,
        table: Table,
        filter: &Filter,
        patch: Record,
    ) -> Result<Row, StoreError>;

    /// Count the rows matching `filter`.
    async fn count(&self, table: Table, filter: &Filter) -> Result<i64, StoreError>;
}
