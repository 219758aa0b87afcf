//! Postgres-backed store gateway.
//!
//! Queries are built dynamically (the gateway is generic over tables and
//! predicates) with bound parameters only - no value is ever interpolated
//! into SQL text. Rows come back as `to_jsonb(t.*)` so the gateway has a
//! single result shape regardless of table.
//!
//! This is also where raw `sqlx` errors are classified into
//! [`StoreErrorKind`], once, so services never pattern-match on error
//! message text.

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use async_trait::async_trait;

use crate::config::PoolConfig;

use super::{
    Filter, Ordering, Record, Row, ScalarValue, StoreError, StoreErrorKind, StoreGateway, Table,
};

/// Create a `PostgreSQL` connection pool sized per [`PoolConfig`].
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    config: &PoolConfig,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url.expose_secret())
        .await
}

/// Store gateway over a `PostgreSQL` pool.
///
/// The pool is process-wide and read-only with respect to configuration;
/// the store serializes its own writes, so no locking happens here.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new gateway over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for migrations and health checks.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Attach every [`BindValue`] to a query builder in order.
///
/// A macro rather than a function so the builder's type stays inferred.
macro_rules! bind_all {
    ($query:expr, $binds:expr) => {
        $binds.into_iter().fold($query, |query, value| match value {
            BindValue::Text(v) => query.bind(v),
            BindValue::Bool(v) => query.bind(v),
            BindValue::Int(v) => query.bind(v),
            BindValue::Uuid(v) => query.bind(v),
            BindValue::Timestamp(v) => query.bind(v),
            BindValue::Json(v) => query.bind(v),
        })
    };
}

#[async_trait]
impl StoreGateway for PgStore {
    async fn select(
        &self,
        table: Table,
        filter: &Filter,
        order: Option<Ordering>,
    ) -> Result<Vec<Row>, StoreError> {
        let (sql, binds) = build_select_sql(table, filter, order, false)?;
        let query = bind_all!(sqlx::query_scalar::<_, JsonValue>(&sql), binds);
        query.fetch_all(&self.pool).await.map_err(classify)
    }

    async fn select_one(
        &self,
        table: Table,
        filter: &Filter,
    ) -> Result<Option<Row>, StoreError> {
        let (sql, binds) = build_select_sql(table, filter, None, true)?;
        let query = bind_all!(sqlx::query_scalar::<_, JsonValue>(&sql), binds);
        query.fetch_optional(&self.pool).await.map_err(classify)
    }

    async fn insert(&self, table: Table, record: Record) -> Result<Row, StoreError> {
        let (sql, binds) = build_insert_sql(table, record)?;
        let query = bind_all!(sqlx::query_scalar::<_, JsonValue>(&sql), binds);
        query.fetch_one(&self.pool).await.map_err(classify)
    }

    async fn update(
        &self,
        table: Table,
        filter: &Filter,
        patch: Record,
    ) -> Result<Row, StoreError> {
        let (sql, binds) = build_update_sql(table, filter, patch)?;
        let query = bind_all!(sqlx::query_scalar::<_, JsonValue>(&sql), binds);
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound, "no matching row"))
    }

    async fn count(&self, table: Table, filter: &Filter) -> Result<i64, StoreError> {
        let (sql, binds) = build_count_sql(table, filter)?;
        let query = bind_all!(sqlx::query_scalar::<_, i64>(&sql), binds);
        query.fetch_one(&self.pool).await.map_err(classify)
    }
}

// =============================================================================
// SQL construction
// =============================================================================

/// A value waiting to be bound to a prepared statement.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(JsonValue),
}

impl From<ScalarValue> for BindValue {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Text(v) => Self::Text(v),
            ScalarValue::Bool(v) => Self::Bool(v),
            ScalarValue::Int(v) => Self::Int(v),
            ScalarValue::Uuid(v) => Self::Uuid(v),
        }
    }
}


/// Whether `s` is a plain lowercase SQL identifier.
///
/// Column names come from this crate's services, but record keys pass
/// through caller-built patches, so everything is checked before it is
/// quoted into SQL.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn checked_identifier(s: &str) -> Result<&str, StoreError> {
    if is_identifier(s) {
        Ok(s)
    } else {
        Err(StoreError::other(format!("invalid column name: {s:?}")))
    }
}

/// Escape LIKE wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn render_filter(
    filter: &Filter,
    sql: &mut String,
    binds: &mut Vec<BindValue>,
) -> Result<(), StoreError> {
    match filter {
        Filter::All => sql.push_str("TRUE"),
        Filter::Eq(column, value) => {
            let column = checked_identifier(column)?;
            binds.push(value.clone().into());
            sql.push_str(&format!("t.\"{column}\" = ${}", binds.len()));
        }
        Filter::Contains(column, term) => {
            let column = checked_identifier(column)?;
            binds.push(BindValue::Text(format!("%{}%", escape_like(term))));
            sql.push_str(&format!("t.\"{column}\" ILIKE ${}", binds.len()));
        }
        Filter::After(column, instant) => {
            let column = checked_identifier(column)?;
            binds.push(BindValue::Timestamp(*instant));
            sql.push_str(&format!("t.\"{column}\" >= ${}", binds.len()));
        }
        Filter::And(filters) => {
            if filters.is_empty() {
                sql.push_str("TRUE");
            } else {
                render_group(filters, " AND ", sql, binds)?;
            }
        }
        Filter::Or(filters) => {
            if filters.is_empty() {
                sql.push_str("FALSE");
            } else {
                render_group(filters, " OR ", sql, binds)?;
            }
        }
    }
    Ok(())
}

fn render_group(
    filters: &[Filter],
    separator: &str,
    sql: &mut String,
    binds: &mut Vec<BindValue>,
) -> Result<(), StoreError> {
    sql.push('(');
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            sql.push_str(separator);
        }
        render_filter(filter, sql, binds)?;
    }
    sql.push(')');
    Ok(())
}

fn build_select_sql(
    table: Table,
    filter: &Filter,
    order: Option<Ordering>,
    single: bool,
) -> Result<(String, Vec<BindValue>), StoreError> {
    let mut binds = Vec::new();
    let mut sql = format!("SELECT to_jsonb(t.*) FROM \"{}\" AS t WHERE ", table.as_str());
    render_filter(filter, &mut sql, &mut binds)?;
    if let Some(order) = order {
        let column = checked_identifier(order.column)?;
        let direction = if order.ascending { "ASC" } else { "DESC" };
        sql.push_str(&format!(" ORDER BY t.\"{column}\" {direction}"));
    }
    if single {
        sql.push_str(" LIMIT 1");
    }
    Ok((sql, binds))
}

fn build_count_sql(table: Table, filter: &Filter) -> Result<(String, Vec<BindValue>), StoreError> {
    let mut binds = Vec::new();
    let mut sql = format!("SELECT COUNT(*) FROM \"{}\" AS t WHERE ", table.as_str());
    render_filter(filter, &mut sql, &mut binds)?;
    Ok((sql, binds))
}

/// Insert only the supplied columns so store defaults (id, timestamps)
/// apply to everything omitted. `jsonb_populate_record` does the casting
/// from JSON to each column's type.
fn build_insert_sql(table: Table, record: Record) -> Result<(String, Vec<BindValue>), StoreError> {
    if record.is_empty() {
        return Err(StoreError::other("refusing to insert an empty record"));
    }
    let mut columns = Vec::with_capacity(record.len());
    for key in record.keys() {
        columns.push(format!("\"{}\"", checked_identifier(key)?));
    }
    let projected: Vec<String> = columns.iter().map(|c| format!("p.{c}")).collect();
    let table = table.as_str();
    let sql = format!(
        "INSERT INTO \"{table}\" ({}) SELECT {} FROM jsonb_populate_record(NULL::\"{table}\", $1) AS p RETURNING to_jsonb(\"{table}\".*)",
        columns.join(", "),
        projected.join(", "),
    );
    Ok((sql, vec![BindValue::Json(JsonValue::Object(record))]))
}

fn build_update_sql(
    table: Table,
    filter: &Filter,
    patch: Record,
) -> Result<(String, Vec<BindValue>), StoreError> {
    if patch.is_empty() {
        return Err(StoreError::other("refusing to apply an empty patch"));
    }
    let mut assignments = Vec::with_capacity(patch.len());
    for key in patch.keys() {
        let column = checked_identifier(key)?;
        assignments.push(format!("\"{column}\" = p.\"{column}\""));
    }
    let mut binds = vec![BindValue::Json(JsonValue::Object(patch))];
    let table = table.as_str();
    let mut sql = format!(
        "UPDATE \"{table}\" AS t SET {} FROM jsonb_populate_record(NULL::\"{table}\", $1) AS p WHERE ",
        assignments.join(", "),
    );
    render_filter(filter, &mut sql, &mut binds)?;
    sql.push_str(" RETURNING to_jsonb(t.*)");
    Ok((sql, binds))
}

// =============================================================================
// Error classification
// =============================================================================

/// `PostgreSQL` error code for insufficient privilege, which is also what a
/// row-level-security rejection surfaces as.
const INSUFFICIENT_PRIVILEGE: &str = "42501";

fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => {
            if db.is_unique_violation() {
                StoreError::new(StoreErrorKind::Conflict, db.message())
            } else if db.is_check_violation() {
                StoreError::new(StoreErrorKind::Invalid, db.message())
            } else if db.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) {
                StoreError::new(StoreErrorKind::PermissionDenied, db.message())
            } else {
                StoreError::other(db.message())
            }
        }
        sqlx::Error::RowNotFound => StoreError::new(StoreErrorKind::NotFound, "no matching row"),
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::new(StoreErrorKind::Transport, err.to_string())
        }
        _ => StoreError::other(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, JsonValue)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("name"));
        assert!(is_identifier("logo_url"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1name"));
        assert!(!is_identifier("na me"));
        assert!(!is_identifier("name\"; DROP TABLE brands; --"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_select_sql_with_order() {
        let filter = Filter::active();
        let (sql, binds) =
            build_select_sql(Table::Brands, &filter, Some(Ordering::asc("name")), false)
                .expect("build");
        assert_eq!(
            sql,
            "SELECT to_jsonb(t.*) FROM \"brands\" AS t WHERE t.\"active\" = $1 ORDER BY t.\"name\" ASC"
        );
        assert_eq!(binds, vec![BindValue::Bool(true)]);
    }

    #[test]
    fn test_select_one_limits() {
        let id = Uuid::new_v4();
        let filter = Filter::Eq("id", ScalarValue::Uuid(id));
        let (sql, binds) = build_select_sql(Table::Profiles, &filter, None, true).expect("build");
        assert!(sql.ends_with("LIMIT 1"));
        assert_eq!(binds, vec![BindValue::Uuid(id)]);
    }

    #[test]
    fn test_or_group_numbering() {
        let filter = Filter::Or(vec![
            Filter::Contains("first_name", "gre".to_owned()),
            Filter::Contains("email", "gre".to_owned()),
        ]);
        let (sql, binds) = build_count_sql(Table::Customers, &filter).expect("build");
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM \"customers\" AS t WHERE (t.\"first_name\" ILIKE $1 OR t.\"email\" ILIKE $2)"
        );
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn test_empty_or_matches_nothing() {
        let (sql, _) = build_count_sql(Table::Customers, &Filter::Or(vec![])).expect("build");
        assert!(sql.ends_with("WHERE FALSE"));
    }

    #[test]
    fn test_insert_sql_lists_only_given_columns() {
        let (sql, binds) = build_insert_sql(
            Table::Brands,
            record(&[("name", json!("Acme")), ("slug", json!("acme"))]),
        )
        .expect("build");
        assert_eq!(
            sql,
            "INSERT INTO \"brands\" (\"name\", \"slug\") SELECT p.\"name\", p.\"slug\" FROM jsonb_populate_record(NULL::\"brands\", $1) AS p RETURNING to_jsonb(\"brands\".*)"
        );
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn test_insert_rejects_empty_record() {
        assert!(build_insert_sql(Table::Brands, Record::new()).is_err());
    }

    #[test]
    fn test_insert_rejects_bad_column() {
        let result = build_insert_sql(Table::Brands, record(&[("bad column", json!(1))]));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_sql_filter_binds_follow_patch() {
        let id = Uuid::new_v4();
        let (sql, binds) = build_update_sql(
            Table::Brands,
            &Filter::active_by_id(id),
            record(&[("active", json!(false))]),
        )
        .expect("build");
        assert_eq!(
            sql,
            "UPDATE \"brands\" AS t SET \"active\" = p.\"active\" FROM jsonb_populate_record(NULL::\"brands\", $1) AS p WHERE (t.\"id\" = $2 AND t.\"active\" = $3) RETURNING to_jsonb(t.*)"
        );
        assert_eq!(binds.len(), 3);
    }

    #[test]
    fn test_classify_row_not_found() {
        let err = classify(sqlx::Error::RowNotFound);
        assert_eq!(err.kind, StoreErrorKind::NotFound);
    }

    #[test]
    fn test_classify_pool_timeout_as_transport() {
        let err = classify(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, StoreErrorKind::Transport);
    }
}
