//! In-memory store gateway.
//!
//! A deterministic stand-in for the hosted store, used by unit and
//! integration tests. It implements the same contract as the Postgres
//! gateway: JSON rows, store-assigned ids and timestamps, unique-column
//! enforcement surfaced as [`StoreErrorKind::Conflict`], and one-shot
//! failure injection for atomicity tests.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Value as JsonValue, json};
use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;

use super::{
    Filter, Ordering, Record, Row, ScalarValue, StoreError, StoreErrorKind, StoreGateway, Table,
};

/// Columns enforced unique per table, mirroring the store's constraints.
const UNIQUE_COLUMNS: &[(Table, &[&str])] = &[
    (Table::Brands, &["slug"]),
    (Table::Discounts, &["code"]),
    (Table::Customers, &["email"]),
];

#[derive(Default)]
struct Inner {
    tables: HashMap<Table, Vec<Row>>,
    /// `Some((n, kind))` fails the operation issued after `n` more
    /// successful ones.
    fail_plan: Option<(u32, StoreErrorKind)>,
}

/// In-process store gateway backed by JSON rows.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next operation with the given kind.
    pub async fn fail_next(&self, kind: StoreErrorKind) {
        self.fail_after(0, kind).await;
    }

    /// Let `successes` operations through, then fail the next one.
    pub async fn fail_after(&self, successes: u32, kind: StoreErrorKind) {
        self.inner.write().await.fail_plan = Some((successes, kind));
    }

    /// Number of physical rows in a table, including soft-deleted ones.
    /// Test-only visibility into what the gateway actually persisted.
    pub async fn row_count(&self, table: Table) -> usize {
        self.inner
            .read()
            .await
            .tables
            .get(&table)
            .map_or(0, Vec::len)
    }

    fn take_planned_failure(inner: &mut Inner) -> Result<(), StoreError> {
        match inner.fail_plan.take() {
            Some((0, kind)) => Err(StoreError::new(kind, "injected store failure")),
            Some((n, kind)) => {
                inner.fail_plan = Some((n - 1, kind));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn unique_columns(table: Table) -> &'static [&'static str] {
        UNIQUE_COLUMNS
            .iter()
            .find(|(t, _)| *t == table)
            .map_or(&[], |(_, columns)| columns)
    }

    /// Reject `candidate` if a different row already holds one of its
    /// unique values.
    fn check_unique(
        table: Table,
        rows: &[Row],
        candidate: &Row,
        skip_id: Option<&JsonValue>,
    ) -> Result<(), StoreError> {
        for column in Self::unique_columns(table) {
            let Some(value) = candidate.get(column) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let clash = rows.iter().any(|row| {
                skip_id.is_none_or(|id| row.get("id") != Some(id))
                    && row.get(*column) == Some(value)
            });
            if clash {
                return Err(StoreError::new(
                    StoreErrorKind::Conflict,
                    format!("duplicate key value violates unique constraint on {table}.{column}"),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StoreGateway for MemoryStore {
    async fn select(
        &self,
        table: Table,
        filter: &Filter,
        order: Option<Ordering>,
    ) -> Result<Vec<Row>, StoreError> {
        let mut inner = self.inner.write().await;
        Self::take_planned_failure(&mut inner)?;
        let mut rows: Vec<Row> = inner
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(filter, row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(order.column), b.get(order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        Ok(rows)
    }

    async fn select_one(
        &self,
        table: Table,
        filter: &Filter,
    ) -> Result<Option<Row>, StoreError> {
        let mut inner = self.inner.write().await;
        Self::take_planned_failure(&mut inner)?;
        Ok(inner
            .tables
            .get(&table)
            .and_then(|rows| rows.iter().find(|row| matches(filter, row)).cloned()))
    }

    async fn insert(&self, table: Table, record: Record) -> Result<Row, StoreError> {
        let mut inner = self.inner.write().await;
        Self::take_planned_failure(&mut inner)?;

        let mut row = JsonValue::Object(record);
        let now = Utc::now().to_rfc3339();
        if let Some(object) = row.as_object_mut() {
            object
                .entry("id")
                .or_insert_with(|| json!(Uuid::new_v4().to_string()));
            object.entry("created_at").or_insert_with(|| json!(now));
            object.entry("updated_at").or_insert_with(|| json!(now));
        }

        let rows = inner.tables.entry(table).or_default();
        Self::check_unique(table, rows, &row, None)?;
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        filter: &Filter,
        patch: Record,
    ) -> Result<Row, StoreError> {
        let mut inner = self.inner.write().await;
        Self::take_planned_failure(&mut inner)?;

        // Unique check against a merged preview before mutating anything.
        let rows_snapshot = inner.tables.get(&table).cloned().unwrap_or_default();
        let target = rows_snapshot
            .iter()
            .find(|row| matches(filter, row))
            .ok_or_else(|| StoreError::new(StoreErrorKind::NotFound, "no matching row"))?;
        let mut preview = target.clone();
        if let Some(object) = preview.as_object_mut() {
            for (key, value) in &patch {
                object.insert(key.clone(), value.clone());
            }
        }
        Self::check_unique(table, &rows_snapshot, &preview, target.get("id"))?;

        let now = Utc::now().to_rfc3339();
        let rows = inner.tables.entry(table).or_default();
        let mut updated = None;
        for row in rows.iter_mut() {
            if !matches(filter, row) {
                continue;
            }
            if let Some(object) = row.as_object_mut() {
                for (key, value) in &patch {
                    object.insert(key.clone(), value.clone());
                }
                object.insert("updated_at".to_owned(), json!(now));
            }
            if updated.is_none() {
                updated = Some(row.clone());
            }
        }
        updated.ok_or_else(|| StoreError::new(StoreErrorKind::NotFound, "no matching row"))
    }

    async fn count(&self, table: Table, filter: &Filter) -> Result<i64, StoreError> {
        let mut inner = self.inner.write().await;
        Self::take_planned_failure(&mut inner)?;
        let count = inner
            .tables
            .get(&table)
            .map_or(0, |rows| rows.iter().filter(|row| matches(filter, row)).count());
        Ok(count as i64)
    }
}

// =============================================================================
// Filter evaluation
// =============================================================================

fn matches(filter: &Filter, row: &Row) -> bool {
    match filter {
        Filter::All => true,
        Filter::Eq(column, value) => row.get(*column).is_some_and(|v| scalar_eq(value, v)),
        Filter::Contains(column, term) => row
            .get(*column)
            .and_then(JsonValue::as_str)
            .is_some_and(|s| s.to_lowercase().contains(&term.to_lowercase())),
        Filter::After(column, instant) => row
            .get(*column)
            .and_then(JsonValue::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .is_some_and(|parsed| parsed.with_timezone(&Utc) >= *instant),
        Filter::And(filters) => filters.iter().all(|f| matches(f, row)),
        Filter::Or(filters) => filters.iter().any(|f| matches(f, row)),
    }
}

fn scalar_eq(scalar: &ScalarValue, value: &JsonValue) -> bool {
    match scalar {
        ScalarValue::Text(expected) => value.as_str() == Some(expected.as_str()),
        ScalarValue::Bool(expected) => value.as_bool() == Some(*expected),
        ScalarValue::Int(expected) => value.as_i64() == Some(*expected),
        ScalarValue::Uuid(expected) => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .is_some_and(|parsed| parsed == *expected),
    }
}

fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(JsonValue::String(a)), Some(JsonValue::String(b))) => {
            a.to_lowercase().cmp(&b.to_lowercase())
        }
        (Some(JsonValue::Number(a)), Some(JsonValue::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        _ => std::cmp::Ordering::Equal,
    }
}
