//! DuckDB-based query engine
//!
//! Embedded DuckDB connection that implements [`QueryExecutor`], plus the
//! cursor helpers row mappers are built from.

use super::executor::QueryExecutor;
use crate::error::{Error, Result};
use crate::types::{BindValue, JsonObject};
use duckdb::{params_from_iter, Connection, Row, Rows, Statement};
use serde_json::Value;

/// Path that selects an in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Database query engine using DuckDB
pub struct DatabaseEngine {
    /// DuckDB connection
    conn: Connection,
    /// Database path used (for logging)
    path: String,
}

impl DatabaseEngine {
    /// Open a database file, or an in-memory database for `":memory:"`
    pub fn open(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let conn = if path == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(&path)
        }
        .map_err(|e| Error::config(format!("Failed to open DuckDB database '{path}': {e}")))?;

        tracing::debug!("Opened DuckDB database: {}", path);

        Ok(Self { conn, path })
    }

    /// Open a fresh in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::open(IN_MEMORY)
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            path: IN_MEMORY.to_string(),
        }
    }

    /// Run a batch of statements (schema setup, seeding)
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!("Executing batch: {}", sql);
        self.conn
            .execute_batch(sql)
            .map_err(Error::query_execution)
    }

    /// Database path (":memory:" for in-memory databases)
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl QueryExecutor for DatabaseEngine {
    type Rows<'r> = Rows<'r>;

    fn query_count(&self, sql: &str, params: &[BindValue]) -> Result<i64> {
        tracing::debug!("Executing count query: {}", sql);

        self.conn
            .query_row(sql, params_from_iter(params), |row| row.get(0))
            .map_err(Error::query_execution)
    }

    fn query_rows<E, F>(&self, sql: &str, params: &[BindValue], map: F) -> Result<Vec<E>>
    where
        F: for<'r> FnOnce(&mut Self::Rows<'r>) -> Result<Vec<E>>,
    {
        tracing::debug!("Executing query: {}", sql);

        let mut stmt = self.conn.prepare(sql).map_err(Error::query_execution)?;
        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(Error::query_execution)?;

        map(&mut rows)
    }
}

// ============================================================================
// Row Mapping Helpers
// ============================================================================

/// Drain a cursor, converting each row with `f`
///
/// Cursor failures surface as query execution errors; failures from `f`
/// (bad column index, type mismatch) surface as mapping errors.
pub fn map_rows<E, F>(rows: &mut Rows<'_>, mut f: F) -> Result<Vec<E>>
where
    F: FnMut(&Row<'_>) -> duckdb::Result<E>,
{
    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(Error::query_execution)? {
        records.push(f(row).map_err(Error::mapping)?);
    }
    Ok(records)
}

/// Row mapper producing one JSON object per row, keyed by column name
pub fn json_rows(rows: &mut Rows<'_>) -> Result<Vec<Value>> {
    let columns = rows
        .as_ref()
        .map(Statement::column_names)
        .unwrap_or_default();

    map_rows(rows, |row| {
        let mut record = JsonObject::new();
        for (idx, name) in columns.iter().enumerate() {
            let value: duckdb::types::Value = row.get(idx)?;
            record.insert(name.clone(), duckdb_value_to_json(value));
        }
        Ok(Value::Object(record))
    })
}

/// Convert DuckDB Value to JSON Value
pub fn duckdb_value_to_json(value: duckdb::types::Value) -> Value {
    match value {
        duckdb::types::Value::Null => Value::Null,
        duckdb::types::Value::Boolean(b) => Value::Bool(b),
        duckdb::types::Value::TinyInt(i) => Value::Number(i.into()),
        duckdb::types::Value::SmallInt(i) => Value::Number(i.into()),
        duckdb::types::Value::Int(i) => Value::Number(i.into()),
        duckdb::types::Value::BigInt(i) => Value::Number(i.into()),
        duckdb::types::Value::HugeInt(i) => {
            i64::try_from(i).map_or_else(|_| Value::String(i.to_string()), Value::from)
        }
        duckdb::types::Value::UTinyInt(i) => Value::Number(i.into()),
        duckdb::types::Value::USmallInt(i) => Value::Number(i.into()),
        duckdb::types::Value::UInt(i) => Value::Number(i.into()),
        duckdb::types::Value::UBigInt(i) => Value::Number(i.into()),
        duckdb::types::Value::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(Value::Null, Value::Number)
        }
        duckdb::types::Value::Double(f) => {
            serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)
        }
        duckdb::types::Value::Text(s) => Value::String(s),
        duckdb::types::Value::Blob(b) => Value::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        duckdb::types::Value::Timestamp(_, i) => {
            let secs = i.div_euclid(1_000_000);
            let nsecs = (i.rem_euclid(1_000_000) * 1000) as u32;
            chrono::DateTime::from_timestamp(secs, nsecs)
                .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()))
                .unwrap_or(Value::Number(i.into()))
        }
        duckdb::types::Value::Date32(d) => {
            // 719163 days from 1 CE to 1970-01-01
            chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163)
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Number(d.into()))
        }
        _ => Value::String(format!("{value:?}")),
    }
}
