//! Query execution capability
//!
//! The paginator never talks to a database directly; it goes through this
//! trait so the engine (DuckDB in production, a mock in tests) stays swappable.

use crate::error::Result;
use crate::types::BindValue;

/// Executes parameterized SQL on behalf of a paginator
///
/// Implementations own connection handling. Failures they report must be
/// wrapped as [`Error::QueryExecution`](crate::Error::QueryExecution); the
/// paginator passes them through untouched.
pub trait QueryExecutor {
    /// Row cursor handed to the caller's row mapper
    type Rows<'r>;

    /// Run a statement that yields a single integer (the `COUNT(*)` path)
    fn query_count(&self, sql: &str, params: &[BindValue]) -> Result<i64>;

    /// Run a statement and hand its live cursor to `map`
    ///
    /// Whatever `map` returns, including its errors, is returned as-is.
    fn query_rows<E, F>(&self, sql: &str, params: &[BindValue], map: F) -> Result<Vec<E>>
    where
        F: for<'r> FnOnce(&mut Self::Rows<'r>) -> Result<Vec<E>>;
}
