//! Database support via DuckDB
//!
//! This module defines the query execution capability the paginator depends
//! on, and provides its DuckDB implementation along with row mapping helpers.

mod engine;
mod executor;

pub use engine::{duckdb_value_to_json, json_rows, map_rows, DatabaseEngine, IN_MEMORY};
pub use executor::QueryExecutor;

// Short alias used by the CLI and tests
pub use engine::DatabaseEngine as DbEngine;
