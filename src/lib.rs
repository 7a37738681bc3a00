// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # sql-pager
//!
//! Offset/limit pagination over an arbitrary parameterized SQL query.
//!
//! Given a raw query, its bind parameters and a row mapper, a [`Paginator`]
//! counts the full result, validates the requested page, appends ordering and
//! a `limit`/`offset` window, and returns the page with navigation metadata.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sql_pager::{map_rows, DatabaseEngine, Paginator, Result};
//!
//! fn main() -> Result<()> {
//!     let db = DatabaseEngine::open("warehouse.duckdb")?;
//!
//!     let mut paginator = Paginator::new(10, 2, &db)?;
//!     paginator.set_raw_query("SELECT id, name FROM users WHERE active = ?", vec![true.into()]);
//!     paginator.set_order(["id DESC"]);
//!
//!     let page = paginator.fetch(|rows: &mut duckdb::Rows<'_>| {
//!         map_rows(rows, |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
//!     })?;
//!
//!     println!("{}", page.to_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! configure ─► count ─► validate ─► compose ─► execute + map ─► Page
//!                │                                  │
//!                └──────────── QueryExecutor ───────┘
//!                               (DuckDB engine)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types: bind values, sort specifications
pub mod types;

/// Query execution capability and the DuckDB engine
pub mod database;

/// The paginator and its result envelope
pub mod pagination;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, PagerConfig, QueryDefinition};
pub use database::{json_rows, map_rows, DatabaseEngine, QueryExecutor};
pub use pagination::{Page, Paginator};
