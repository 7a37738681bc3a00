//! CLI module
//!
//! Command-line interface for paginating queries against a DuckDB database.
//!
//! # Commands
//!
//! - `page` - Fetch one page and print the result envelope
//! - `count` - Print the total row count of a query
//! - `sql` - Print the composed count and page statements

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PageArgs, QueryArgs};
pub use runner::Runner;
