//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paginate any SQL query over a DuckDB database
#[derive(Parser, Debug)]
#[command(name = "sql-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// DuckDB database path (":memory:" for in-memory)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// SQL batch to run before the command (schema setup, seed data)
    #[arg(long, global = true)]
    pub init: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page and print the result envelope
    Page {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        window: PageArgs,
    },

    /// Print the total row count of a query
    Count {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print the bounded SQL for a page without running it
    Sql {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        window: PageArgs,
    },
}

/// Which query to paginate
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Raw SQL (no order/limit/offset)
    #[arg(short, long, conflicts_with = "name")]
    pub query: Option<String>,

    /// Named query from the config file
    #[arg(short, long)]
    pub name: Option<String>,

    /// Bind parameter for the next `?` placeholder (repeatable)
    #[arg(long = "param")]
    pub params: Vec<String>,
}

/// Page window selection
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Rows per page (overrides config)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort specification, e.g. "id DESC" (repeatable, overrides config)
    #[arg(short, long = "order")]
    pub order: Vec<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_command() {
        let cli = Cli::try_parse_from([
            "sql-pager",
            "-d",
            "data.duckdb",
            "page",
            "-q",
            "SELECT * FROM t WHERE a = ?",
            "--param",
            "5",
            "-p",
            "3",
            "--page-size",
            "10",
            "-o",
            "id DESC",
            "-o",
            "name ASC",
        ])
        .unwrap();

        assert_eq!(cli.database.as_deref(), Some("data.duckdb"));
        assert_eq!(cli.format, OutputFormat::Json);

        let Commands::Page { query, window } = cli.command else {
            panic!("Expected Page");
        };
        assert_eq!(query.query.as_deref(), Some("SELECT * FROM t WHERE a = ?"));
        assert_eq!(query.params, vec!["5"]);
        assert_eq!(window.page, 3);
        assert_eq!(window.page_size, Some(10));
        assert_eq!(window.order, vec!["id DESC", "name ASC"]);
    }

    #[test]
    fn test_page_defaults_to_first() {
        let cli = Cli::try_parse_from(["sql-pager", "sql", "-n", "users"]).unwrap();
        let Commands::Sql { query, window } = cli.command else {
            panic!("Expected Sql");
        };
        assert_eq!(query.name.as_deref(), Some("users"));
        assert_eq!(window.page, 1);
        assert!(window.page_size.is_none());
        assert!(window.order.is_empty());
    }

    #[test]
    fn test_query_and_name_conflict() {
        let result =
            Cli::try_parse_from(["sql-pager", "count", "-q", "SELECT 1", "-n", "users"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sql-pager",
            "count",
            "-q",
            "SELECT 1",
            "--format",
            "pretty",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }
}
