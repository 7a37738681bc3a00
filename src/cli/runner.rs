//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, PageArgs, QueryArgs};
use crate::config::{load_config, PagerConfig};
use crate::database::{json_rows, DbEngine};
use crate::error::{Error, Result, ResultExt};
use crate::pagination::Paginator;
use crate::types::BindValue;
use serde_json::{json, Value};

/// Query text, ordering, page size and parameters after merging CLI and config
#[derive(Debug, Clone, PartialEq)]
struct ResolvedQuery {
    sql: String,
    order_by: Vec<String>,
    page_size: u32,
    params: Vec<BindValue>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its output
    pub fn run(&self) -> Result<()> {
        let output = self.execute()?;
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(&output),
            OutputFormat::Pretty => serde_json::to_string_pretty(&output),
        }
        .context("Failed to render output")?;
        println!("{rendered}");
        Ok(())
    }

    /// Run the CLI command and return its output
    pub fn execute(&self) -> Result<Value> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Page { query, window } => self.page(&config, query, window),
            Commands::Count { query } => self.count(&config, query),
            Commands::Sql { query, window } => self.sql(&config, query, window),
        }
    }

    /// Load configuration, or defaults when no file is given
    fn load_config(&self) -> Result<PagerConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(PagerConfig::default()),
        }
    }

    /// Open the database and run setup SQL (config first, then --init)
    fn open_engine(&self, config: &PagerConfig) -> Result<DbEngine> {
        let path = self.cli.database.as_deref().unwrap_or(&config.database);
        let engine = DbEngine::open(path)?;

        for batch in [config.init.as_deref(), self.cli.init.as_deref()]
            .into_iter()
            .flatten()
        {
            engine
                .execute_batch(batch)
                .with_context(|| format!("Failed to run setup SQL on '{}'", engine.path()))?;
        }

        Ok(engine)
    }

    /// Merge CLI flags over the named query over config defaults
    fn resolve(
        &self,
        config: &PagerConfig,
        args: &QueryArgs,
        window: Option<&PageArgs>,
    ) -> Result<ResolvedQuery> {
        let (sql, mut order_by, mut page_size) = match (&args.query, &args.name) {
            (Some(sql), _) => (sql.clone(), Vec::new(), config.page_size),
            (None, Some(name)) => {
                let def = config.query(name)?;
                (
                    def.sql.clone(),
                    def.order_by.clone(),
                    def.page_size.unwrap_or(config.page_size),
                )
            }
            (None, None) => return Err(Error::config("Either --query or --name is required")),
        };

        if let Some(window) = window {
            if !window.order.is_empty() {
                order_by.clone_from(&window.order);
            }
            if let Some(size) = window.page_size {
                page_size = size;
            }
        }

        Ok(ResolvedQuery {
            sql,
            order_by,
            page_size,
            params: args.params.iter().map(|p| BindValue::parse(p)).collect(),
        })
    }

    /// Fetch a page and return the envelope
    fn page(&self, config: &PagerConfig, args: &QueryArgs, window: &PageArgs) -> Result<Value> {
        let resolved = self.resolve(config, args, Some(window))?;
        let engine = self.open_engine(config)?;

        let mut paginator: Paginator<Value, _> =
            Paginator::new(resolved.page_size, window.page, &engine)?;
        paginator.set_raw_query(resolved.sql, resolved.params);
        paginator.set_order(&resolved.order_by);

        paginator.fetch(json_rows)?.to_json()
    }

    /// Count rows of a query
    fn count(&self, config: &PagerConfig, args: &QueryArgs) -> Result<Value> {
        let resolved = self.resolve(config, args, None)?;
        let engine = self.open_engine(config)?;

        let mut paginator: Paginator<Value, _> =
            Paginator::new(resolved.page_size, 1, &engine)?;
        paginator.set_raw_query(resolved.sql, resolved.params);
        paginator.set_count_by_query()?;

        Ok(json!({ "count": paginator.total_count() }))
    }

    /// Compose the count and page statements without executing them
    fn sql(&self, config: &PagerConfig, args: &QueryArgs, window: &PageArgs) -> Result<Value> {
        let resolved = self.resolve(config, args, Some(window))?;
        // Composition never touches the executor. A scratch engine keeps
        // `sql` from opening the configured database or running setup SQL.
        let engine = DbEngine::in_memory()?;

        let mut paginator: Paginator<Value, _> =
            Paginator::new(resolved.page_size, window.page, &engine)?;
        paginator.set_raw_query(resolved.sql, resolved.params);
        paginator.set_order(&resolved.order_by);

        Ok(json!({
            "count_query": paginator.count_query(),
            "query": paginator.query(),
            "params": paginator.params(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SEED: &str = "CREATE TABLE users (id INTEGER, name VARCHAR, active BOOLEAN);
        INSERT INTO users VALUES
            (1, 'ann', true), (2, 'bob', false), (3, 'cy', true),
            (4, 'di', true), (5, 'ed', true);";

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["sql-pager", "--init", SEED];
        argv.extend_from_slice(args);
        Runner::new(Cli::try_parse_from(argv).unwrap())
    }

    fn config_file(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_page_command() {
        let output = runner(&[
            "page",
            "-q",
            "SELECT id, name FROM users WHERE active = ?",
            "--param",
            "true",
            "--page-size",
            "2",
            "-p",
            "2",
            "-o",
            "id ASC",
        ])
        .execute()
        .unwrap();

        assert_eq!(
            output,
            json!({
                "data": [{"id": 4, "name": "di"}, {"id": 5, "name": "ed"}],
                "next_page": null,
                "count": 4,
                "previous_page": 1,
            })
        );
    }

    #[test]
    fn test_page_out_of_range() {
        let err = runner(&["page", "-q", "SELECT * FROM users", "-p", "9"])
            .execute()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "pagination pageNum and totalCount must be greater than pageSize"
        );
    }

    #[test]
    fn test_count_command() {
        let output = runner(&["count", "-q", "SELECT * FROM users WHERE id > ?", "--param", "2"])
            .execute()
            .unwrap();
        assert_eq!(output, json!({"count": 3}));
    }

    #[test]
    fn test_sql_command() {
        let output = Runner::new(
            Cli::try_parse_from([
                "sql-pager",
                "sql",
                "-q",
                "SELECT * FROM users WHERE name = ?",
                "--param",
                "ann",
                "-p",
                "3",
                "--page-size",
                "10",
                "-o",
                "id DESC",
            ])
            .unwrap(),
        )
        .execute()
        .unwrap();

        assert_eq!(
            output,
            json!({
                "count_query": "select count(*) from (SELECT * FROM users WHERE name = ?)",
                "query": "SELECT * FROM users WHERE name = ? order by id DESC limit 10 offset 20",
                "params": ["ann"],
            })
        );
    }

    #[test]
    fn test_sql_command_leaves_database_alone() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("untouched.duckdb");
        let db = db.to_str().unwrap();

        let output = runner(&["-d", db, "sql", "-q", "SELECT * FROM users"])
            .execute()
            .unwrap();

        assert_eq!(output["query"], "SELECT * FROM users limit 20 offset 0");
        assert!(!dir.path().join("untouched.duckdb").exists());
    }

    #[test]
    fn test_failing_setup_sql_names_database() {
        let argv = ["sql-pager", "--init", "CREATE TABLE", "count", "-q", "SELECT 1"];
        let err = Runner::new(Cli::try_parse_from(argv).unwrap())
            .execute()
            .unwrap_err();

        assert!(matches!(err, Error::Other(_)));
        assert!(err
            .to_string()
            .starts_with("Failed to run setup SQL on ':memory:': "));
    }

    #[test]
    fn test_named_query_from_config() {
        let file = config_file(
            r#"
page_size: 3
queries:
  active:
    sql: SELECT id FROM users WHERE active
    order_by: ["id DESC"]
"#,
        );
        let path = file.path().to_str().unwrap();

        let output = runner(&["-C", path, "page", "-n", "active"])
            .execute()
            .unwrap();
        assert_eq!(
            output,
            json!({
                "data": [{"id": 5}, {"id": 4}, {"id": 3}],
                "next_page": 2,
                "count": 4,
                "previous_page": null,
            })
        );

        // CLI flags win over the named query
        let output = runner(&["-C", path, "sql", "-n", "active", "--page-size", "2", "-o", "id"])
            .execute()
            .unwrap();
        assert_eq!(
            output["query"],
            "SELECT id FROM users WHERE active order by id limit 2 offset 0"
        );
    }

    #[test]
    fn test_missing_query_is_config_error() {
        let err = runner(&["count"]).execute().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = runner(&["page", "-q", "SELECT 1", "--page-size", "0"])
            .execute()
            .unwrap_err();
        assert_eq!(err.to_string(), "pagination pageSize must be greater than 0");
    }

    #[test]
    fn test_bad_sql_is_query_execution_error() {
        let err = runner(&["page", "-q", "SELECT * FROM missing_table"])
            .execute()
            .unwrap_err();
        assert!(matches!(err, Error::QueryExecution(_)));
    }
}
