//! Configuration for the pager
//!
//! YAML file naming the database, a default page size, optional setup SQL,
//! and a set of named queries that can be paginated by name.
//!
//! ```yaml
//! database: ./warehouse.duckdb
//! page_size: 25
//! queries:
//!   active_users:
//!     sql: SELECT id, name FROM users WHERE active = ?
//!     order_by: ["id DESC"]
//! ```

use crate::database::IN_MEMORY;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pager configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// DuckDB database path (":memory:" for an in-memory database)
    #[serde(default = "default_database")]
    pub database: String,

    /// Default rows per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// SQL batch executed once after opening the database
    #[serde(default)]
    pub init: Option<String>,

    /// Named queries
    #[serde(default)]
    pub queries: HashMap<String, QueryDefinition>,
}

fn default_database() -> String {
    IN_MEMORY.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            page_size: default_page_size(),
            init: None,
            queries: HashMap::new(),
        }
    }
}

impl PagerConfig {
    /// Look up a named query
    pub fn query(&self, name: &str) -> Result<&QueryDefinition> {
        self.queries.get(name).ok_or_else(|| {
            let mut known: Vec<&str> = self.queries.keys().map(String::as_str).collect();
            known.sort_unstable();
            Error::config(format!(
                "Query '{name}' not found. Known queries: {}",
                known.join(", ")
            ))
        })
    }
}

// ============================================================================
// Query Definitions
// ============================================================================

/// A named base query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    /// Base SQL without order/limit/offset; may contain `?` placeholders
    pub sql: String,

    /// Sort specifications, e.g. `["id DESC", "name ASC"]`
    #[serde(default)]
    pub order_by: Vec<String>,

    /// Page size override for this query
    #[serde(default)]
    pub page_size: Option<u32>,
}

// ============================================================================
// Loading
// ============================================================================

/// Load configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<PagerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<PagerConfig> {
    let config: PagerConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate a loaded configuration
fn validate_config(config: &PagerConfig) -> Result<()> {
    if config.database.is_empty() {
        return Err(Error::config("database cannot be empty"));
    }

    if config.page_size == 0 {
        return Err(Error::config("page_size must be greater than 0"));
    }

    for (name, query) in &config.queries {
        if query.sql.trim().is_empty() {
            return Err(Error::config(format!("Query '{name}' sql cannot be empty")));
        }
        if query.page_size == Some(0) {
            return Err(Error::config(format!(
                "Query '{name}' page_size must be greater than 0"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_minimal_config() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config, PagerConfig::default());
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_load_full_config() {
        let yaml = r#"
database: ./data.duckdb
page_size: 50
init: CREATE TABLE IF NOT EXISTS users (id INTEGER);
queries:
  users:
    sql: SELECT id, name FROM users WHERE active = ?
    order_by: ["id DESC", "name ASC"]
    page_size: 5
  all:
    sql: SELECT * FROM users
"#;

        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.database, "./data.duckdb");
        assert_eq!(config.page_size, 50);
        assert!(config.init.is_some());

        let users = config.query("users").unwrap();
        assert_eq!(users.sql, "SELECT id, name FROM users WHERE active = ?");
        assert_eq!(users.order_by, vec!["id DESC", "name ASC"]);
        assert_eq!(users.page_size, Some(5));

        let all = config.query("all").unwrap();
        assert!(all.order_by.is_empty());
        assert_eq!(all.page_size, None);
    }

    #[test]
    fn test_unknown_query() {
        let yaml = r#"
queries:
  b: { sql: "SELECT 2" }
  a: { sql: "SELECT 1" }
"#;
        let config = load_config_from_str(yaml).unwrap();
        let err = config.query("missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Query 'missing' not found. Known queries: a, b"
        );
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = load_config_from_str("page_size: 0").unwrap_err();
        assert!(err.to_string().contains("page_size must be greater than 0"));

        let yaml = r#"
queries:
  q: { sql: "SELECT 1", page_size: 0 }
"#;
        assert!(load_config_from_str(yaml).is_err());
    }

    #[test]
    fn test_empty_sql_rejected() {
        let yaml = r#"
queries:
  q: { sql: "  " }
"#;
        let err = load_config_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("Query 'q' sql cannot be empty"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = load_config_from_str("page_size: [").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size: 7").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.page_size, 7);
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
