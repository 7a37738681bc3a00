//! Error types for sql-pager
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// Boxed error coming from an external capability (executor or row mapper)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for sql-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Pagination Errors
    // ============================================================================
    /// Requested page is out of bounds, or the page size is unusable
    #[error("pagination {message}")]
    InvalidPage { message: String },

    // ============================================================================
    // Capability Errors
    // ============================================================================
    /// The query execution capability failed (syntax, connectivity, constraint)
    #[error("{0}")]
    QueryExecution(#[source] BoxError),

    /// Converting result rows into entities failed
    #[error("{0}")]
    Mapping(#[source] BoxError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid page error
    pub fn invalid_page(message: impl Into<String>) -> Self {
        Self::InvalidPage {
            message: message.into(),
        }
    }

    /// Wrap a failure reported by the query execution capability
    pub fn query_execution(source: impl Into<BoxError>) -> Self {
        Self::QueryExecution(source.into())
    }

    /// Wrap a failure reported while mapping rows
    pub fn mapping(source: impl Into<BoxError>) -> Self {
        Self::Mapping(source.into())
    }

    /// Check if this error came from page validation
    pub fn is_invalid_page(&self) -> bool {
        matches!(self, Self::InvalidPage { .. })
    }
}

/// Result type alias for sql-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
