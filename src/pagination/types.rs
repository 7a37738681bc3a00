//! Pagination result types
//!
//! The envelope returned after a successful page fetch.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of results plus navigation metadata
///
/// Serializes to an object with exactly four keys: `data`, `next_page`,
/// `count` and `previous_page`. Missing neighbours serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<E> {
    /// Page contents, at most `page_size` entries
    pub data: Vec<E>,
    /// Next page number, `None` on the last page
    pub next_page: Option<u32>,
    /// Total rows across all pages
    pub count: u64,
    /// Previous page number, `None` on the first page
    pub previous_page: Option<u32>,
}

impl<E> Page<E> {
    /// Check if there is a page after this one
    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }

    /// Check if there is a page before this one
    pub fn has_previous(&self) -> bool {
        self.previous_page.is_some()
    }

    /// Number of entries on this page
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the page holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<E: Serialize> Page<E> {
    /// Render the envelope as a JSON value
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
