//! Offset/limit paginator over a raw SQL query
//!
//! A [`Paginator`] wraps a caller-supplied query with counting, ordering,
//! bounds validation and a `limit`/`offset` window. It is meant for a single
//! request on a single thread: configure it, call [`Paginator::fetch`], drop it.

use super::types::Page;
use crate::database::QueryExecutor;
use crate::error::{Error, Result};
use crate::types::BindValue;
use std::fmt::Display;

/// Paginator state for one fetch cycle
pub struct Paginator<'a, E, X: QueryExecutor> {
    page_size: u32,
    page_number: u32,
    executor: &'a X,
    total_count: u64,
    order_by: String,
    raw_query: String,
    params: Vec<BindValue>,
    data: Vec<E>,
}

impl<'a, E, X: QueryExecutor> Paginator<'a, E, X> {
    /// Create a paginator for `page_number` (1-based) with `page_size` rows per page
    ///
    /// Fails if `page_size` is zero. The page number is only checked by
    /// [`validate`](Self::validate).
    pub fn new(page_size: u32, page_number: u32, executor: &'a X) -> Result<Self> {
        check_page_size(page_size)?;
        Ok(Self {
            page_size,
            page_number,
            executor,
            total_count: 0,
            order_by: String::new(),
            raw_query: String::new(),
            params: Vec::new(),
            data: Vec::new(),
        })
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Change the number of rows per page (must be positive)
    pub fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        check_page_size(page_size)?;
        self.page_size = page_size;
        Ok(())
    }

    /// Change the requested page
    pub fn set_page(&mut self, page_number: u32) {
        self.page_number = page_number;
    }

    /// Set ordering from sort specifications such as `"id DESC"`
    ///
    /// Builds `" order by spec1,spec2"`; an empty sequence clears the ordering.
    pub fn set_order<I, S>(&mut self, orders: I)
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        let specs: Vec<String> = orders.into_iter().map(|s| s.to_string()).collect();
        self.order_by = if specs.is_empty() {
            String::new()
        } else {
            format!(" order by {}", specs.join(","))
        };
    }

    /// Set the base query (no order/limit/offset) and its positional parameters
    pub fn set_raw_query(&mut self, query: impl Into<String>, params: Vec<BindValue>) {
        self.raw_query = query.into();
        self.params = params;
    }

    /// Inject a known total count instead of querying for it
    ///
    /// The count is trusted as-is: a stale value makes validation and
    /// next/previous computation wrong. [`fetch`](Self::fetch) always
    /// recomputes it.
    pub fn set_total_count(&mut self, total_count: u64) {
        self.total_count = total_count;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Current order clause (empty when unordered)
    pub fn order_clause(&self) -> &str {
        &self.order_by
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }

    /// Rows from the last successful fetch
    pub fn data(&self) -> &[E] {
        &self.data
    }

    /// Zero-based row offset of the current page
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }

    // ========================================================================
    // Query Composition
    // ========================================================================

    /// Counting statement wrapping the raw query
    pub fn count_query(&self) -> String {
        format!("select count(*) from ({})", self.raw_query)
    }

    /// Final statement: raw query, order clause, then the limit/offset window
    pub fn query(&self) -> String {
        format!(
            "{}{} limit {} offset {}",
            self.raw_query,
            self.order_by,
            self.page_size,
            self.offset()
        )
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Run the counting statement and store the result as the total count
    pub fn set_count_by_query(&mut self) -> Result<()> {
        let count = self
            .executor
            .query_count(&self.count_query(), &self.params)?;

        self.total_count = u64::try_from(count).map_err(|_| {
            Error::query_execution(format!("count query returned negative value {count}"))
        })?;

        tracing::debug!("Total count for query: {}", self.total_count);
        Ok(())
    }

    /// Check the requested page against the page size and total count
    pub fn validate(&self) -> Result<()> {
        if self.page_number < 1 {
            return Err(Error::invalid_page("pageNum cannot be less than 1"));
        }

        let page_size = u64::from(self.page_size);
        if self.total_count + page_size <= page_size * u64::from(self.page_number) {
            return Err(Error::invalid_page(
                "pageNum and totalCount must be greater than pageSize",
            ));
        }

        Ok(())
    }

    /// Run the bounded query, storing mapped rows as the page data
    ///
    /// Prior data is replaced only when mapping succeeds.
    pub fn run_query<F>(&mut self, map: F) -> Result<()>
    where
        F: for<'r> FnOnce(&mut X::Rows<'r>) -> Result<Vec<E>>,
    {
        let query = self.query();
        self.data = self.executor.query_rows(&query, &self.params, map)?;
        Ok(())
    }

    /// Page after the current one, if any rows remain
    pub fn next_page(&self) -> Option<u32> {
        if u64::from(self.page_number) * u64::from(self.page_size) >= self.total_count {
            None
        } else {
            self.page_number.checked_add(1)
        }
    }

    /// Page before the current one, if the current page is not the first
    pub fn previous_page(&self) -> Option<u32> {
        match self.page_number.checked_sub(1) {
            Some(page) if page >= 1 => Some(page),
            _ => None,
        }
    }

    /// Count, validate, then fetch the page; stops at the first error
    pub fn fetch<F>(&mut self, map: F) -> Result<Page<E>>
    where
        F: for<'r> FnOnce(&mut X::Rows<'r>) -> Result<Vec<E>>,
        E: Clone,
    {
        self.set_count_by_query()?;
        self.validate()?;
        self.run_query(map)?;

        tracing::info!(
            "Fetched page {} ({} rows of {})",
            self.page_number,
            self.data.len(),
            self.total_count
        );

        Ok(self.envelope())
    }

    /// Envelope built from the current state
    pub fn envelope(&self) -> Page<E>
    where
        E: Clone,
    {
        Page {
            data: self.data.clone(),
            next_page: self.next_page(),
            count: self.total_count,
            previous_page: self.previous_page(),
        }
    }
}

fn check_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 {
        return Err(Error::invalid_page("pageSize must be greater than 0"));
    }
    Ok(())
}
