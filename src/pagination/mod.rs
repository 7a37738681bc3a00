//! Pagination module
//!
//! Offset/limit pagination over an arbitrary parameterized SQL query.
//!
//! # Overview
//!
//! A [`Paginator`] runs a strictly linear pipeline per fetch:
//! configure → count → validate → compose bounded query → map rows → [`Page`].
//! The first failing step aborts the fetch and its error is returned unchanged.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::Page;
