//! Load result module
//!
//! The outcome of a load: a page of items with continuation keys and
//! boundary counts, or a load error that may be retried.
//!
//! # Overview
//!
//! - `LoadResult` - Page or error, produced exactly once per submission
//! - `Page` - Items plus `prev_key`/`next_key` and placeholder counts
//! - `LoadError` - Failure returned as data, never thrown
//!
//! A `Page` can only be built through [`Page::new`], which rejects an empty
//! page that still points at a neighbor.

mod types;

pub use types::{LoadError, LoadErrorKind, LoadResult, Page};
