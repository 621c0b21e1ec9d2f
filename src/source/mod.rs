//! Source adapter module
//!
//! The pluggable capability the engine calls to realise an index range
//! into concrete items.
//!
//! # Overview
//!
//! The source module provides:
//! - `SourceAdapter` - The fetch/size contract the engine depends on
//! - `VecSource` - In-memory items that can be replaced wholesale
//! - `SequenceSource` - A synthetic `"item N"` dataset, bounded or not
//! - `FlakySource` - Wraps another adapter and fails queued fetches
//!
//! Adapters may return fewer items than requested. The engine keys the
//! page from the items that came back. An empty read inside a range the
//! adapter claims to hold becomes a retryable load error.

mod adapters;
mod types;

pub use adapters::{FlakySource, SequenceSource, VecSource};
pub use types::SourceAdapter;
