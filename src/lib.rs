// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Window Pager
//!
//! An incremental windowed-paging engine for large ordered datasets.
//!
//! A consumer shows a window of a long list and grows it in either
//! direction as the viewer scrolls. Each load returns one page of items
//! plus the keys needed to load the neighbouring pages and the number of
//! items that exist beyond each edge, so the consumer can show
//! placeholders for data it has not loaded yet.
//!
//! ## Features
//!
//! - **Three load types**: Refresh around an anchor, prepend before the
//!   window, append after it
//! - **Generations**: Every engine carries a generation; results from a
//!   replaced engine are recognisable and can be dropped
//! - **Retryable failures as data**: Faults come back as
//!   `LoadResult::Error` so the caller decides whether to resubmit
//! - **Pluggable sources**: Anything implementing `SourceAdapter`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use window_pager::{EngineConfig, EngineFactory, LoadParams, SequenceSource};
//!
//! #[tokio::main]
//! async fn main() -> window_pager::Result<()> {
//!     let factory = EngineFactory::new(Arc::new(SequenceSource::new(60)), EngineConfig::default());
//!     let (engine, _generation) = factory.create();
//!
//!     let result = engine.load(&LoadParams::refresh(Some(30), 20, 20)?).await?;
//!     let page = result.page().unwrap();
//!     assert_eq!(page.items_before(), 20);
//!     assert_eq!(page.next_key(), Some(&40));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  LoadParams   ┌──────────────┐  fetch(start, count)  ┌───────────────┐
//! │ PageWindow  │ ────────────▶ │ PagingEngine │ ────────────────────▶ │ SourceAdapter │
//! │ (consumer)  │ ◀──────────── │ (generation) │ ◀──────────────────── │               │
//! └─────────────┘  LoadResult   └──────────────┘       Vec<Item>       └───────────────┘
//!                                      ▲
//!                               EngineFactory ── FaultPolicy
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Load request parameters
pub mod params;

/// Load results and pages
pub mod result;

/// Source adapters
pub mod source;

/// Fault injection policies
pub mod fault;

/// Paging engine and factory
pub mod engine;

/// Caller-side retry and timeout helpers
pub mod retry;

/// Consumer-side page window
pub mod window;

/// Configuration file support
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, PagerConfig};
pub use engine::{EngineConfig, EngineFactory, Item, PageResult, PagingEngine};
pub use fault::{EveryNth, FaultPolicy, NoFaults, OneShotFault};
pub use params::{LoadKey, LoadParams};
pub use result::{LoadError, LoadErrorKind, LoadResult, Page};
pub use retry::RetryPolicy;
pub use source::{FlakySource, SequenceSource, SourceAdapter, VecSource};
pub use window::{Applied, PageWindow};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
