//! Paging engine module
//!
//! Turns load requests into load results.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PagingEngine` - Computes index ranges, calls the source adapter and
//!   derives continuation keys and boundary counts
//! - `EngineFactory` - Creates engine instances and assigns generations
//! - `EngineConfig` - Page sizes, variant count and simulated latency
//!
//! # Range rules
//!
//! | Load    | Start position                          | Count                   |
//! |---------|-----------------------------------------|-------------------------|
//! | Refresh | `max(0, key - load_size / 2)`           | `load_size`             |
//! | Prepend | `key - min(key, page_size)`             | `min(key, page_size)`   |
//! | Append  | `key`                                   | `load_size`             |
//!
//! Keys and counts are always derived from the range that was actually
//! fetched, clamped to the dataset size.

mod factory;
mod types;

pub use factory::EngineFactory;
pub use types::{EngineConfig, Item, LoadRange};

use crate::error::{Error, Result};
use crate::fault::FaultPolicy;
use crate::params::{LoadKey, LoadParams};
use crate::result::{LoadError, LoadErrorKind, LoadResult, Page};
use crate::source::SourceAdapter;
use crate::types::{DatasetSize, Generation, LoadType};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result type of a positional load
pub type PageResult<T> = LoadResult<usize, Item<T>>;

/// A paging engine bound to one generation
///
/// The engine stores no items and no per-load state. Dropping an in-flight
/// `load` future leaves nothing to clean up.
pub struct PagingEngine<S> {
    source: Arc<S>,
    faults: Arc<dyn FaultPolicy>,
    config: EngineConfig,
    generation: Generation,
    variant: usize,
}

impl<S: SourceAdapter> PagingEngine<S> {
    /// Create an engine for `generation`
    ///
    /// Prefer [`EngineFactory::create`], which assigns generations.
    pub fn new(
        source: Arc<S>,
        faults: Arc<dyn FaultPolicy>,
        config: EngineConfig,
        generation: Generation,
    ) -> Self {
        let variant = generation.variant(config.variant_count.get());
        Self {
            source,
            faults,
            config,
            generation,
            variant,
        }
    }

    /// Generation this engine was created for
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Data variant selected for this engine's generation
    pub fn variant(&self) -> usize {
        self.variant
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The source adapter
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Initial refresh params for this engine's configuration
    pub fn initial_params(&self, anchor: Option<usize>) -> LoadParams<usize> {
        LoadParams::initial(anchor, &self.config)
    }

    /// Load one page
    ///
    /// Malformed requests and page invariant violations return `Err`.
    /// Injected faults and adapter failures return `Ok(LoadResult::Error)`.
    /// Resubmitting the same params is only useful when the error is
    /// `retryable`; a permanent source error will fail again.
    pub async fn load(&self, params: &LoadParams<usize>) -> Result<PageResult<S::Item>> {
        debug!(
            "Loading {} (key {:?}, size {}) on {}",
            params.load_type(),
            params.key(),
            params.load_size(),
            self.generation
        );

        if self.config.latency_ms > 0 {
            tokio::time::sleep(self.config.latency()).await;
        }

        let size = match self.source.dataset_size().await {
            Ok(size) => size,
            Err(e) => return Ok(self.source_failure(&e)),
        };

        let range = plan_range(params, size)?;

        if self.faults.take_fault() {
            warn!(
                "Injected fault on {} load at {} ({})",
                params.load_type(),
                range.start,
                self.generation
            );
            return Ok(LoadError::retryable(LoadErrorKind::InjectedFault).into());
        }

        // Unbounded sources get one item of lookahead so an end boundary is
        // only reported once it has been observed.
        let fetch_count = match size {
            DatasetSize::Known(_) => range.count,
            DatasetSize::Unbounded => range.count.saturating_add(1),
        };

        let values = match self.source.fetch(range.start, fetch_count).await {
            Ok(values) => values,
            Err(e) => return Ok(self.source_failure(&e)),
        };

        if let Some(error) = stale_size(range, size, values.len()) {
            warn!("Empty read on {}: {}", self.generation, error.cause);
            return Ok(error.into());
        }

        let page = self.build_page(params, range, size, values)?;
        debug!(
            "Loaded {} items at {} (prev {:?}, next {:?})",
            page.len(),
            range.start,
            page.prev_key(),
            page.next_key()
        );
        Ok(page.into())
    }

    /// Anchor for a refresh centered on the item at `index_in_page`
    ///
    /// Returns `None` if the index is outside the page.
    pub fn refresh_key(
        &self,
        index_in_page: usize,
        page: &Page<usize, Item<S::Item>>,
    ) -> Option<usize> {
        page.items().get(index_in_page).map(|item| item.position)
    }

    fn source_failure(&self, error: &Error) -> PageResult<S::Item> {
        warn!("Source failed on {}: {error}", self.generation);
        LoadError::from_source(error).into()
    }

    fn build_page(
        &self,
        params: &LoadParams<usize>,
        range: LoadRange,
        size: DatasetSize,
        mut values: Vec<S::Item>,
    ) -> Result<Page<usize, Item<S::Item>>> {
        let start = range.start;
        let (next_key, items_after) = match size {
            DatasetSize::Known(total) => {
                values.truncate(range.count.min(total.saturating_sub(start)));
                let end = start + values.len();
                ((end < total).then_some(end), Some(total - end))
            }
            DatasetSize::Unbounded => {
                let more = values.len() > range.count;
                values.truncate(range.count);
                if values.is_empty() && start > 0 {
                    return Err(Error::out_of_range(
                        params.load_type(),
                        params.key().copied().unwrap_or_default(),
                        format!("no items at or after position {start}"),
                    ));
                }
                let end = start + values.len();
                if more {
                    (Some(end), None)
                } else {
                    (None, Some(0))
                }
            }
        };
        let prev_key = (start > 0).then_some(start);

        let items = values
            .into_iter()
            .enumerate()
            .map(|(offset, value)| Item {
                position: start + offset,
                generation: self.generation,
                variant: self.variant,
                value,
            })
            .collect();

        let page = Page::new(items, prev_key, next_key, start, items_after)?;
        if let DatasetSize::Known(total) = size {
            debug_assert_eq!(
                page.items_before() + page.len() + page.items_after().unwrap_or(0),
                total
            );
        }
        Ok(page)
    }
}

impl<S> std::fmt::Debug for PagingEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagingEngine")
            .field("generation", &self.generation)
            .field("variant", &self.variant)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A retryable error when a known-size source returned nothing for a
/// range it claims to hold
///
/// This happens when the data shrank between `dataset_size` and `fetch`.
/// Non-empty short reads are accepted and keyed from the items returned.
fn stale_size(range: LoadRange, size: DatasetSize, fetched: usize) -> Option<LoadError> {
    let DatasetSize::Known(total) = size else {
        return None;
    };
    let expected = range.count.min(total.saturating_sub(range.start));
    (fetched == 0 && expected > 0).then(|| {
        LoadError::retryable(LoadErrorKind::Source {
            message: format!(
                "source reported {total} items but returned none at {}",
                range.start
            ),
        })
    })
}

/// Compute the absolute range a load covers
///
/// Refresh anchors are centered using floor division and clamped into
/// `[0, size)`. A prepend from 0, or a directional key past a known end,
/// is a malformed request.
pub fn plan_range(params: &LoadParams<usize>, size: DatasetSize) -> Result<LoadRange> {
    let load_size = params.load_size();
    match *params.load_key() {
        LoadKey::Refresh(key) => {
            let start = key.unwrap_or(0).saturating_sub(load_size / 2);
            let start = match size {
                DatasetSize::Known(total) => start.min(total.saturating_sub(1)),
                DatasetSize::Unbounded => start,
            };
            Ok(LoadRange {
                start,
                count: load_size,
            })
        }
        LoadKey::Prepend(key) => {
            if key == 0 {
                return Err(Error::out_of_range(
                    LoadType::Prepend,
                    key,
                    "no items before position 0",
                ));
            }
            if let DatasetSize::Known(total) = size {
                if key > total {
                    return Err(Error::out_of_range(
                        LoadType::Prepend,
                        key,
                        format!("dataset has {total} items"),
                    ));
                }
            }
            let count = key.min(params.page_size());
            Ok(LoadRange {
                start: key - count,
                count,
            })
        }
        LoadKey::Append(key) => {
            if let DatasetSize::Known(total) = size {
                if key >= total {
                    return Err(Error::out_of_range(
                        LoadType::Append,
                        key,
                        format!("dataset has {total} items"),
                    ));
                }
            }
            Ok(LoadRange {
                start: key,
                count: load_size,
            })
        }
    }
}
