//! Engine types
//!
//! Configuration, loaded items and planned index ranges.

use crate::error::{Error, Result};
use crate::types::Generation;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Configuration for paging engines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Items per prepend/append page
    pub page_size: NonZeroUsize,
    /// Items requested by the initial refresh
    pub initial_load_size: NonZeroUsize,
    /// Number of data variants cycled through by generation
    pub variant_count: NonZeroUsize,
    /// Simulated latency before every load, in milliseconds
    pub latency_ms: u64,
}

fn non_zero_or_one(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap_or(NonZeroUsize::MIN)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: non_zero_or_one(20),
            initial_load_size: non_zero_or_one(60),
            variant_count: non_zero_or_one(3),
            latency_ms: 0,
        }
    }
}

impl EngineConfig {
    /// Create a config with the given page and initial load sizes
    pub fn new(page_size: usize, initial_load_size: usize) -> Result<Self> {
        Ok(Self {
            page_size: NonZeroUsize::new(page_size).ok_or_else(|| Error::invalid_size("page_size"))?,
            initial_load_size: NonZeroUsize::new(initial_load_size)
                .ok_or_else(|| Error::invalid_size("initial_load_size"))?,
            ..Self::default()
        })
    }

    /// Set the number of generation variants
    pub fn with_variant_count(mut self, count: usize) -> Result<Self> {
        self.variant_count =
            NonZeroUsize::new(count).ok_or_else(|| Error::config("variant_count must be > 0"))?;
        Ok(self)
    }

    /// Set simulated latency
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }

    /// Simulated latency as a duration
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// An item loaded by a paging engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Item<T> {
    /// Absolute index in the dataset
    pub position: usize,
    /// Generation of the engine that loaded it
    pub generation: Generation,
    /// Data variant of that generation
    pub variant: usize,
    /// The value fetched from the source
    pub value: T,
}

/// An absolute index range planned for one load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRange {
    /// First absolute index
    pub start: usize,
    /// Number of items requested
    pub count: usize,
}

impl LoadRange {
    /// Exclusive end of the requested range
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.count)
    }
}
