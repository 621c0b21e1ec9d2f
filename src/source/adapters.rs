//! Source adapter implementations

use super::types::SourceAdapter;
use crate::error::{Error, Result};
use crate::types::DatasetSize;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

// ============================================================================
// In-Memory Source
// ============================================================================

/// Items held in memory
///
/// Replacing the contents models a mutation of the backing store; consumers
/// should create a new engine generation afterwards.
#[derive(Debug)]
pub struct VecSource<T> {
    items: RwLock<Arc<Vec<T>>>,
}

impl<T> VecSource<T> {
    /// Create a source over `items`
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(Arc::new(items)),
        }
    }

    /// Replace all items
    pub async fn replace(&self, items: Vec<T>) {
        let mut guard = self.items.write().await;
        *guard = Arc::new(items);
    }

    /// The current contents
    ///
    /// Later calls to [`replace`](Self::replace) do not affect a snapshot
    /// already taken.
    pub async fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&*self.items.read().await)
    }

    /// Current number of items
    pub async fn len(&self) -> usize {
        self.snapshot().await.len()
    }

    /// Check if the source has no items
    pub async fn is_empty(&self) -> bool {
        self.snapshot().await.is_empty()
    }
}

impl<T> Default for VecSource<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> FromIterator<T> for VecSource<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> SourceAdapter for VecSource<T> {
    type Item = T;

    async fn fetch(&self, start: usize, count: usize) -> Result<Vec<T>> {
        let items = self.snapshot().await;
        let start = start.min(items.len());
        let end = start.saturating_add(count).min(items.len());
        Ok(items[start..end].to_vec())
    }

    async fn dataset_size(&self) -> Result<DatasetSize> {
        Ok(DatasetSize::Known(self.len().await))
    }
}

// ============================================================================
// Synthetic Sequence Source
// ============================================================================

/// A synthetic dataset of `"<label> N"` strings
///
/// With no size the sequence is unbounded and the engine never reports an
/// end boundary for it.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    label: String,
    size: Option<usize>,
}

impl SequenceSource {
    /// Create a bounded sequence of `size` items
    pub fn new(size: usize) -> Self {
        Self {
            label: "item".to_string(),
            size: Some(size),
        }
    }

    /// Create an unbounded sequence
    pub fn unbounded() -> Self {
        Self {
            label: "item".to_string(),
            size: None,
        }
    }

    /// Set the item label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Render the item at `index`
    pub fn item(&self, index: usize) -> String {
        format!("{} {index}", self.label)
    }
}

#[async_trait]
impl SourceAdapter for SequenceSource {
    type Item = String;

    async fn fetch(&self, start: usize, count: usize) -> Result<Vec<String>> {
        let end = start.saturating_add(count);
        let end = self.size.map_or(end, |size| end.min(size));
        Ok((start..end).map(|i| self.item(i)).collect())
    }

    async fn dataset_size(&self) -> Result<DatasetSize> {
        Ok(DatasetSize::from(self.size))
    }
}

// ============================================================================
// Flaky Source
// ============================================================================

/// Wraps an adapter and fails queued fetches
///
/// Each queued error fails exactly one fetch, in order. Size queries are
/// always forwarded.
#[derive(Debug)]
pub struct FlakySource<S> {
    inner: S,
    pending: Mutex<VecDeque<Error>>,
}

impl<S> FlakySource<S> {
    /// Wrap `inner` with no pending failures
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue an error for the next unfailed fetch
    pub async fn inject(&self, error: Error) {
        self.pending.lock().await.push_back(error);
    }

    /// Fail the next `n` fetches with a retryable error
    pub async fn fail_next(&self, n: usize) {
        let mut pending = self.pending.lock().await;
        for _ in 0..n {
            pending.push_back(Error::fetch("simulated transient failure"));
        }
    }

    /// Number of queued failures
    pub async fn pending_failures(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// The wrapped adapter
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SourceAdapter> SourceAdapter for FlakySource<S> {
    type Item = S::Item;

    async fn fetch(&self, start: usize, count: usize) -> Result<Vec<S::Item>> {
        if let Some(error) = self.pending.lock().await.pop_front() {
            debug!("Failing fetch of {count} items at {start}: {error}");
            return Err(error);
        }
        self.inner.fetch(start, count).await
    }

    async fn dataset_size(&self) -> Result<DatasetSize> {
        self.inner.dataset_size().await
    }
}
