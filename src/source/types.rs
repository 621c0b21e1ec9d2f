//! Source adapter trait

use crate::error::Result;
use crate::types::DatasetSize;
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches items for an absolute index range
///
/// Implementations own the backing store (database, file, network call).
/// Errors whose [`is_retryable`](crate::Error::is_retryable) is `true` are
/// surfaced to callers as retryable load errors.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Item type produced by this adapter
    type Item: Send;

    /// Fetch up to `count` items starting at `start`, in order
    async fn fetch(&self, start: usize, count: usize) -> Result<Vec<Self::Item>>;

    /// Current total size of the dataset
    async fn dataset_size(&self) -> Result<DatasetSize>;
}

#[async_trait]
impl<S: SourceAdapter + ?Sized> SourceAdapter for Arc<S> {
    type Item = S::Item;

    async fn fetch(&self, start: usize, count: usize) -> Result<Vec<Self::Item>> {
        (**self).fetch(start, count).await
    }

    async fn dataset_size(&self) -> Result<DatasetSize> {
        (**self).dataset_size().await
    }
}
