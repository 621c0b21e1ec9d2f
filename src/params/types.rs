//! Load request types

use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::types::LoadType;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Load direction paired with its anchor key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "load_type", content = "key", rename_all = "snake_case")]
pub enum LoadKey<K> {
    /// Refresh around an optional anchor (defaults to position 0)
    Refresh(Option<K>),
    /// Extend backward from a previously returned `prev_key`
    Prepend(K),
    /// Extend forward from a previously returned `next_key`
    Append(K),
}

impl<K> LoadKey<K> {
    /// The load direction
    pub fn load_type(&self) -> LoadType {
        match self {
            Self::Refresh(_) => LoadType::Refresh,
            Self::Prepend(_) => LoadType::Prepend,
            Self::Append(_) => LoadType::Append,
        }
    }

    /// The anchor key, if any
    pub fn key(&self) -> Option<&K> {
        match self {
            Self::Refresh(key) => key.as_ref(),
            Self::Prepend(key) | Self::Append(key) => Some(key),
        }
    }
}

/// A validated load request
///
/// Immutable once built. Resubmitting the same params after a retryable
/// failure is always allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadParams<K> {
    #[serde(flatten)]
    key: LoadKey<K>,
    load_size: NonZeroUsize,
    page_size: NonZeroUsize,
}

impl<K> LoadParams<K> {
    /// Build params from already-validated parts
    pub fn from_parts(key: LoadKey<K>, load_size: NonZeroUsize, page_size: NonZeroUsize) -> Self {
        Self {
            key,
            load_size,
            page_size,
        }
    }

    /// Create a refresh request, optionally anchored at `key`
    pub fn refresh(key: Option<K>, load_size: usize, page_size: usize) -> Result<Self> {
        Self::checked(LoadKey::Refresh(key), load_size, page_size)
    }

    /// Create a prepend request from a previous key
    pub fn prepend(key: K, load_size: usize, page_size: usize) -> Result<Self> {
        Self::checked(LoadKey::Prepend(key), load_size, page_size)
    }

    /// Create an append request from a next key
    pub fn append(key: K, load_size: usize, page_size: usize) -> Result<Self> {
        Self::checked(LoadKey::Append(key), load_size, page_size)
    }

    /// Create a request when the load type is only known at runtime
    ///
    /// Fails with [`Error::MissingKey`] when a prepend or append has no key.
    pub fn new(
        load_type: LoadType,
        key: Option<K>,
        load_size: usize,
        page_size: usize,
    ) -> Result<Self> {
        let key = match (load_type, key) {
            (LoadType::Refresh, key) => LoadKey::Refresh(key),
            (LoadType::Prepend, Some(key)) => LoadKey::Prepend(key),
            (LoadType::Append, Some(key)) => LoadKey::Append(key),
            (load_type, None) => return Err(Error::missing_key(load_type)),
        };
        Self::checked(key, load_size, page_size)
    }

    /// Create the initial refresh for an engine configuration
    pub fn initial(key: Option<K>, config: &EngineConfig) -> Self {
        Self::from_parts(
            LoadKey::Refresh(key),
            config.initial_load_size,
            config.page_size,
        )
    }

    fn checked(key: LoadKey<K>, load_size: usize, page_size: usize) -> Result<Self> {
        Ok(Self::from_parts(
            key,
            non_zero(load_size, "load_size")?,
            non_zero(page_size, "page_size")?,
        ))
    }

    /// The load direction
    pub fn load_type(&self) -> LoadType {
        self.key.load_type()
    }

    /// The anchor key, if any
    pub fn key(&self) -> Option<&K> {
        self.key.key()
    }

    /// Direction and key together
    pub fn load_key(&self) -> &LoadKey<K> {
        &self.key
    }

    /// Requested number of items
    pub fn load_size(&self) -> usize {
        self.load_size.get()
    }

    /// Size of one page, bounding prepends
    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }
}

fn non_zero(value: usize, field: &str) -> Result<NonZeroUsize> {
    NonZeroUsize::new(value).ok_or_else(|| Error::invalid_size(field))
}
