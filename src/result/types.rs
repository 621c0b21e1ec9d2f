//! Load result types

use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::params::{LoadKey, LoadParams};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Page
// ============================================================================

/// A successfully loaded page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<K, T> {
    items: Vec<T>,
    prev_key: Option<K>,
    next_key: Option<K>,
    items_before: usize,
    /// `None` when the dataset size is unknown
    items_after: Option<usize>,
}

impl<K, T> Page<K, T> {
    /// Create a page, checking its invariants
    ///
    /// An empty page is only valid for an explicitly empty dataset: both
    /// keys absent and no items on either side.
    pub fn new(
        items: Vec<T>,
        prev_key: Option<K>,
        next_key: Option<K>,
        items_before: usize,
        items_after: Option<usize>,
    ) -> Result<Self> {
        if items.is_empty() {
            if prev_key.is_some() || next_key.is_some() {
                return Err(Error::invariant(
                    "empty page must not carry a continuation key",
                ));
            }
            if items_before != 0 || items_after.unwrap_or(0) != 0 {
                return Err(Error::invariant(format!(
                    "empty page reports {items_before} items before and {items_after:?} after"
                )));
            }
        }

        Ok(Self {
            items,
            prev_key,
            next_key,
            items_before,
            items_after,
        })
    }

    /// The page for an empty dataset
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            prev_key: None,
            next_key: None,
            items_before: 0,
            items_after: Some(0),
        }
    }

    /// Items in order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Key for loading the page before this one
    pub fn prev_key(&self) -> Option<&K> {
        self.prev_key.as_ref()
    }

    /// Key for loading the page after this one
    pub fn next_key(&self) -> Option<&K> {
        self.next_key.as_ref()
    }

    /// Unfetched items before this page
    pub fn items_before(&self) -> usize {
        self.items_before
    }

    /// Unfetched items after this page, if the dataset size is known
    pub fn items_after(&self) -> Option<usize> {
        self.items_after
    }

    /// Number of items in the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if this page reaches the start of the dataset
    pub fn at_start(&self) -> bool {
        self.prev_key.is_none()
    }

    /// Check if this page reaches the end of the dataset
    pub fn at_end(&self) -> bool {
        self.next_key.is_none()
    }
}

impl<K: Clone, T> Page<K, T> {
    /// Params for the page before this one, `None` at the start boundary
    pub fn prev_params(&self, config: &EngineConfig) -> Option<LoadParams<K>> {
        self.prev_key.clone().map(|key| {
            LoadParams::from_parts(LoadKey::Prepend(key), config.page_size, config.page_size)
        })
    }

    /// Params for the page after this one, `None` at the end boundary
    pub fn next_params(&self, config: &EngineConfig) -> Option<LoadParams<K>> {
        self.next_key.clone().map(|key| {
            LoadParams::from_parts(LoadKey::Append(key), config.page_size, config.page_size)
        })
    }
}

// ============================================================================
// Load Error
// ============================================================================

/// Why a load failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadErrorKind {
    /// A fault armed through the engine's fault policy
    #[error("injected transient fault")]
    InjectedFault,
    /// The source adapter failed to fetch
    #[error("{message}")]
    Source {
        /// Adapter error message
        message: String,
    },
}

/// A failed load, returned as data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    /// Whether identical params may be resubmitted
    pub retryable: bool,
    /// The underlying cause
    pub cause: LoadErrorKind,
}

impl LoadError {
    /// A transient failure
    pub fn retryable(cause: LoadErrorKind) -> Self {
        Self {
            retryable: true,
            cause,
        }
    }

    /// A permanent failure that must be surfaced
    pub fn permanent(cause: LoadErrorKind) -> Self {
        Self {
            retryable: false,
            cause,
        }
    }

    /// Classify an adapter error
    pub fn from_source(error: &Error) -> Self {
        Self {
            retryable: error.is_retryable(),
            cause: LoadErrorKind::Source {
                message: error.to_string(),
            },
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.retryable {
            "retryable"
        } else {
            "permanent"
        };
        write!(f, "load failed ({kind}): {}", self.cause)
    }
}

impl std::error::Error for LoadError {}

// ============================================================================
// Load Result
// ============================================================================

/// Outcome of one load submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LoadResult<K, T> {
    /// A page of items
    Page(Page<K, T>),
    /// A failed load
    Error(LoadError),
}

impl<K, T> LoadResult<K, T> {
    /// Check if this is a page
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Check if this is an error that may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Error(e) if e.retryable)
    }

    /// The page, if any
    pub fn page(&self) -> Option<&Page<K, T>> {
        match self {
            Self::Page(page) => Some(page),
            Self::Error(_) => None,
        }
    }

    /// The error, if any
    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Page(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Convert into the page, or the load error
    pub fn into_page(self) -> std::result::Result<Page<K, T>, LoadError> {
        match self {
            Self::Page(page) => Ok(page),
            Self::Error(error) => Err(error),
        }
    }
}

impl<K, T> From<Page<K, T>> for LoadResult<K, T> {
    fn from(page: Page<K, T>) -> Self {
        Self::Page(page)
    }
}

impl<K, T> From<LoadError> for LoadResult<K, T> {
    fn from(error: LoadError) -> Self {
        Self::Error(error)
    }
}
