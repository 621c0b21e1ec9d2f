//! Consumer-side window assembly
//!
//! A [`PageWindow`] stitches successive pages into one contiguous run of
//! items for a single generation. Results loaded under any other
//! generation are discarded, which is how a consumer stays safe when it
//! rebuilds its engine after the backing data changed.

use crate::engine::{EngineConfig, Item};
use crate::error::{Error, Result};
use crate::params::LoadParams;
use crate::result::Page;
use crate::types::{Generation, LoadType};
use std::collections::VecDeque;
use tracing::debug;

/// What happened to a page offered to a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The window was replaced
    Refreshed,
    /// The page was added at the front
    Prepended,
    /// The page was added at the back
    Appended,
    /// The page belonged to another generation and was dropped
    Stale,
}

/// Contiguous pages from one generation
#[derive(Debug, Clone)]
pub struct PageWindow<T> {
    generation: Option<Generation>,
    pages: VecDeque<Page<usize, Item<T>>>,
    max_pages: Option<usize>,
}

impl<T> Default for PageWindow<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageWindow<T> {
    /// Create an empty window that adopts the first refreshed generation
    pub fn new() -> Self {
        Self {
            generation: None,
            pages: VecDeque::new(),
            max_pages: None,
        }
    }

    /// Keep at most `max_pages` pages, dropping from the far edge
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages.max(1));
        self
    }

    /// Generation the window is anchored to
    pub fn generation(&self) -> Option<Generation> {
        self.generation
    }

    /// Drop all pages and anchor to `generation`
    pub fn reset(&mut self, generation: Generation) {
        debug!("Resetting window to {generation}");
        self.generation = Some(generation);
        self.pages.clear();
    }

    /// Offer a loaded page to the window
    ///
    /// A directional page must start or end exactly at the matching window
    /// edge; anything else is a [`Error::WindowMismatch`].
    pub fn apply(
        &mut self,
        generation: Generation,
        load_type: LoadType,
        page: Page<usize, Item<T>>,
    ) -> Result<Applied> {
        if let Some(current) = self.generation {
            if current != generation {
                debug!("Dropping {load_type} page from {generation}, window is on {current}");
                return Ok(Applied::Stale);
            }
        }

        match load_type {
            LoadType::Refresh => {
                self.generation = Some(generation);
                self.pages.clear();
                self.pages.push_back(page);
                Ok(Applied::Refreshed)
            }
            LoadType::Prepend => {
                let front = self
                    .pages
                    .front()
                    .ok_or_else(|| Error::window("prepend into an empty window"))?;
                let page_end = page.items_before() + page.len();
                if front.prev_key() != Some(&page_end) {
                    return Err(Error::window(format!(
                        "prepended page ends at {page_end}, window starts at {}",
                        front.items_before()
                    )));
                }
                self.pages.push_front(page);
                if self.over_limit() {
                    self.pages.pop_back();
                }
                Ok(Applied::Prepended)
            }
            LoadType::Append => {
                let back = self
                    .pages
                    .back()
                    .ok_or_else(|| Error::window("append into an empty window"))?;
                if back.next_key() != Some(&page.items_before()) {
                    return Err(Error::window(format!(
                        "appended page starts at {}, window ends at {}",
                        page.items_before(),
                        back.items_before() + back.len()
                    )));
                }
                self.pages.push_back(page);
                if self.over_limit() {
                    self.pages.pop_front();
                }
                Ok(Applied::Appended)
            }
        }
    }

    fn over_limit(&self) -> bool {
        self.max_pages.is_some_and(|max| self.pages.len() > max)
    }

    /// Loaded items in order
    pub fn items(&self) -> impl Iterator<Item = &Item<T>> {
        self.pages.iter().flat_map(|page| page.items().iter())
    }

    /// Loaded pages in order
    pub fn pages(&self) -> impl Iterator<Item = &Page<usize, Item<T>>> {
        self.pages.iter()
    }

    /// Number of loaded pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of loaded items
    pub fn len(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Check if no items are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key for extending the window backward
    pub fn prev_key(&self) -> Option<usize> {
        self.pages.front().and_then(|page| page.prev_key().copied())
    }

    /// Key for extending the window forward
    pub fn next_key(&self) -> Option<usize> {
        self.pages.back().and_then(|page| page.next_key().copied())
    }

    /// Unloaded items before the window
    pub fn placeholders_before(&self) -> usize {
        self.pages.front().map_or(0, Page::items_before)
    }

    /// Unloaded items after the window, if known
    pub fn placeholders_after(&self) -> Option<usize> {
        self.pages.back().map_or(Some(0), Page::items_after)
    }

    /// Params to extend the window backward
    pub fn prev_request(&self, config: &EngineConfig) -> Option<LoadParams<usize>> {
        self.pages.front().and_then(|page| page.prev_params(config))
    }

    /// Params to extend the window forward
    pub fn next_request(&self, config: &EngineConfig) -> Option<LoadParams<usize>> {
        self.pages.back().and_then(|page| page.next_params(config))
    }
}
