//! Engine factory
//!
//! Owns the generation counter. Every call to [`EngineFactory::create`]
//! yields a fresh engine stamped with the next generation, which is how a
//! consumer discards its window after the backing data changes.

use super::types::EngineConfig;
use super::PagingEngine;
use crate::fault::{FaultPolicy, NoFaults};
use crate::source::SourceAdapter;
use crate::types::Generation;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Creates paging engines with increasing generations
pub struct EngineFactory<S> {
    source: Arc<S>,
    faults: Arc<dyn FaultPolicy>,
    config: EngineConfig,
    next_generation: AtomicU64,
}

impl<S: SourceAdapter> EngineFactory<S> {
    /// Create a factory with no fault injection
    pub fn new(source: Arc<S>, config: EngineConfig) -> Self {
        Self {
            source,
            faults: Arc::new(NoFaults),
            config,
            next_generation: AtomicU64::new(0),
        }
    }

    /// Set the fault policy shared by all engines from this factory
    #[must_use]
    pub fn with_faults(mut self, faults: Arc<dyn FaultPolicy>) -> Self {
        self.faults = faults;
        self
    }

    /// Start numbering generations at `first`
    #[must_use]
    pub fn starting_at(self, first: Generation) -> Self {
        self.next_generation.store(first.get(), Ordering::SeqCst);
        self
    }

    /// Create an engine for the next generation
    pub fn create(&self) -> (PagingEngine<S>, Generation) {
        let generation = Generation(self.next_generation.fetch_add(1, Ordering::SeqCst));
        let engine = PagingEngine::new(
            Arc::clone(&self.source),
            Arc::clone(&self.faults),
            self.config.clone(),
            generation,
        );
        info!(
            "Created paging engine for {generation} (variant {})",
            engine.variant()
        );
        (engine, generation)
    }

    /// The most recently issued generation
    pub fn current_generation(&self) -> Option<Generation> {
        self.next_generation
            .load(Ordering::SeqCst)
            .checked_sub(1)
            .map(Generation)
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared source adapter
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

impl<S> std::fmt::Debug for EngineFactory<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineFactory")
            .field("config", &self.config)
            .field("next_generation", &self.next_generation)
            .finish_non_exhaustive()
    }
}
