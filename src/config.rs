//! Configuration for the paging simulator
//!
//! A YAML document describing the dataset, the engine and the caller-side
//! retry policy. Every section is optional.
//!
//! ```yaml
//! dataset:
//!   size: 60
//!   label: item
//! engine:
//!   page_size: 20
//!   initial_load_size: 60
//!   variant_count: 3
//!   latency_ms: 0
//! retry:
//!   max_retries: 3
//!   backoff_type: exponential
//! ```

use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::source::SequenceSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete simulator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagerConfig {
    /// Synthetic dataset definition
    pub dataset: DatasetConfig,

    /// Engine settings
    pub engine: EngineConfig,

    /// Caller-side retry policy
    pub retry: RetryPolicy,
}

impl PagerConfig {
    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.dataset.label.trim().is_empty() {
            return Err(Error::config("dataset.label must not be empty"));
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(Error::config(format!(
                "retry.initial_backoff_ms ({}) exceeds retry.max_backoff_ms ({})",
                self.retry.initial_backoff_ms, self.retry.max_backoff_ms
            )));
        }
        Ok(())
    }

    /// Build the synthetic source described by `dataset`
    pub fn source(&self) -> SequenceSource {
        let source = match self.dataset.size {
            Some(size) => SequenceSource::new(size),
            None => SequenceSource::unbounded(),
        };
        source.with_label(self.dataset.label.clone())
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// Synthetic dataset definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Number of items; `null` for an unbounded dataset
    pub size: Option<usize>,

    /// Label rendered before each index
    pub label: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            size: Some(60),
            label: "item".to_string(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<PagerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Parse and validate a configuration document
pub fn load_config_from_str(content: &str) -> Result<PagerConfig> {
    let config: PagerConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
