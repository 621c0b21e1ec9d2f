//! Common types used throughout window-pager
//!
//! This module contains shared type definitions used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Load Type
// ============================================================================

/// Direction of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadType {
    /// Initial or re-anchoring load, no directional continuation
    Refresh,
    /// Extend toward lower indices from a previous key
    Prepend,
    /// Extend toward higher indices from a next key
    Append,
}

impl LoadType {
    /// Whether this load type requires a continuation key
    pub fn requires_key(self) -> bool {
        !matches!(self, Self::Refresh)
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Refresh => "refresh",
            Self::Prepend => "prepend",
            Self::Append => "append",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Identifier of one engine instantiation
///
/// Results loaded under one generation must never be merged into a window
/// anchored at another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// The raw counter value
    pub fn get(self) -> u64 {
        self.0
    }

    /// The data variant selected for this generation out of `variant_count`
    pub fn variant(self, variant_count: usize) -> usize {
        if variant_count == 0 {
            return 0;
        }
        (self.0 % variant_count as u64) as usize
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

// ============================================================================
// Dataset Size
// ============================================================================

/// Total size of the dataset as reported by a source adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSize {
    /// Exact item count
    Known(usize),
    /// Unbounded or not yet known
    Unbounded,
}

impl DatasetSize {
    /// The exact count, if known
    pub fn known(self) -> Option<usize> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unbounded => None,
        }
    }

    /// Check if the size is known
    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<Option<usize>> for DatasetSize {
    fn from(size: Option<usize>) -> Self {
        size.map_or(Self::Unbounded, Self::Known)
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff between retried loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_type_requires_key() {
        assert!(!LoadType::Refresh.requires_key());
        assert!(LoadType::Prepend.requires_key());
        assert!(LoadType::Append.requires_key());
    }

    #[test]
    fn test_load_type_serde() {
        let json = serde_json::to_string(&LoadType::Prepend).unwrap();
        assert_eq!(json, "\"prepend\"");
        let parsed: LoadType = serde_json::from_str("\"append\"").unwrap();
        assert_eq!(parsed, LoadType::Append);
    }

    #[test]
    fn test_generation_variant() {
        assert_eq!(Generation(0).variant(3), 0);
        assert_eq!(Generation(4).variant(3), 1);
        assert_eq!(Generation(5).variant(3), 2);
        assert_eq!(Generation(7).variant(0), 0);
        assert_eq!(Generation(2).to_string(), "gen-2");
    }

    #[test]
    fn test_dataset_size() {
        assert_eq!(DatasetSize::Known(60).known(), Some(60));
        assert_eq!(DatasetSize::Unbounded.known(), None);
        assert_eq!(DatasetSize::from(None), DatasetSize::Unbounded);
        assert!(DatasetSize::from(Some(3)).is_known());
    }
}
