//! Error types for window-pager
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Transient load failures are NOT reported through this type: the engine
//! returns them as [`LoadResult::Error`](crate::result::LoadResult) values so
//! callers can retry uniformly. An `Err(Error)` out of a load always aborts.

use crate::types::LoadType;
use thiserror::Error;

/// The main error type for window-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("{load_type} load requires a key")]
    MissingKey { load_type: LoadType },

    #[error("Invalid load size: '{field}' must be greater than zero")]
    InvalidLoadSize { field: String },

    #[error("{load_type} key {key} is out of range: {reason}")]
    KeyOutOfRange {
        load_type: LoadType,
        key: usize,
        reason: String,
    },

    // ============================================================================
    // Invariant Errors
    // ============================================================================
    #[error("Page invariant violated: {message}")]
    Invariant { message: String },

    #[error("Window mismatch: {message}")]
    WindowMismatch { message: String },

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    #[error("Source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Source error: {message}")]
    Source { message: String },

    // ============================================================================
    // Caller Errors
    // ============================================================================
    #[error("Load timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a missing key error
    pub fn missing_key(load_type: LoadType) -> Self {
        Self::MissingKey { load_type }
    }

    /// Create an invalid load size error
    pub fn invalid_size(field: impl Into<String>) -> Self {
        Self::InvalidLoadSize {
            field: field.into(),
        }
    }

    /// Create a key out of range error
    pub fn out_of_range(load_type: LoadType, key: usize, reason: impl Into<String>) -> Self {
        Self::KeyOutOfRange {
            load_type,
            key,
            reason: reason.into(),
        }
    }

    /// Create an invariant error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }

    /// Create a window mismatch error
    pub fn window(message: impl Into<String>) -> Self {
        Self::WindowMismatch {
            message: message.into(),
        }
    }

    /// Create a transient fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a permanent source error
    pub fn source_error(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Fetch { .. }
                | Error::SourceUnavailable { .. }
                | Error::Timeout { .. }
                | Error::Io(_)
        )
    }

    /// Check if this error is a malformed request
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingKey { .. } | Error::InvalidLoadSize { .. } | Error::KeyOutOfRange { .. }
        )
    }
}

/// Result type alias for window-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_key(LoadType::Append);
        assert_eq!(err.to_string(), "append load requires a key");

        let err = Error::invalid_size("page_size");
        assert_eq!(
            err.to_string(),
            "Invalid load size: 'page_size' must be greater than zero"
        );

        let err = Error::out_of_range(LoadType::Append, 70, "dataset has 60 items");
        assert_eq!(
            err.to_string(),
            "append key 70 is out of range: dataset has 60 items"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::fetch("flaky").is_retryable());
        assert!(Error::SourceUnavailable {
            message: "down".into()
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());

        assert!(!Error::source_error("corrupt").is_retryable());
        assert!(!Error::missing_key(LoadType::Prepend).is_retryable());
        assert!(!Error::invariant("bad").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::missing_key(LoadType::Prepend).is_validation());
        assert!(Error::invalid_size("load_size").is_validation());
        assert!(!Error::invariant("bad").is_validation());
        assert!(!Error::fetch("flaky").is_validation());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
