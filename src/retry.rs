//! Caller-side retry and timeout helpers
//!
//! The engine never retries on its own. These helpers resubmit identical
//! params after retryable load errors, with configurable backoff, and put
//! a deadline on a single load.

use crate::engine::{Item, PageResult, PagingEngine};
use crate::error::{Error, Result};
use crate::params::LoadParams;
use crate::result::{LoadResult, Page};
use crate::source::SourceAdapter;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of resubmissions after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub initial_backoff_ms: u64,
    /// Upper bound on any delay, in milliseconds
    pub max_backoff_ms: u64,
    /// How the delay grows between attempts
    pub backoff_type: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 60_000,
            backoff_type: BackoffType::Exponential,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set max retries
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set backoff configuration
    #[must_use]
    pub fn with_backoff(
        mut self,
        backoff_type: BackoffType,
        initial: Duration,
        max: Duration,
    ) -> Self {
        self.backoff_type = backoff_type;
        self.initial_backoff_ms = initial.as_millis() as u64;
        self.max_backoff_ms = max.as_millis() as u64;
        self
    }

    /// Delay before retry number `attempt` (zero-based)
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = Duration::from_millis(self.initial_backoff_ms);
        let delay = match self.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };

        std::cmp::min(delay, Duration::from_millis(self.max_backoff_ms))
    }
}

/// Load, resubmitting identical params after retryable errors
///
/// Returns the first page, the first permanent error, or the last
/// retryable error once retries are exhausted.
pub async fn load_with_retry<S: SourceAdapter>(
    engine: &PagingEngine<S>,
    params: &LoadParams<usize>,
    policy: &RetryPolicy,
) -> Result<PageResult<S::Item>> {
    let mut attempt = 0;

    loop {
        let result = engine.load(params).await?;
        match &result {
            LoadResult::Error(error) if error.retryable && attempt < policy.max_retries => {
                let delay = policy.calculate_backoff(attempt);
                warn!(
                    "{} load failed, attempt {}/{}, retrying in {:?}: {}",
                    params.load_type(),
                    attempt + 1,
                    policy.max_retries + 1,
                    delay,
                    error.cause
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            _ => {
                if attempt > 0 && result.is_page() {
                    debug!("{} load succeeded after {attempt} retries", params.load_type());
                }
                return Ok(result);
            }
        }
    }
}

/// Load a page with retries, turning any remaining failure into an error
pub async fn load_page<S: SourceAdapter>(
    engine: &PagingEngine<S>,
    params: &LoadParams<usize>,
    policy: &RetryPolicy,
) -> Result<Page<usize, Item<S::Item>>> {
    match load_with_retry(engine, params, policy).await? {
        LoadResult::Page(page) => Ok(page),
        LoadResult::Error(error) if error.retryable => Err(Error::MaxRetriesExceeded {
            max_retries: policy.max_retries,
        }),
        LoadResult::Error(error) => Err(Error::source_error(error.to_string())),
    }
}

/// Load once with a deadline
///
/// The abandoned load leaves no engine state behind.
pub async fn load_with_timeout<S: SourceAdapter>(
    engine: &PagingEngine<S>,
    params: &LoadParams<usize>,
    timeout: Duration,
) -> Result<PageResult<S::Item>> {
    tokio::time::timeout(timeout, engine.load(params))
        .await
        .map_err(|_| Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        })?
}
