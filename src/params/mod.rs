//! Load request module
//!
//! Describes *where* to load from and *how much*.
//!
//! # Overview
//!
//! The params module provides:
//! - `LoadParams` - A validated, immutable load request
//! - `LoadKey` - The load direction together with its anchor key
//!
//! A prepend or append without a continuation key cannot be built: the
//! typed constructors take the key by value, and the dynamic constructor
//! rejects a missing key with a validation error.

mod types;

pub use types::{LoadKey, LoadParams};

#[cfg(test)]
mod tests;
