//! Error types for the cache core

use std::sync::Arc;

use thiserror::Error;

/// Result type alias for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Opaque error produced by a caller-supplied loader, shared across every
/// waiter of a single-flight call so they observe the identical failure.
pub type LoaderError = Arc<dyn std::error::Error + Send + Sync>;

/// Cache core errors
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Lookup or delete of an absent key, with no loader configured to
    /// fall back to (or the loader path was not taken).
    #[error("key not found")]
    KeyNotFound,

    /// A caller-supplied loader returned an error and `allow_null_on_load_error`
    /// is not set, so the failure propagates to the `get` caller unchanged.
    ///
    /// Not wired up via `#[source]`: `thiserror`'s source-chaining only
    /// special-cases `Box<dyn Error>`, and this needs `Arc` instead of
    /// `Box` so every single-flight waiter can clone the same failure.
    #[error("loader failed: {0}")]
    Loader(LoaderError),
}
