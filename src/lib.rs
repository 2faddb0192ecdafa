//! A concurrency-safe, in-process key/value cache with per-entry
//! time-based expiration, lifecycle observer callbacks, and a pluggable
//! read-through loader with single-flight deduplication of concurrent
//! misses.
//!
//! The core is [`Table`]: a named, independently synchronised collection of
//! [`Entry`] values. A [`TableRegistry`] hands out shared `Table` instances
//! by name, and an optional background janitor sweeps a table's entries on
//! a timer. See `cachectl` (this crate's demo binary) for an end-to-end
//! example wiring these together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
mod janitor;
pub mod log;
pub mod registry;
mod singleflight;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;

pub use entry::Entry;
pub use error::{CacheError, CacheResult, LoaderError};
pub use registry::TableRegistry;
pub use table::{AddedObserver, DeleteObserver, Loader, LoaderOutcome, Table};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Set up a `tracing` subscriber for the `cachectl` binary. `format`
/// selects between human-readable text (the default) and structured JSON.
pub fn setup_tracing(level: &str, format: Option<&str>) -> CacheResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber.with(fmt::layer().json()).init();
        }
        _ => {
            subscriber.with(fmt::layer()).init();
        }
    }

    Ok(())
}
