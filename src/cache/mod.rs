//! Cache Module
//!
//! File-backed cache with TTL expiration, background sweeping and
//! prefix/tag invalidation. One regular file per entry lives directly in the
//! cache directory; all metadata stays in memory.

use std::time::Duration;

pub mod filename;
mod index;
mod invalidate;
mod record;
mod stats;
mod store;


// Re-export public types
pub use index::ItemIndex;
pub use invalidate::Tag;
pub use record::{ItemRecord, NO_EXPIRY_YEARS};
pub use stats::CacheStats;
pub use store::{CacheInfo, CacheOptions, FileCache};

pub(crate) use store::CacheState;

// == Public Constants ==
/// File name prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "cache_";

/// Seconds between two sweeper passes unless configured otherwise
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 1;

/// Shortest pause between sweeper passes; shorter intervals are raised to it
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);
