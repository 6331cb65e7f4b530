//! File Cache - An embedded, file-backed cache
//!
//! Stores one file per entry with TTL expiration, a background sweeper,
//! and prefix/tag bulk invalidation. Ships a small HTTP server exposing it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;

pub use api::AppState;
pub use cache::{CacheInfo, CacheOptions, CacheStats, FileCache, Tag};
pub use config::Config;
pub use error::{CacheError, Result};
