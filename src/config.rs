//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::{CacheOptions, DEFAULT_PREFIX};

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one file per cache entry
    pub cache_dir: PathBuf,
    /// File name prefix prepended to every key
    pub prefix: String,
    /// Default TTL in seconds, 0 = entries never expire
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Cache directory (default: runtime/cache)
    /// - `CACHE_PREFIX` - File name prefix (default: cache_)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 0, never expire)
    /// - `SWEEP_INTERVAL` - Sweeper frequency in seconds (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.prefix),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Builds the cache options described by this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::new(&self.cache_dir)
            .default_ttl(self.default_ttl)
            .prefix(self.prefix.clone())
            .sweep_interval_secs(self.sweep_interval)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("runtime/cache"),
            prefix: DEFAULT_PREFIX.to_string(),
            default_ttl: 0,
            sweep_interval: 1,
            server_port: 3000,
        }
    }
}
