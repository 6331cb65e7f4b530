//! Cache Store Module
//!
//! The cache handle. Every operation takes the same mutex, consults the
//! [`ItemIndex`] and performs the matching file operation while still holding
//! it, so a slow disk stalls all callers.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{
    filename, CacheStats, ItemIndex, ItemRecord, DEFAULT_PREFIX, DEFAULT_SWEEP_INTERVAL_SECS,
    MIN_SWEEP_INTERVAL,
};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweeper_task;

// == Cache Options ==
/// Construction parameters for a [`FileCache`].
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Directory holding the entry files
    pub dir: PathBuf,
    /// TTL in seconds applied when a write does not give one, 0 = never expire
    pub default_ttl: u64,
    /// Prepended to every key to form its file name
    pub prefix: String,
    /// Pause between two sweeper passes, never below [`MIN_SWEEP_INTERVAL`]
    pub sweep_interval: Duration,
}

impl CacheOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            default_ttl: 0,
            prefix: DEFAULT_PREFIX.to_string(),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    pub fn default_ttl(mut self, secs: u64) -> Self {
        self.default_ttl = secs;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(MIN_SWEEP_INTERVAL);
        self
    }

    pub fn sweep_interval_secs(self, secs: u64) -> Self {
        self.sweep_interval(Duration::from_secs(secs))
    }
}

// == Cache Info ==
/// Introspection view of one entry.
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    pub file_name: PathBuf,
    /// Negative once the entry is stale but not yet evicted
    pub seconds_remaining: i64,
    /// File contents, lossily decoded; empty when the file can't be read
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
}

// == Cache State ==
/// Everything guarded by the cache lock.
#[derive(Debug, Default)]
pub(crate) struct CacheState {
    pub(crate) index: ItemIndex,
    pub(crate) stats: CacheStats,
}

impl CacheState {
    /// Looks up `key`, lazily evicting it when stale.
    async fn live_record(&mut self, key: &str) -> Option<&ItemRecord> {
        if self.index.get(key)?.is_expired() {
            self.evict_expired(key).await;
            return None;
        }
        self.index.get(key)
    }

    /// Drops a stale entry. File removal errors are logged, the record goes regardless.
    async fn evict_expired(&mut self, key: &str) {
        if let Some(record) = self.index.delete(key) {
            if let Err(err) = remove_entry_file(&record.file_name).await {
                warn!(
                    error = %err,
                    path = %record.file_name.display(),
                    "failed to remove expired cache file"
                );
            }
            self.stats.record_expirations(1);
            debug!(key, "evicted expired entry");
        }
    }

    // == Sweep Expired ==
    /// Evicts every stale entry. Returns the number of records pruned.
    pub(crate) async fn sweep_expired(&mut self) -> usize {
        let expired = self.index.expired_keys(Utc::now());
        for key in &expired {
            self.evict_expired(key).await;
        }
        expired.len()
    }

    /// Deletes the files and records for `keys`, stopping at the first
    /// filesystem error. Entries removed before the failure stay removed.
    pub(crate) async fn remove_keys(&mut self, keys: &[String]) -> Result<usize> {
        let mut removed = 0;
        for key in keys {
            let Some(record) = self.index.get(key) else {
                continue;
            };
            let path = record.file_name.clone();
            remove_entry_file(&path)
                .await
                .map_err(|err| CacheError::io("delete cache file", &path, err))?;
            self.index.delete(key);
            removed += 1;
        }
        Ok(removed)
    }
}

/// Removes a backing file, treating "already absent" as success.
pub(crate) async fn remove_entry_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

// == File Cache ==
/// Handle to a file-backed cache bound to one directory.
///
/// The sweeper started by the constructor stops on [`FileCache::shutdown`] or
/// when the handle is dropped.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
    prefix: String,
    default_ttl: u64,
    pub(crate) state: Arc<Mutex<CacheState>>,
    shutdown_tx: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl FileCache {
    // == Constructor ==
    /// Opens a cache in `dir`, creating it if needed. `prefix` defaults to `cache_`.
    ///
    /// Must be called from within a tokio runtime; the sweeper is spawned on it.
    pub async fn new(
        dir: impl Into<PathBuf>,
        default_ttl: u64,
        prefix: Option<&str>,
    ) -> Result<Self> {
        let mut options = CacheOptions::new(dir).default_ttl(default_ttl);
        if let Some(prefix) = prefix {
            options = options.prefix(prefix);
        }
        Self::with_options(options).await
    }

    pub async fn with_options(options: CacheOptions) -> Result<Self> {
        fs::create_dir_all(&options.dir)
            .await
            .map_err(|err| CacheError::io("create cache dir", &options.dir, err))?;

        let state = Arc::new(Mutex::new(CacheState::default()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let interval = options.sweep_interval.max(MIN_SWEEP_INTERVAL);
        let sweeper = spawn_sweeper_task(state.clone(), interval, shutdown_rx);

        info!(
            dir = %options.dir.display(),
            prefix = %options.prefix,
            default_ttl = options.default_ttl,
            sweep_interval_ms = interval.as_millis() as u64,
            "file cache opened"
        );

        Ok(Self {
            dir: options.dir,
            prefix: options.prefix,
            default_ttl: options.default_ttl,
            state,
            shutdown_tx,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Backing file path the cache uses for `key`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        filename::file_path(&self.dir, &self.prefix, key)
    }

    // == Set ==
    /// Writes `value` for `key`, replacing any previous entry.
    ///
    /// A `ttl` of `None` or `Some(0)` falls back to the default TTL; a
    /// resolved TTL of 0 never expires. If the write fails the previous
    /// record, if any, stays in place.
    pub async fn try_set<K: ToString>(
        &self,
        key: K,
        value: impl AsRef<[u8]>,
        ttl: Option<u64>,
    ) -> Result<()> {
        let key = key.to_string();
        let ttl = match ttl {
            Some(secs) if secs > 0 => secs,
            _ => self.default_ttl,
        };

        let mut state = self.state.lock().await;
        self.ensure_dir().await?;

        let path = self.file_path(&key);
        fs::write(&path, value.as_ref())
            .await
            .map_err(|err| CacheError::io("write cache file", &path, err))?;

        debug!(key = %key, ttl, "cache entry written");
        state.index.put(key, ItemRecord::new(path, ttl));
        Ok(())
    }

    pub async fn set<K: ToString>(
        &self,
        key: K,
        value: impl AsRef<[u8]>,
        ttl: Option<u64>,
    ) -> bool {
        self.try_set(key, value, ttl).await.is_ok()
    }

    async fn ensure_dir(&self) -> Result<()> {
        if fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| CacheError::io("create cache dir", &self.dir, err))
    }

    // == Get ==
    /// Returns the stored bytes, or `None` for absent, stale or unreadable entries.
    ///
    /// An entry whose file has vanished is dropped from the index.
    pub async fn get<K: ToString>(&self, key: K) -> Option<Vec<u8>> {
        let key = key.to_string();
        let mut state = self.state.lock().await;

        let Some(path) = state.live_record(&key).await.map(|r| r.file_name.clone()) else {
            state.stats.record_miss();
            return None;
        };

        match fs::read(&path).await {
            Ok(data) => {
                state.stats.record_hit();
                Some(data)
            }
            Err(err) => {
                warn!(
                    key = %key,
                    error = %err,
                    path = %path.display(),
                    "cache file unreadable, dropping entry"
                );
                state.index.delete(&key);
                state.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Whether `key` is cached and fresh. Evicts it when stale.
    pub async fn has<K: ToString>(&self, key: K) -> bool {
        let key = key.to_string();
        let mut state = self.state.lock().await;
        state.live_record(&key).await.is_some()
    }

    // == Delete ==
    /// Removes `key`. Absent keys and already-missing files are not errors.
    pub async fn try_del<K: ToString>(&self, key: K) -> Result<()> {
        let key = key.to_string();
        let mut state = self.state.lock().await;
        state.remove_keys(std::slice::from_ref(&key)).await?;
        Ok(())
    }

    pub async fn del<K: ToString>(&self, key: K) -> bool {
        self.try_del(key).await.is_ok()
    }

    // == Keys ==
    /// Snapshot of the tracked keys, unordered.
    pub async fn keys(&self) -> Vec<String> {
        self.state.lock().await.index.keys()
    }

    // == Info ==
    /// Metadata and contents for `key` without expiry checks.
    pub async fn info<K: ToString>(&self, key: K) -> Option<CacheInfo> {
        let key = key.to_string();
        let state = self.state.lock().await;
        let record = state.index.get(&key)?;

        let value = fs::read(&record.file_name)
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();

        Some(CacheInfo {
            file_name: record.file_name.clone(),
            seconds_remaining: record.seconds_remaining(),
            value,
            created_at: record.created_at,
            ttl_seconds: record.ttl_seconds,
        })
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.total_entries = state.index.len();
        stats
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.state.lock().await.index.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Shutdown ==
    /// Stops the sweeper and waits for it to finish. Later calls are no-ops.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.sweeper.lock().await.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "sweeper task ended abnormally");
            }
        }
    }
}
