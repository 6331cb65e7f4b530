//! Item Record Module
//!
//! Defines the in-memory metadata kept for each cached key.

use std::path::PathBuf;

use chrono::{DateTime, Months, Utc};

/// Years added to the creation time to encode "never expires".
pub const NO_EXPIRY_YEARS: u32 = 100;

// == Item Record ==
/// Metadata for a single cache entry. The value itself lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// Path of the backing file
    pub file_name: PathBuf,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// After this instant the entry is stale
    pub expires_at: DateTime<Utc>,
    /// TTL requested at write time, 0 = no expiration
    pub ttl_seconds: u64,
}

impl ItemRecord {
    // == Constructor ==
    /// Creates a record for a file written now.
    ///
    /// A TTL of 0 places the expiration 100 years ahead.
    pub fn new(file_name: PathBuf, ttl_seconds: u64) -> Self {
        Self::created_at(file_name, ttl_seconds, Utc::now())
    }

    /// Creates a record as if written at `now`.
    pub fn created_at(file_name: PathBuf, ttl_seconds: u64, now: DateTime<Utc>) -> Self {
        Self {
            file_name,
            created_at: now,
            expires_at: expiration_for(now, ttl_seconds),
            ttl_seconds,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is stale strictly after its expiration instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether this record uses the no-expiry sentinel.
    pub fn never_expires(&self) -> bool {
        self.ttl_seconds == 0
    }

    // == Time To Live ==
    /// Seconds left until expiration, negative once stale.
    pub fn seconds_remaining(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

fn expiration_for(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    if ttl_seconds == 0 {
        return now
            .checked_add_months(Months::new(NO_EXPIRY_YEARS * 12))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
    }
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
