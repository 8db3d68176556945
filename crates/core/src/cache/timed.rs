//! Time-boxed cache over a [`Storage`] backend.
//!
//! Expiration is checked lazily: nothing sweeps the store in the background,
//! and a stale or unreadable entry is evicted by the read that finds it.

use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::clock::SystemClock;
use super::serialization::{deserialize_entry, serialize_entry, CacheEntry};
use super::{Clock, Storage};

/// Key-value cache with a per-entry time to live.
///
/// Never fails from the caller's point of view: storage or serialization
/// problems are logged and degrade to a miss (on read) or a no-op (on write).
#[derive(Debug, Clone)]
pub struct TimedCache<S, C = SystemClock> {
    storage: S,
    clock: C,
}

impl<S: Storage> TimedCache<S> {
    /// Creates a cache that reads time from the system clock.
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: Storage, C: Clock> TimedCache<S, C> {
    /// Creates a cache with an explicit clock.
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self { storage, clock }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stores `value` under `key` for `ttl_minutes`, replacing any previous entry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl_minutes: u32) {
        let expires_at = self.clock.now() + Duration::minutes(i64::from(ttl_minutes));
        let raw = match serialize_entry(&CacheEntry::new(value, expires_at)) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%key, error = %err, "Failed to serialize cache entry");
                return;
            }
        };

        if let Err(err) = self.storage.set_item(key, &raw) {
            tracing::warn!(%key, error = %err, "Failed to write cache entry");
            return;
        }
        tracing::trace!(%key, %expires_at, "Cache entry stored");
    }

    /// Returns the value under `key` if it exists and has not expired.
    ///
    /// Expired or corrupt entries are removed before returning `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::trace!(%key, "Cache miss");
                return None;
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "Failed to read cache entry");
                return None;
            }
        };

        let entry: CacheEntry<T> = match deserialize_entry(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%key, error = %err, "Corrupt cache entry, evicting");
                self.remove(key);
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            tracing::info!(%key, expires_at = %entry.expires_at, "Cache expired");
            self.remove(key);
            return None;
        }

        tracing::trace!(%key, "Cache hit");
        Some(entry.value)
    }

    /// Evicts `key`.
    pub fn remove(&self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            tracing::warn!(%key, error = %err, "Failed to evict cache entry");
        }
    }
}
