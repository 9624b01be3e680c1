//! Sliding-expiration cache

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use super::traits::SecretCache;
use crate::error::{SecretStoreError, SecretStoreResult};
use crate::options::SecretOptions;
use crate::result::SecretResult;

#[derive(Debug, Clone)]
struct CacheEntry {
    result: SecretResult,
    last_access: Instant,
}

impl CacheEntry {
    fn is_stale(&self, now: Instant, sliding_expiration: Duration) -> bool {
        now.duration_since(self.last_access) >= sliding_expiration
            || self
                .result
                .secret()
                .map(|secret| secret.is_expired())
                .unwrap_or(true)
    }
}

/// Cache whose entries live until they go unread for the sliding duration
///
/// Every hit restarts the entry's clock. A secret that carries its own
/// expiration timestamp is also dropped once that timestamp passes. Stale
/// entries are removed lazily when looked up, or eagerly via
/// [`SlidingSecretCache::purge_expired`].
#[derive(Debug)]
pub struct SlidingSecretCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    sliding_expiration: Duration,
}

impl SlidingSecretCache {
    /// Create a cache with the given sliding expiration (must be non-zero)
    pub fn new(sliding_expiration: Duration) -> SecretStoreResult<Self> {
        if sliding_expiration.is_zero() {
            return Err(SecretStoreError::InvalidArgument(
                "sliding expiration must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            sliding_expiration,
        })
    }

    /// Number of entries held, including stale ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every stale entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_stale(now, self.sliding_expiration));
        before - entries.len()
    }
}

impl SecretCache for SlidingSecretCache {
    fn try_get_cached_secret(&self, name: &str, options: &SecretOptions) -> Option<SecretResult> {
        if !options.use_cache {
            return None;
        }

        let now = Instant::now();
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(name)?;
        if entry.is_stale(now, self.sliding_expiration) {
            entries.remove(name);
            return None;
        }
        entry.last_access = now;
        Some(entry.result.clone())
    }

    fn update_secret_in_cache(&self, name: &str, result: &SecretResult, options: &SecretOptions) {
        if !options.use_cache || !result.is_success() {
            return;
        }
        self.entries.lock().insert(
            name.to_string(),
            CacheEntry {
                result: result.clone(),
                last_access: Instant::now(),
            },
        );
    }

    fn invalidate_secret(&self, name: &str) {
        self.entries.lock().remove(name);
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }

    fn sliding_expiration(&self) -> Option<Duration> {
        Some(self.sliding_expiration)
    }
}
