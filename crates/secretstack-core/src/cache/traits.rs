//! Cache contract shared by every registration of a store

use std::sync::Arc;
use std::time::Duration;

use crate::options::SecretOptions;
use crate::result::SecretResult;

/// Store-wide cache of successful lookups, keyed by the requested name
///
/// Implementations do their own locking; the composite engine calls them
/// from any number of threads without extra synchronization.
pub trait SecretCache: Send + Sync {
    /// Cached result for `name`, if any and if `options` allow reading
    fn try_get_cached_secret(&self, name: &str, options: &SecretOptions) -> Option<SecretResult>;

    /// Remember `result` under `name`
    ///
    /// Failures are never stored, and nothing is stored when `options`
    /// opt out of the cache.
    fn update_secret_in_cache(&self, name: &str, result: &SecretResult, options: &SecretOptions);

    /// Drop the entry for `name` whether or not it has expired
    fn invalidate_secret(&self, name: &str);

    /// Drop every entry
    fn clear(&self);

    /// Sliding expiration, `None` when caching is disabled
    fn sliding_expiration(&self) -> Option<Duration> {
        None
    }
}

/// The one cache instance a store hands to all of its registrations
pub type SharedCache = Arc<dyn SecretCache>;
