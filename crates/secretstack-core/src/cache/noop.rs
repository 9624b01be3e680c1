//! Cache used when caching is not enabled

use super::traits::SecretCache;
use crate::options::SecretOptions;
use crate::result::SecretResult;

/// A cache that always misses and never retains anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSecretCache;

impl NoOpSecretCache {
    pub fn new() -> Self {
        Self
    }
}

impl SecretCache for NoOpSecretCache {
    fn try_get_cached_secret(&self, _name: &str, _options: &SecretOptions) -> Option<SecretResult> {
        None
    }

    fn update_secret_in_cache(&self, _name: &str, _result: &SecretResult, _options: &SecretOptions) {}

    fn invalidate_secret(&self, _name: &str) {}

    fn clear(&self) {}
}
