//! Per-call lookup options and per-registration provider options

use std::fmt;
use std::sync::Arc;

use crate::cache::SharedCache;
use crate::error::{SecretStoreError, SecretStoreResult};

/// Options for a single lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretOptions {
    /// Read from and write to the store cache for this call (default: true)
    pub use_cache: bool,
}

impl Default for SecretOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

impl SecretOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass the cache for this call only
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}

/// A rewrite applied to a secret name before a provider sees it
pub type NameMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Configuration attached to one provider registration
///
/// # Example
///
/// ```
/// use secretstack_core::SecretProviderOptions;
///
/// let mut options = SecretProviderOptions::new("environment").unwrap();
/// options.with_prefix("app_").uppercase();
/// assert_eq!(options.map_name("db_password"), "APP_DB_PASSWORD");
/// ```
#[derive(Clone)]
pub struct SecretProviderOptions {
    provider_name: String,
    mappers: Vec<NameMapper>,
    cache: Option<SharedCache>,
}

impl SecretProviderOptions {
    /// Options with an explicit display name (must be non-blank)
    pub fn new(provider_name: impl Into<String>) -> SecretStoreResult<Self> {
        let provider_name = provider_name.into();
        if provider_name.trim().is_empty() {
            return Err(SecretStoreError::InvalidProviderName);
        }
        Ok(Self {
            provider_name,
            mappers: Vec::new(),
            cache: None,
        })
    }

    /// Options named after the provider type `P`
    pub fn for_type<P: ?Sized>() -> Self {
        Self {
            provider_name: short_type_name::<P>().to_string(),
            mappers: Vec::new(),
            cache: None,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Rename the provider; blank names are rejected
    pub fn set_provider_name(&mut self, name: impl Into<String>) -> SecretStoreResult<&mut Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SecretStoreError::InvalidProviderName);
        }
        self.provider_name = name;
        Ok(self)
    }

    /// Append a name rewrite; rewrites apply in the order they were added
    pub fn map_secret_name<F>(&mut self, mapper: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.mappers.push(Arc::new(mapper));
        self
    }

    /// Append a rewrite that prepends `prefix`
    pub fn with_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        let prefix = prefix.into();
        self.map_secret_name(move |name| format!("{}{}", prefix, name))
    }

    /// Append a rewrite that upper-cases the name
    pub fn uppercase(&mut self) -> &mut Self {
        self.map_secret_name(|name| name.to_uppercase())
    }

    /// Append a rewrite that lower-cases the name
    pub fn lowercase(&mut self) -> &mut Self {
        self.map_secret_name(|name| name.to_lowercase())
    }

    /// Apply every rewrite, left to right
    pub fn map_name(&self, name: &str) -> String {
        self.mappers
            .iter()
            .fold(name.to_string(), |current, mapper| mapper(&current))
    }

    pub fn mapper_count(&self) -> usize {
        self.mappers.len()
    }

    /// The owning store's cache
    ///
    /// Fails with `StoreNotWired` until the options are registered with a
    /// store builder.
    pub fn cache(&self) -> SecretStoreResult<&SharedCache> {
        self.cache.as_ref().ok_or(SecretStoreError::StoreNotWired)
    }

    pub(crate) fn attach_cache(&mut self, cache: SharedCache) {
        self.cache = Some(cache);
    }
}

impl fmt::Debug for SecretProviderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretProviderOptions")
            .field("provider_name", &self.provider_name)
            .field("mappers", &self.mappers.len())
            .field("cache_attached", &self.cache.is_some())
            .finish()
    }
}

/// Last path segment of a type name, generics stripped
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoOpSecretCache;
    use crate::providers::MemorySecretProvider;

    #[test]
    fn test_secret_options_default_uses_cache() {
        assert!(SecretOptions::default().use_cache);
        assert!(!SecretOptions::new().without_cache().use_cache);
        assert!(SecretOptions::new().without_cache().with_cache(true).use_cache);
    }

    #[test]
    fn test_blank_provider_name_rejected() {
        assert!(matches!(
            SecretProviderOptions::new(" "),
            Err(SecretStoreError::InvalidProviderName)
        ));

        let mut options = SecretProviderOptions::new("vault").unwrap();
        assert!(options.set_provider_name("").is_err());
        assert_eq!(options.provider_name(), "vault");
    }

    #[test]
    fn test_type_name_default() {
        let options = SecretProviderOptions::for_type::<MemorySecretProvider>();
        assert_eq!(options.provider_name(), "MemorySecretProvider");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_mappers_chain_left_to_right() {
        let mut options = SecretProviderOptions::new("env").unwrap();
        options
            .map_secret_name(|name| name.replace('-', "_"))
            .with_prefix("app_")
            .uppercase();

        assert_eq!(options.mapper_count(), 3);
        assert_eq!(options.map_name("db-password"), "APP_DB_PASSWORD");
    }

    #[test]
    fn test_no_mappers_is_identity() {
        let options = SecretProviderOptions::new("env").unwrap();
        assert_eq!(options.map_name("Mixed-Case"), "Mixed-Case");
    }

    #[test]
    fn test_cache_requires_wiring() {
        let mut options = SecretProviderOptions::new("env").unwrap();
        assert!(matches!(options.cache(), Err(SecretStoreError::StoreNotWired)));

        options.attach_cache(Arc::new(NoOpSecretCache::new()));
        assert!(options.cache().is_ok());
    }
}
