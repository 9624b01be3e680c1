//! Public facade over the composite engine

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::builder::SecretStoreBuilder;
use super::composite::CompositeSecretProvider;
use crate::error::{ensure_secret_name, SecretStoreResult};
use crate::options::SecretOptions;
use crate::providers::SecretProvider;
use crate::result::{SecretResult, SecretsResult};
use crate::types::CancellationToken;

/// A materialized secret store
///
/// Cheap to clone; clones share the providers and the cache.
///
/// # Example
///
/// ```
/// use secretstack_core::{MemorySecretProvider, SecretOptions, SecretStore};
/// use std::time::Duration;
///
/// let defaults = MemorySecretProvider::with_secrets([("db-password", "hunter2")]).unwrap();
///
/// let store = SecretStore::builder()
///     .use_caching(Duration::from_secs(300))
///     .add_provider_with(MemorySecretProvider::new(), |options| {
///         options.set_provider_name("overrides")?;
///         Ok(())
///     })
///     .add_provider(defaults)
///     .build()
///     .unwrap();
///
/// let result = store.get_secret("db-password").unwrap();
/// assert_eq!(result.value().unwrap(), "hunter2");
///
/// let fresh = store
///     .get_secret_with("db-password", &SecretOptions::new().without_cache())
///     .unwrap();
/// assert!(fresh.is_success());
/// ```
#[derive(Clone)]
pub struct SecretStore {
    engine: Arc<CompositeSecretProvider>,
}

impl SecretStore {
    /// Start configuring a new store
    pub fn builder() -> SecretStoreBuilder {
        SecretStoreBuilder::new()
    }

    pub(crate) fn from_engine(engine: Arc<CompositeSecretProvider>) -> Self {
        Self { engine }
    }

    /// The underlying composite engine
    pub fn engine(&self) -> &Arc<CompositeSecretProvider> {
        &self.engine
    }

    /// Resolve a secret with default options
    ///
    /// `Err` only for a blank name; a secret nobody has is an
    /// `Ok(SecretResult::Failure(..))`.
    pub fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
        self.engine.resolve(name, &SecretOptions::default())
    }

    /// Resolve a secret with per-call options
    pub fn get_secret_with(
        &self,
        name: &str,
        options: &SecretOptions,
    ) -> SecretStoreResult<SecretResult> {
        self.engine.resolve(name, options)
    }

    /// Resolve a secret asynchronously with default options
    pub async fn get_secret_async(&self, name: &str) -> SecretStoreResult<SecretResult> {
        self.engine
            .resolve_async(name, &SecretOptions::default(), &CancellationToken::new())
            .await
    }

    /// Resolve a secret asynchronously with per-call options and a
    /// cancellation token
    pub async fn get_secret_async_with(
        &self,
        name: &str,
        options: &SecretOptions,
        cancel: &CancellationToken,
    ) -> SecretStoreResult<SecretResult> {
        self.engine.resolve_async(name, options, cancel).await
    }

    /// Resolve several secrets, one after another
    ///
    /// Every name is validated before any provider is queried.
    pub fn get_secrets<I, S>(&self, names: I) -> SecretStoreResult<SecretsResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<S> = names.into_iter().collect();
        for name in &names {
            ensure_secret_name(name.as_ref())?;
        }
        names
            .iter()
            .map(|name| self.get_secret(name.as_ref()))
            .collect::<SecretStoreResult<Vec<_>>>()
            .map(SecretsResult::new)
    }

    /// Async form of [`SecretStore::get_secrets`]
    pub async fn get_secrets_async<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> SecretStoreResult<SecretsResult> {
        for name in names {
            ensure_secret_name(name.as_ref())?;
        }
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            results.push(self.get_secret_async(name.as_ref()).await?);
        }
        Ok(SecretsResult::new(results))
    }

    /// Look up a registered provider (or same-named group) by display name
    pub fn get_provider<T: SecretProvider>(&self, name: &str) -> SecretStoreResult<Arc<T>> {
        self.engine.get_provider::<T>(name)
    }

    /// Look up a registered provider (or same-named group) as a trait object
    pub fn get_provider_dyn(&self, name: &str) -> SecretStoreResult<Arc<dyn SecretProvider>> {
        self.engine.get_provider_dyn(name)
    }

    /// Display names of the registered providers, in registration order
    pub fn provider_names(&self) -> Vec<&str> {
        self.engine.provider_names()
    }

    /// Drop the cached value for `name`
    pub fn invalidate_secret(&self, name: &str) -> SecretStoreResult<()> {
        ensure_secret_name(name)?;
        self.engine.cache().invalidate_secret(name);
        Ok(())
    }

    /// Async form of [`SecretStore::invalidate_secret`]
    pub async fn invalidate_secret_async(&self, name: &str) -> SecretStoreResult<()> {
        self.invalidate_secret(name)
    }

    /// Drop every cached value
    pub fn clear_cache(&self) {
        self.engine.cache().clear();
    }

    /// Sliding expiration of the cache, `None` when caching is off
    pub fn cache_expiration(&self) -> Option<Duration> {
        self.engine.cache().sliding_expiration()
    }
}

#[async_trait]
impl SecretProvider for SecretStore {
    fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
        SecretStore::get_secret(self, name)
    }

    async fn get_secret_async(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> SecretStoreResult<SecretResult> {
        self.get_secret_async_with(name, &SecretOptions::default(), cancel)
            .await
    }

    fn is_available(&self) -> bool {
        self.engine.is_available()
    }
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStore")
            .field("providers", &self.provider_names())
            .field("cache_expiration", &self.cache_expiration())
            .finish()
    }
}
