//! Fluent builder for [`SecretStore`]

use std::sync::Arc;
use std::time::Duration;

use super::composite::CompositeSecretProvider;
use super::secret_store::SecretStore;
use crate::cache::{NoOpSecretCache, SharedCache, SlidingSecretCache};
use crate::config::{create_provider_kind, NameCase, StoreConfig};
use crate::error::SecretStoreResult;
use crate::log_debug;
use crate::logging::{SharedLogger, TracingLogger};
use crate::options::SecretProviderOptions;
use crate::providers::SecretProvider;
use crate::registration::SecretProviderRegistration;

/// Deferred registration, run once the store cache exists
type RegistrationFactory =
    Box<dyn FnOnce(&SharedCache) -> SecretStoreResult<SecretProviderRegistration> + Send>;

/// Collects provider registrations and materializes a [`SecretStore`]
///
/// Registration order is lookup priority. Configuration closures run during
/// [`SecretStoreBuilder::build`], after the cache has been created, so every
/// closure sees options with the cache already attached. `build` consumes the
/// builder, so a store is materialized at most once per builder.
pub struct SecretStoreBuilder {
    entries: Vec<RegistrationFactory>,
    sliding_expiration: Option<Duration>,
    logger: SharedLogger,
}

impl Default for SecretStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStoreBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            sliding_expiration: None,
            logger: Arc::new(TracingLogger::new()),
        }
    }

    /// Register a provider under its type name
    pub fn add_provider<P>(self, provider: P) -> Self
    where
        P: SecretProvider + 'static,
    {
        self.add_provider_with(provider, |_| Ok(()))
    }

    /// Register a provider and adjust its options
    pub fn add_provider_with<P, C>(self, provider: P, configure: C) -> Self
    where
        P: SecretProvider + 'static,
        C: FnOnce(&mut SecretProviderOptions) -> SecretStoreResult<()> + Send + 'static,
    {
        let options = SecretProviderOptions::for_type::<P>();
        self.push(Arc::new(provider), Ok(options), configure)
    }

    /// Register a provider that is constructed from its finished options
    ///
    /// `factory` runs during `build` and receives the options after
    /// `configure` has been applied and the store cache attached.
    pub fn add_provider_factory<P, C, F>(
        mut self,
        default_name: impl Into<String>,
        configure: C,
        factory: F,
    ) -> Self
    where
        P: SecretProvider + 'static,
        C: FnOnce(&mut SecretProviderOptions) -> SecretStoreResult<()> + Send + 'static,
        F: FnOnce(&SecretProviderOptions) -> SecretStoreResult<P> + Send + 'static,
    {
        let options = SecretProviderOptions::new(default_name);
        self.entries.push(Box::new(move |cache: &SharedCache| {
            let mut options = options?;
            options.attach_cache(Arc::clone(cache));
            configure(&mut options)?;
            let provider = factory(&options)?;
            Ok(SecretProviderRegistration::new(Arc::new(provider), options))
        }));
        self
    }

    /// Register an already shared provider under an explicit name
    pub fn add_shared_provider(
        self,
        provider: Arc<dyn SecretProvider>,
        name: impl Into<String>,
    ) -> Self {
        let options = SecretProviderOptions::new(name);
        self.push(provider, options, |_| Ok(()))
    }

    /// Register an already shared provider and adjust its options
    pub fn add_shared_provider_with<C>(
        self,
        provider: Arc<dyn SecretProvider>,
        name: impl Into<String>,
        configure: C,
    ) -> Self
    where
        C: FnOnce(&mut SecretProviderOptions) -> SecretStoreResult<()> + Send + 'static,
    {
        let options = SecretProviderOptions::new(name);
        self.push(provider, options, configure)
    }

    /// Enable the store cache with the given sliding expiration
    ///
    /// A zero duration is rejected when the store is built.
    pub fn use_caching(mut self, sliding_expiration: Duration) -> Self {
        self.sliding_expiration = Some(sliding_expiration);
        self
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Number of registrations collected so far
    pub fn provider_count(&self) -> usize {
        self.entries.len()
    }

    /// Builder preloaded from a parsed configuration file
    pub fn from_config(config: &StoreConfig) -> SecretStoreResult<Self> {
        config.validate()?;

        let mut builder = Self::new();
        if let Some(secs) = config.cache.as_ref().and_then(|c| c.sliding_expiration_secs) {
            builder = builder.use_caching(Duration::from_secs(secs));
        }

        for entry in &config.providers {
            let provider = create_provider_kind(entry)?;
            let prefix = entry.prefix.clone();
            let case = entry.case;
            builder = builder.add_shared_provider_with(provider, entry.display_name(), move |options| {
                if let Some(prefix) = prefix {
                    options.with_prefix(prefix);
                }
                match case {
                    Some(NameCase::Upper) => {
                        options.uppercase();
                    }
                    Some(NameCase::Lower) => {
                        options.lowercase();
                    }
                    None => {}
                }
                Ok(())
            });
        }
        Ok(builder)
    }

    /// Materialize the store
    ///
    /// Fails if a configuration closure or factory fails, a provider name is
    /// blank, or the cache duration is zero.
    pub fn build(self) -> SecretStoreResult<SecretStore> {
        let cache: SharedCache = match self.sliding_expiration {
            Some(duration) => Arc::new(SlidingSecretCache::new(duration)?),
            None => Arc::new(NoOpSecretCache::new()),
        };

        let registrations = self
            .entries
            .into_iter()
            .map(|entry| entry(&cache))
            .collect::<SecretStoreResult<Vec<_>>>()?;

        log_debug!(
            self.logger,
            "Building secret store with {} provider(s), caching {}",
            registrations.len(),
            if self.sliding_expiration.is_some() { "on" } else { "off" }
        );

        let engine = CompositeSecretProvider::new(registrations, cache, self.logger);
        Ok(SecretStore::from_engine(engine))
    }

    fn push<C>(
        mut self,
        provider: Arc<dyn SecretProvider>,
        options: SecretStoreResult<SecretProviderOptions>,
        configure: C,
    ) -> Self
    where
        C: FnOnce(&mut SecretProviderOptions) -> SecretStoreResult<()> + Send + 'static,
    {
        self.entries.push(Box::new(move |cache: &SharedCache| {
            let mut options = options?;
            options.attach_cache(Arc::clone(cache));
            configure(&mut options)?;
            Ok(SecretProviderRegistration::new(provider, options))
        }));
        self
    }
}

impl std::fmt::Debug for SecretStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretStoreBuilder")
            .field("providers", &self.entries.len())
            .field("sliding_expiration", &self.sliding_expiration)
            .finish()
    }
}
