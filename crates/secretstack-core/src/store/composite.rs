//! Composite resolution engine
//!
//! Resolves one secret name against an ordered list of registrations. The
//! first provider that answers successfully wins; every other outcome is
//! collected so a miss can explain itself provider by provider.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;

use crate::cache::SharedCache;
use crate::error::{ensure_secret_name, SecretStoreError, SecretStoreResult};
use crate::logging::SharedLogger;
use crate::options::SecretOptions;
use crate::providers::{downcast_provider, SecretProvider};
use crate::registration::SecretProviderRegistration;
use crate::result::{AggregateCause, FailureKind, SecretFailure, SecretResult};
use crate::types::CancellationToken;
use crate::{log_debug, log_info, log_warn};

/// Registrations sharing one display name
enum ProviderGroup {
    Single(Arc<SecretProviderRegistration>),
    Shared(Arc<CompositeSecretProvider>),
}

/// Failures gathered while walking the provider chain for one lookup
struct Resolution<'a> {
    requested: &'a str,
    options: SecretOptions,
    failures: Vec<(String, SecretFailure)>,
    skipped: usize,
}

impl<'a> Resolution<'a> {
    fn new(requested: &'a str, options: SecretOptions) -> Self {
        Self {
            requested,
            options,
            failures: Vec::new(),
            skipped: 0,
        }
    }
}

/// An ordered aggregation of secret providers behind one provider interface
///
/// Built once from the store's registrations. At construction the
/// registrations are grouped by display name: a name used once maps to its
/// provider, a name used several times maps to a nested
/// `CompositeSecretProvider` over just those registrations. Nested groups
/// share the parent's cache and logger and are not grouped further.
pub struct CompositeSecretProvider {
    registrations: Vec<Arc<SecretProviderRegistration>>,
    groups: Vec<(String, ProviderGroup)>,
    scope: Option<String>,
    this: Weak<CompositeSecretProvider>,
    cache: SharedCache,
    logger: SharedLogger,
}

impl CompositeSecretProvider {
    /// Create the engine over `registrations`, in priority order
    pub fn new(
        registrations: Vec<SecretProviderRegistration>,
        cache: SharedCache,
        logger: SharedLogger,
    ) -> Arc<Self> {
        let registrations = registrations.into_iter().map(Arc::new).collect();
        Self::build(registrations, None, cache, logger)
    }

    fn build(
        registrations: Vec<Arc<SecretProviderRegistration>>,
        scope: Option<String>,
        cache: SharedCache,
        logger: SharedLogger,
    ) -> Arc<Self> {
        let groups = match scope {
            None => group_registrations(&registrations, &cache, &logger),
            Some(_) => Vec::new(),
        };
        Arc::new_cyclic(|this| Self {
            registrations,
            groups,
            scope,
            this: this.clone(),
            cache,
            logger,
        })
    }

    pub fn registrations(&self) -> &[Arc<SecretProviderRegistration>] {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Display names in first-registration order, each listed once
    pub fn provider_names(&self) -> Vec<&str> {
        match &self.scope {
            Some(scope) => vec![scope.as_str()],
            None => self.groups.iter().map(|(name, _)| name.as_str()).collect(),
        }
    }

    /// Resolve `name` through the provider chain, blocking on each provider
    pub fn resolve(&self, name: &str, options: &SecretOptions) -> SecretStoreResult<SecretResult> {
        ensure_secret_name(name)?;
        let mut resolution = Resolution::new(name, *options);

        for registration in &self.registrations {
            let mapped = registration.map_name(name);
            if let Some(hit) = self.cached(&resolution) {
                return Ok(hit);
            }
            let provider = registration.provider();
            if !provider.is_available() {
                self.skip(&mut resolution, registration);
                continue;
            }
            let outcome = provider.get_secret(&mapped);
            if let Some(found) = self.record(&mut resolution, registration, &mapped, outcome)? {
                return Ok(found);
            }
        }

        self.conclude(resolution)
    }

    /// Async form of [`CompositeSecretProvider::resolve`]
    ///
    /// Stops at the next provider boundary, or aborts the pending provider
    /// call, once `cancel` fires; the result is then a `Cancelled` failure.
    pub async fn resolve_async(
        &self,
        name: &str,
        options: &SecretOptions,
        cancel: &CancellationToken,
    ) -> SecretStoreResult<SecretResult> {
        ensure_secret_name(name)?;
        let mut resolution = Resolution::new(name, *options);

        for registration in &self.registrations {
            let mapped = registration.map_name(name);
            if let Some(hit) = self.cached(&resolution) {
                return Ok(hit);
            }
            let provider = registration.provider();
            if !provider.is_available() {
                self.skip(&mut resolution, registration);
                continue;
            }
            let outcome = match cancel
                .run_until_cancelled(provider.get_secret_async(&mapped, cancel))
                .await
            {
                Some(outcome) => outcome,
                None => return self.cancelled(&resolution, registration),
            };
            if let Some(found) = self.record(&mut resolution, registration, &mapped, outcome)? {
                return Ok(found);
            }
        }

        self.conclude(resolution)
    }

    /// Look up a provider (or group of providers) by display name
    ///
    /// A name shared by several registrations resolves to the nested
    /// composite for that group, so `T` must be `CompositeSecretProvider`
    /// there; anything else is reported as ambiguous.
    pub fn get_provider<T: SecretProvider>(&self, name: &str) -> SecretStoreResult<Arc<T>> {
        let provider = self.get_provider_dyn(name)?;
        if let Some(typed) = downcast_provider::<T>(&provider) {
            return Ok(typed);
        }

        let count = match (&self.scope, self.group(name)) {
            (Some(_), _) => self.registrations.len(),
            (None, Some(ProviderGroup::Shared(group))) => group.len(),
            (None, _) => 1,
        };
        if count > 1 {
            Err(SecretStoreError::AmbiguousProvider {
                name: name.to_string(),
                count,
            })
        } else {
            Err(SecretStoreError::ProviderTypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
        }
    }

    /// Look up a provider (or group of providers) by display name as a
    /// trait object
    pub fn get_provider_dyn(&self, name: &str) -> SecretStoreResult<Arc<dyn SecretProvider>> {
        if name.trim().is_empty() {
            return Err(SecretStoreError::InvalidProviderName);
        }

        if let Some(scope) = &self.scope {
            if scope != name {
                return Err(SecretStoreError::provider_not_found(name, [scope.as_str()]));
            }
            let this = self.this.upgrade().ok_or_else(|| {
                SecretStoreError::Other(format!("provider group '{}' is being dropped", scope))
            })?;
            return Ok(this);
        }

        match self.group(name) {
            Some(ProviderGroup::Single(registration)) => Ok(Arc::clone(registration.provider())),
            Some(ProviderGroup::Shared(group)) => Ok(Arc::clone(group) as Arc<dyn SecretProvider>),
            None => Err(SecretStoreError::provider_not_found(
                name,
                self.provider_names(),
            )),
        }
    }

    fn group(&self, name: &str) -> Option<&ProviderGroup> {
        self.groups
            .iter()
            .find(|(group_name, _)| group_name == name)
            .map(|(_, group)| group)
    }

    fn cached(&self, resolution: &Resolution<'_>) -> Option<SecretResult> {
        let hit = self
            .cache
            .try_get_cached_secret(resolution.requested, &resolution.options)?;
        log_debug!(self.logger, "Secret '{}' served from cache", resolution.requested);
        Some(hit)
    }

    fn skip(&self, resolution: &mut Resolution<'_>, registration: &SecretProviderRegistration) {
        resolution.skipped += 1;
        log_debug!(
            self.logger,
            "Secret provider '{}' is not available; skipping it for secret '{}'",
            registration.name(),
            resolution.requested
        );
    }

    /// Fold one provider outcome into the resolution
    ///
    /// Returns the result to hand back when the provider found the secret.
    fn record(
        &self,
        resolution: &mut Resolution<'_>,
        registration: &SecretProviderRegistration,
        mapped: &str,
        outcome: SecretStoreResult<SecretResult>,
    ) -> SecretStoreResult<Option<SecretResult>> {
        let provider_name = registration.name();
        match outcome {
            Ok(result @ SecretResult::Success(_)) => {
                self.cache
                    .update_secret_in_cache(resolution.requested, &result, &resolution.options);
                log_debug!(
                    self.logger,
                    "Secret '{}' resolved by provider '{}' as '{}'",
                    resolution.requested,
                    provider_name,
                    mapped
                );
                Ok(Some(result))
            }
            Ok(SecretResult::Failure(failure)) => {
                log_debug!(
                    self.logger,
                    "Provider '{}' did not resolve secret '{}' as '{}': {}",
                    provider_name,
                    resolution.requested,
                    mapped,
                    failure.message()
                );
                resolution.failures.push((provider_name.to_string(), failure));
                Ok(None)
            }
            Err(error) => {
                log_warn!(
                    self.logger,
                    "Provider '{}' failed while resolving secret '{}' as '{}': {}",
                    provider_name,
                    resolution.requested,
                    mapped,
                    error
                );
                let message = format!("lookup of '{}' raised an error: {}", mapped, error);
                let failure = SecretFailure::interrupted(message, Arc::new(error))?;
                resolution.failures.push((provider_name.to_string(), failure));
                Ok(None)
            }
        }
    }

    fn cancelled(
        &self,
        resolution: &Resolution<'_>,
        registration: &SecretProviderRegistration,
    ) -> SecretStoreResult<SecretResult> {
        log_info!(
            self.logger,
            "Lookup of secret '{}' cancelled while querying provider '{}'",
            resolution.requested,
            registration.name()
        );
        let failure = SecretFailure::cancelled(format!(
            "Lookup of secret '{}' was cancelled while querying provider '{}'",
            resolution.requested,
            registration.name()
        ))?;
        Ok(failure.into())
    }

    /// Build the final failure once no provider produced the secret
    fn conclude(&self, resolution: Resolution<'_>) -> SecretStoreResult<SecretResult> {
        let requested = resolution.requested;

        if self.registrations.is_empty() {
            return Ok(SecretFailure::not_found(format!(
                "No secret providers are registered; cannot resolve secret '{}'",
                requested
            ))?
            .into());
        }

        if resolution.failures.is_empty() {
            return Ok(SecretFailure::not_found(format!(
                "None of the {} registered secret providers was available to resolve secret '{}'",
                resolution.skipped, requested
            ))?
            .into());
        }

        // Interrupted outranks Cancelled, which outranks NotFound
        let has_kind = |kind: FailureKind| {
            resolution
                .failures
                .iter()
                .any(|(_, failure)| failure.kind() == kind)
        };
        let kind = if has_kind(FailureKind::Interrupted) {
            FailureKind::Interrupted
        } else if has_kind(FailureKind::Cancelled) {
            FailureKind::Cancelled
        } else {
            FailureKind::NotFound
        };

        let mut message = format!(
            "Secret '{}' could not be resolved by any registered provider:",
            requested
        );
        for (provider_name, failure) in &resolution.failures {
            message.push('\n');
            message.push_str(provider_name);
            message.push_str(": ");
            message.push_str(failure.message());
        }

        let causes = resolution
            .failures
            .iter()
            .filter_map(|(_, failure)| failure.cause().cloned())
            .collect();

        let mut failure = SecretFailure::new(kind, message)?;
        if let Some(cause) = AggregateCause::combine(causes) {
            failure = failure.with_cause(cause);
        }

        log_debug!(
            self.logger,
            "Secret '{}' not resolved ({}; {} providers tried)",
            requested,
            kind,
            resolution.failures.len()
        );
        Ok(failure.into())
    }
}

fn group_registrations(
    registrations: &[Arc<SecretProviderRegistration>],
    cache: &SharedCache,
    logger: &SharedLogger,
) -> Vec<(String, ProviderGroup)> {
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<Arc<SecretProviderRegistration>>> = HashMap::new();

    for registration in registrations {
        let name = registration.name().to_string();
        let group = members.entry(name.clone()).or_default();
        if group.is_empty() {
            order.push(name);
        }
        group.push(Arc::clone(registration));
    }

    order
        .into_iter()
        .map(|name| {
            let mut group_members = members.remove(&name).unwrap_or_default();
            let group = if group_members.len() == 1 {
                ProviderGroup::Single(group_members.remove(0))
            } else {
                ProviderGroup::Shared(CompositeSecretProvider::build(
                    group_members,
                    Some(name.clone()),
                    Arc::clone(cache),
                    Arc::clone(logger),
                ))
            };
            (name, group)
        })
        .collect()
}

#[async_trait]
impl SecretProvider for CompositeSecretProvider {
    fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
        self.resolve(name, &SecretOptions::default())
    }

    async fn get_secret_async(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> SecretStoreResult<SecretResult> {
        self.resolve_async(name, &SecretOptions::default(), cancel).await
    }

    /// Available if any member provider is available
    fn is_available(&self) -> bool {
        self.registrations
            .iter()
            .any(|registration| registration.provider().is_available())
    }
}

impl std::fmt::Debug for CompositeSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSecretProvider")
            .field("providers", &self.provider_names())
            .field("registrations", &self.registrations.len())
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{NoOpSecretCache, SlidingSecretCache};
    use crate::logging::{Logger, NoOpLogger};
    use crate::options::SecretProviderOptions;
    use crate::providers::MemorySecretProvider;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Always raises an error
    struct Broken;

    impl SecretProvider for Broken {
        fn get_secret(&self, _name: &str) -> SecretStoreResult<SecretResult> {
            Err(SecretStoreError::backend("broken", "connection refused"))
        }
    }

    /// Counts calls, answers from an inner memory provider
    struct Counting {
        inner: MemorySecretProvider,
        calls: AtomicUsize,
    }

    impl Counting {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                inner: MemorySecretProvider::with_secrets(pairs.iter().copied()).unwrap(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SecretProvider for Counting {
        fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_secret(name)
        }
    }

    struct Offline;

    impl SecretProvider for Offline {
        fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
            SecretResult::success(name, "should never be read")
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct Recording {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for Recording {
        fn debug(&self, message: &str) {
            self.lines.lock().push(format!("DEBUG {}", message));
        }
        fn info(&self, message: &str) {
            self.lines.lock().push(format!("INFO {}", message));
        }
        fn warn(&self, message: &str) {
            self.lines.lock().push(format!("WARN {}", message));
        }
        fn error(&self, message: &str) {
            self.lines.lock().push(format!("ERROR {}", message));
        }
    }

    fn registration<P: SecretProvider>(provider: P, name: &str) -> SecretProviderRegistration {
        SecretProviderRegistration::new(
            Arc::new(provider),
            SecretProviderOptions::new(name).unwrap(),
        )
    }

    fn memory(pairs: &[(&str, &str)]) -> MemorySecretProvider {
        MemorySecretProvider::with_secrets(pairs.iter().copied()).unwrap()
    }

    fn engine(registrations: Vec<SecretProviderRegistration>) -> Arc<CompositeSecretProvider> {
        CompositeSecretProvider::new(
            registrations,
            Arc::new(NoOpSecretCache::new()),
            Arc::new(NoOpLogger::new()),
        )
    }

    #[test]
    fn test_secret_found_in_any_position() {
        for position in 0..3 {
            let mut registrations = Vec::new();
            for index in 0..3 {
                let pairs: &[(&str, &str)] = if index == position { &[("key", "found")] } else { &[] };
                registrations.push(registration(memory(pairs), &format!("p{}", index)));
            }
            let result = engine(registrations)
                .resolve("key", &SecretOptions::default())
                .unwrap();
            assert_eq!(result.value().unwrap(), "found");
        }
    }

    #[test]
    fn test_first_registered_wins() {
        let first = Arc::new(Counting::new(&[("key", "first")]));
        let second = Arc::new(Counting::new(&[("key", "second")]));
        let store = engine(vec![
            SecretProviderRegistration::new(first.clone(), SecretProviderOptions::new("one").unwrap()),
            SecretProviderRegistration::new(second.clone(), SecretProviderOptions::new("two").unwrap()),
        ]);

        let result = store.resolve("key", &SecretOptions::default()).unwrap();
        assert_eq!(result.value().unwrap(), "first");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_name_fails_fast() {
        let store = engine(vec![registration(memory(&[]), "mem")]);
        assert!(matches!(
            store.resolve("  ", &SecretOptions::default()),
            Err(SecretStoreError::InvalidSecretName)
        ));
    }

    #[test]
    fn test_no_providers_registered() {
        let result = engine(Vec::new())
            .resolve("key", &SecretOptions::default())
            .unwrap();
        assert!(result.is_not_found());
        assert!(result.message().unwrap().contains("No secret providers are registered"));
    }

    #[test]
    fn test_failures_listed_per_provider() {
        let store = engine(vec![
            registration(memory(&[]), "ProviderA"),
            registration(memory(&[("X", "1")]), "ProviderB"),
        ]);

        let found = store.resolve("X", &SecretOptions::default()).unwrap();
        assert_eq!(found.name().unwrap(), "X");
        assert_eq!(found.value().unwrap(), "1");

        let missing = store.resolve("Y", &SecretOptions::default()).unwrap();
        assert!(missing.is_not_found());
        let message = missing.message().unwrap();
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("ProviderA: "));
        assert!(lines[2].starts_with("ProviderB: "));
        assert!(missing.cause().unwrap().is_none());
    }

    #[test]
    fn test_throwing_provider_does_not_stop_chain() {
        let store = engine(vec![
            registration(Broken, "broken"),
            registration(memory(&[("key", "value")]), "mem"),
        ]);

        let result = store.resolve("key", &SecretOptions::default()).unwrap();
        assert_eq!(result.value().unwrap(), "value");
    }

    #[test]
    fn test_throwing_provider_tags_interrupted() {
        let store = engine(vec![registration(Broken, "broken")]);

        let result = store.resolve("X", &SecretOptions::default()).unwrap();
        assert!(result.is_interrupted());
        let cause = result.cause().unwrap().unwrap();
        let error = cause.downcast_ref::<SecretStoreError>().unwrap();
        assert!(matches!(error, SecretStoreError::Backend { .. }));
        assert!(result.message().unwrap().contains("broken: "));
    }

    #[test]
    fn test_interrupted_wins_over_not_found_and_causes_aggregate() {
        let store = engine(vec![
            registration(Broken, "first"),
            registration(memory(&[]), "mem"),
            registration(Broken, "second"),
        ]);

        let result = store.resolve("key", &SecretOptions::default()).unwrap();
        assert!(result.is_interrupted());
        let cause = result.cause().unwrap().unwrap();
        assert_eq!(cause.downcast_ref::<AggregateCause>().unwrap().causes().len(), 2);
    }

    /// Reports its own lookup as cancelled, like a nested store driven by its own token
    struct Aborted;

    impl SecretProvider for Aborted {
        fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
            Ok(SecretFailure::cancelled(format!("lookup of '{}' was cancelled", name))?.into())
        }
    }

    #[test]
    fn test_cancelled_member_outranks_not_found() {
        let store = engine(vec![
            registration(memory(&[]), "mem"),
            registration(Aborted, "nested"),
        ]);

        let result = store.resolve("key", &SecretOptions::default()).unwrap();
        assert!(result.is_cancelled());
        assert!(result.message().unwrap().contains("nested: lookup of 'key' was cancelled"));
    }

    #[test]
    fn test_interrupted_outranks_cancelled_member() {
        let store = engine(vec![
            registration(Aborted, "nested"),
            registration(Broken, "broken"),
        ]);

        let result = store.resolve("key", &SecretOptions::default()).unwrap();
        assert!(result.is_interrupted());
    }

    #[test]
    fn test_provider_failure_is_logged_as_warning() {
        let logger = Arc::new(Recording::default());
        let store = CompositeSecretProvider::new(
            vec![registration(Broken, "broken")],
            Arc::new(NoOpSecretCache::new()),
            logger.clone(),
        );

        store.resolve("key", &SecretOptions::default()).unwrap();
        let lines = logger.lines.lock();
        assert!(lines
            .iter()
            .any(|line| line.starts_with("WARN Provider 'broken' failed")));
    }

    #[test]
    fn test_unavailable_provider_is_skipped() {
        let store = engine(vec![
            registration(Offline, "offline"),
            registration(memory(&[]), "mem"),
        ]);

        let result = store.resolve("key", &SecretOptions::default()).unwrap();
        assert!(result.is_not_found());
        let message = result.message().unwrap();
        assert!(!message.contains("offline"));
        assert!(message.contains("mem: "));
    }

    #[test]
    fn test_all_providers_unavailable() {
        let store = engine(vec![registration(Offline, "offline")]);
        let result = store.resolve("key", &SecretOptions::default()).unwrap();
        assert!(result.is_not_found());
        assert!(result.message().unwrap().contains("was available"));
        assert!(!store.is_available());
    }

    #[test]
    fn test_name_mapping_applies_per_provider() {
        let mut options = SecretProviderOptions::new("prefixed").unwrap();
        options.with_prefix("PREFIX_");
        let store = engine(vec![
            registration(memory(&[]), "plain"),
            SecretProviderRegistration::new(Arc::new(memory(&[("PREFIX_db", "pw")])), options),
        ]);

        let result = store.resolve("db", &SecretOptions::default()).unwrap();
        assert_eq!(result.value().unwrap(), "pw");
    }

    #[test]
    fn test_cache_keyed_by_requested_name() {
        let cache: SharedCache = Arc::new(SlidingSecretCache::new(Duration::from_secs(60)).unwrap());
        let backing = Arc::new(Counting::new(&[("APP_token", "v1")]));
        let mut options = SecretProviderOptions::new("counting").unwrap();
        options.with_prefix("APP_");
        let store = CompositeSecretProvider::new(
            vec![SecretProviderRegistration::new(backing.clone(), options)],
            cache.clone(),
            Arc::new(NoOpLogger::new()),
        );

        store.resolve("token", &SecretOptions::default()).unwrap();
        assert!(cache
            .try_get_cached_secret("token", &SecretOptions::default())
            .is_some());
        assert!(cache
            .try_get_cached_secret("APP_token", &SecretOptions::default())
            .is_none());

        store.resolve("token", &SecretOptions::default()).unwrap();
        assert_eq!(backing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sync_and_async_agree() {
        let store = engine(vec![
            registration(Broken, "broken"),
            registration(memory(&[]), "empty"),
            registration(memory(&[("key", "value")]), "mem"),
        ]);
        let token = CancellationToken::new();
        let options = SecretOptions::default();

        for name in ["key", "missing"] {
            let sync = store.resolve(name, &options).unwrap();
            let async_result = store.resolve_async(name, &options, &token).await.unwrap();
            assert_eq!(sync.is_success(), async_result.is_success());
            assert_eq!(sync.failure_kind(), async_result.failure_kind());
            assert_eq!(sync.message().ok(), async_result.message().ok());
            assert_eq!(sync.value().ok(), async_result.value().ok());
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_first_provider() {
        let store = engine(vec![registration(memory(&[("key", "value")]), "mem")]);
        let token = CancellationToken::new();
        token.cancel();

        let result = store
            .resolve_async("key", &SecretOptions::default(), &token)
            .await
            .unwrap();
        assert!(result.is_cancelled());
    }

    struct Hanging;

    #[async_trait]
    impl SecretProvider for Hanging {
        fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
            SecretResult::not_found(format!("{} hangs", name))
        }

        async fn get_secret_async(
            &self,
            name: &str,
            _cancel: &CancellationToken,
        ) -> SecretStoreResult<SecretResult> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            self.get_secret(name)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_pending_provider_and_rest_of_chain() {
        let after = Arc::new(Counting::new(&[("key", "value")]));
        let store = engine(vec![
            registration(Hanging, "hanging"),
            SecretProviderRegistration::new(after.clone(), SecretProviderOptions::new("after").unwrap()),
        ]);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = store
            .resolve_async("key", &SecretOptions::default(), &token)
            .await
            .unwrap();
        assert!(result.is_cancelled());
        assert!(result.message().unwrap().contains("hanging"));
        assert_eq!(after.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_groups_by_shared_name() {
        let store = engine(vec![
            registration(memory(&[("a", "1")]), "vaults"),
            registration(memory(&[]), "env"),
            registration(memory(&[("b", "2")]), "vaults"),
        ]);

        assert_eq!(store.provider_names(), vec!["vaults", "env"]);

        let group = store.get_provider::<CompositeSecretProvider>("vaults").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.get_secret("a").unwrap().value().unwrap(), "1");
        assert_eq!(group.get_secret("b").unwrap().value().unwrap(), "2");

        let single = store.get_provider::<MemorySecretProvider>("env").unwrap();
        assert!(single.is_empty());
    }

    #[test]
    fn test_get_provider_errors() {
        let store = engine(vec![
            registration(memory(&[]), "vaults"),
            registration(memory(&[]), "vaults"),
            registration(memory(&[]), "env"),
        ]);

        assert!(matches!(
            store.get_provider::<MemorySecretProvider>(""),
            Err(SecretStoreError::InvalidProviderName)
        ));

        match store.get_provider::<MemorySecretProvider>("missing") {
            Err(SecretStoreError::ProviderNotFound { known, .. }) => {
                assert!(known.contains("vaults"));
                assert!(known.contains("env"));
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }

        assert!(matches!(
            store.get_provider::<MemorySecretProvider>("vaults"),
            Err(SecretStoreError::AmbiguousProvider { count: 2, .. })
        ));

        assert!(matches!(
            store.get_provider::<CompositeSecretProvider>("env"),
            Err(SecretStoreError::ProviderTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_get_provider_on_empty_store() {
        match engine(Vec::new()).get_provider::<MemorySecretProvider>("any") {
            Err(SecretStoreError::ProviderNotFound { known, .. }) => {
                assert!(known.contains("No secret providers are registered"));
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_nested_group_returns_itself_by_name() {
        let store = engine(vec![
            registration(memory(&[]), "vaults"),
            registration(memory(&[]), "vaults"),
        ]);
        let group = store.get_provider::<CompositeSecretProvider>("vaults").unwrap();

        let again = group.get_provider::<CompositeSecretProvider>("vaults").unwrap();
        assert!(Arc::ptr_eq(&group, &again));
        assert_eq!(group.provider_names(), vec!["vaults"]);
        assert!(matches!(
            group.get_provider_dyn("env"),
            Err(SecretStoreError::ProviderNotFound { .. })
        ));
    }
}
