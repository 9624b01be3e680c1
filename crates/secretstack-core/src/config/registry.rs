//! Registry of provider kinds usable from configuration files

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::file::ProviderConfig;
use crate::error::{SecretStoreError, SecretStoreResult};
use crate::providers::{EnvSecretProvider, MemorySecretProvider, SecretProvider};

/// Builds a provider from its configuration entry
pub type ProviderKindFactory =
    Arc<dyn Fn(&ProviderConfig) -> SecretStoreResult<Arc<dyn SecretProvider>> + Send + Sync>;

struct ProviderKind {
    description: String,
    factory: ProviderKindFactory,
}

static REGISTRY: Lazy<RwLock<HashMap<String, ProviderKind>>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        "env".to_string(),
        ProviderKind {
            description: "Read secrets from environment variables".to_string(),
            factory: Arc::new(|entry: &ProviderConfig| {
                if !entry.secrets.is_empty() {
                    return Err(SecretStoreError::Config(format!(
                        "Provider '{}' of kind 'env' does not accept inline secrets",
                        entry.display_name()
                    )));
                }
                Ok(Arc::new(EnvSecretProvider::new()) as Arc<dyn SecretProvider>)
            }),
        },
    );

    map.insert(
        "memory".to_string(),
        ProviderKind {
            description: "In-memory secrets, seeded from the config entry".to_string(),
            factory: Arc::new(|entry: &ProviderConfig| {
                let provider = MemorySecretProvider::with_secrets(entry.secrets.clone())?;
                Ok(Arc::new(provider) as Arc<dyn SecretProvider>)
            }),
        },
    );

    RwLock::new(map)
});

/// Register (or replace) a provider kind
///
/// # Example
///
/// ```
/// use secretstack_core::config::{has_provider_kind, register_provider_kind, ProviderConfig};
/// use secretstack_core::{MemorySecretProvider, SecretProvider};
/// use std::sync::Arc;
///
/// register_provider_kind(
///     "fixture",
///     "Empty in-memory provider",
///     Arc::new(|_: &ProviderConfig| Ok(Arc::new(MemorySecretProvider::new()) as Arc<dyn SecretProvider>)),
/// );
/// assert!(has_provider_kind("fixture"));
/// ```
pub fn register_provider_kind(name: &str, description: &str, factory: ProviderKindFactory) {
    REGISTRY.write().insert(
        name.to_string(),
        ProviderKind {
            description: description.to_string(),
            factory,
        },
    );
}

/// All registered kinds as `(name, description)`, sorted by name
pub fn list_provider_kinds() -> Vec<(String, String)> {
    let registry = REGISTRY.read();
    let mut kinds: Vec<_> = registry
        .iter()
        .map(|(name, kind)| (name.clone(), kind.description.clone()))
        .collect();
    kinds.sort();
    kinds
}

pub fn has_provider_kind(name: &str) -> bool {
    REGISTRY.read().contains_key(name)
}

/// Remove a kind; returns whether it was registered
pub fn unregister_provider_kind(name: &str) -> bool {
    REGISTRY.write().remove(name).is_some()
}

/// Instantiate the provider described by `entry`
///
/// The factory runs after the registry lock is released, so it may itself
/// register or unregister kinds.
pub(crate) fn create_provider_kind(
    entry: &ProviderConfig,
) -> SecretStoreResult<Arc<dyn SecretProvider>> {
    let factory = {
        let registry = REGISTRY.read();
        match registry.get(&entry.kind) {
            Some(kind) => Arc::clone(&kind.factory),
            None => {
                let mut known: Vec<&str> = registry.keys().map(String::as_str).collect();
                known.sort();
                return Err(SecretStoreError::Config(format!(
                    "Unknown provider kind '{}'. Known kinds: {}",
                    entry.kind,
                    known.join(", ")
                )));
            }
        }
    };
    factory(entry)
}
