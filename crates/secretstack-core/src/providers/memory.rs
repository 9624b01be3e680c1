//! In-memory secret provider

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::SecretProvider;
use crate::error::SecretStoreResult;
use crate::result::{Secret, SecretResult};

/// In-memory secret provider for tests, defaults and ephemeral values
///
/// Secrets are lost when the provider is dropped. Safe to share between
/// threads; readers never block each other.
///
/// # Example
///
/// ```
/// use secretstack_core::{MemorySecretProvider, SecretProvider};
///
/// let provider = MemorySecretProvider::new();
/// provider.insert("db-password", "hunter2").unwrap();
/// assert_eq!(provider.get_secret("db-password").unwrap().value().unwrap(), "hunter2");
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretProvider {
    secrets: RwLock<HashMap<String, Secret>>,
}

impl MemorySecretProvider {
    /// Create a new empty memory provider
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    /// Create a memory provider with initial name/value pairs
    pub fn with_secrets<I, K, V>(initial: I) -> SecretStoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let provider = Self::new();
        for (name, value) in initial {
            provider.insert(name, value)?;
        }
        Ok(provider)
    }

    /// Store or replace a secret value
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) -> SecretStoreResult<()> {
        self.insert_secret(Secret::new(name, value)?);
        Ok(())
    }

    /// Store or replace a fully formed secret (version, expiration)
    pub fn insert_secret(&self, secret: Secret) {
        self.secrets.write().insert(secret.name().to_string(), secret);
    }

    /// Remove a secret, returning whether it existed
    pub fn remove(&self, name: &str) -> bool {
        self.secrets.write().remove(name).is_some()
    }

    /// Clear all secrets from the provider
    pub fn clear(&self) {
        self.secrets.write().clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.secrets.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretProvider for MemorySecretProvider {
    fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
        match self.secrets.read().get(name) {
            Some(secret) => Ok(SecretResult::Success(secret.clone())),
            None => SecretResult::not_found(format!("Secret '{}' is not in memory", name)),
        }
    }
}

impl Clone for MemorySecretProvider {
    fn clone(&self) -> Self {
        Self {
            secrets: RwLock::new(self.secrets.read().clone()),
        }
    }
}
