//! Error type shared by the store, its providers and its configuration

use thiserror::Error;

/// Errors that can occur during secret store operations
///
/// Precondition violations (blank names, ambiguous lookups, reading a field
/// that the outcome does not carry) are returned to the caller. Errors raised
/// by a provider while looking up a secret never leave the composite engine;
/// they become `Interrupted` failures instead.
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Secret name must not be blank")]
    InvalidSecretName,

    #[error("Provider name must not be blank")]
    InvalidProviderName,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No secret provider named '{name}' is registered. {known}")]
    ProviderNotFound { name: String, known: String },

    #[error(
        "{count} secret providers share the name '{name}'; the requested type is ambiguous. \
         Use the general provider interface to get the sub-group"
    )]
    AmbiguousProvider { name: String, count: usize },

    #[error("Secret provider '{name}' is not of type {expected}")]
    ProviderTypeMismatch { name: String, expected: String },

    #[error("Invalid access: {0}")]
    InvalidAccess(String),

    #[error("Provider options are not attached to a secret store yet")]
    StoreNotWired,

    #[error("Provider not available: {0}")]
    NotAvailable(String),

    #[error("{provider} error: {message}")]
    Backend { provider: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Store error: {0}")]
    Other(String),
}

impl SecretStoreError {
    /// Create a backend error attributed to a provider
    pub fn backend(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an invalid access error
    pub fn invalid_access(message: impl Into<String>) -> Self {
        Self::InvalidAccess(message.into())
    }

    pub(crate) fn provider_not_found<'a>(
        name: &str,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let known: Vec<&str> = known.into_iter().collect();
        let known = if known.is_empty() {
            "No secret providers are registered.".to_string()
        } else {
            format!("Registered providers: {}", known.join(", "))
        };
        Self::ProviderNotFound {
            name: name.to_string(),
            known,
        }
    }
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Rejects blank (empty or whitespace-only) secret names
pub(crate) fn ensure_secret_name(name: &str) -> SecretStoreResult<()> {
    if name.trim().is_empty() {
        return Err(SecretStoreError::InvalidSecretName);
    }
    Ok(())
}
