//! Environment variable secret provider

use std::env;

use super::traits::SecretProvider;
use crate::error::{SecretStoreError, SecretStoreResult};
use crate::result::SecretResult;

/// Secret provider that reads process environment variables
///
/// Read-only. The secret name is used verbatim as the variable name, so pair
/// it with name mappers (`with_prefix`, `uppercase`) to look up
/// `APP_DB_PASSWORD` when asked for `db_password`. An empty variable counts
/// as unset.
#[derive(Debug, Default)]
pub struct EnvSecretProvider {
    _private: (), // Prevent direct construction, use new()
}

impl EnvSecretProvider {
    /// Create a new environment variable provider
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SecretProvider for EnvSecretProvider {
    fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
        match env::var(name) {
            Ok(value) if !value.trim().is_empty() => SecretResult::success(name, value),
            Ok(_) | Err(env::VarError::NotPresent) => {
                SecretResult::not_found(format!("Environment variable '{}' is not set", name))
            }
            Err(env::VarError::NotUnicode(_)) => Err(SecretStoreError::backend(
                "env",
                format!("environment variable '{}' is not valid unicode", name),
            )),
        }
    }
}
