//! A provider paired with its options

use std::fmt;
use std::sync::Arc;

use crate::options::SecretProviderOptions;
use crate::providers::SecretProvider;

/// One entry in a store's ordered provider list
///
/// Owns its provider: when the last registration (and with it the store) is
/// dropped, the provider is dropped and its `Drop` releases whatever it holds.
pub struct SecretProviderRegistration {
    provider: Arc<dyn SecretProvider>,
    options: SecretProviderOptions,
}

impl SecretProviderRegistration {
    pub fn new(provider: Arc<dyn SecretProvider>, options: SecretProviderOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &Arc<dyn SecretProvider> {
        &self.provider
    }

    pub fn options(&self) -> &SecretProviderOptions {
        &self.options
    }

    /// Display name of the registration
    pub fn name(&self) -> &str {
        self.options.provider_name()
    }

    /// Provider-local name for a requested secret
    pub fn map_name(&self, name: &str) -> String {
        self.options.map_name(name)
    }
}

impl fmt::Debug for SecretProviderRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretProviderRegistration")
            .field("options", &self.options)
            .finish()
    }
}
