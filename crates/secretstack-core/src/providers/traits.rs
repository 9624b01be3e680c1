//! Secret provider trait definition

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SecretStoreResult;
use crate::result::SecretResult;
use crate::types::CancellationToken;

/// Type erasure used to recover a concrete provider from a trait object
///
/// Implemented for every `'static` provider type; nothing to write by hand.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A single backing source of secrets
///
/// Implementations can be:
/// - In-memory maps (`MemorySecretProvider`)
/// - Environment variables (`EnvSecretProvider`)
/// - Another store (`SecretStore`, `CompositeSecretProvider`)
/// - Custom adapters (key vaults, vault servers, mounted files, ...)
///
/// A secret that is simply absent is reported as
/// `Ok(SecretResult::Failure(..))` with kind `NotFound`. `Err` is reserved for
/// exceptional conditions such as an unreachable backend or bad credentials.
///
/// # Example
///
/// ```
/// use secretstack_core::{SecretProvider, SecretResult, SecretStoreResult};
///
/// struct Fixed;
///
/// impl SecretProvider for Fixed {
///     fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult> {
///         if name == "greeting" {
///             SecretResult::success(name, "hello")
///         } else {
///             SecretResult::not_found(format!("'{}' is not fixed", name))
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait SecretProvider: AsAny {
    /// Look up a secret by its provider-local name
    fn get_secret(&self, name: &str) -> SecretStoreResult<SecretResult>;

    /// Async form of [`SecretProvider::get_secret`]
    ///
    /// Defers to the synchronous form by default. Natively async adapters
    /// override this and must keep both forms semantically identical.
    async fn get_secret_async(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> SecretStoreResult<SecretResult> {
        let _ = cancel;
        self.get_secret(name)
    }

    /// Whether this provider can answer at all right now
    ///
    /// Unavailable providers are skipped by the composite engine without
    /// recording a failure.
    fn is_available(&self) -> bool {
        true
    }
}

/// Recover the concrete type behind a shared provider
pub(crate) fn downcast_provider<T: SecretProvider>(
    provider: &Arc<dyn SecretProvider>,
) -> Option<Arc<T>> {
    <dyn SecretProvider as AsAny>::as_any_arc(Arc::clone(provider))
        .downcast::<T>()
        .ok()
}
