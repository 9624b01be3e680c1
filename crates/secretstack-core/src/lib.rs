//! Secretstack Core
//!
//! Composable secret stores. A store is an ordered list of secret providers
//! (key vaults, environment variables, in-memory maps, other stores) behind a
//! single lookup interface, with an optional sliding-expiration cache.
//!
//! ## Resolution
//!
//! Providers are asked in registration order; the first success wins. A
//! provider that does not have the secret does not stop the chain, and
//! neither does one that raises an error: the error is kept and reported as
//! part of an `Interrupted` failure if no later provider succeeds.
//!
//! ```rust
//! use secretstack_core::{EnvSecretProvider, MemorySecretProvider, SecretStore};
//! use std::time::Duration;
//!
//! let store = SecretStore::builder()
//!     .use_caching(Duration::from_secs(300))
//!     .add_provider_with(EnvSecretProvider::new(), |options| {
//!         options.with_prefix("MYAPP_").uppercase();
//!         Ok(())
//!     })
//!     .add_provider(MemorySecretProvider::with_secrets([("log-level", "info")]).unwrap())
//!     .build()
//!     .unwrap();
//!
//! match store.get_secret("log-level").unwrap() {
//!     secret if secret.is_success() => println!("{}", secret.value().unwrap()),
//!     failure => eprintln!("{}", failure.message().unwrap()),
//! }
//! ```

pub mod error;
pub mod types;
pub mod result;
pub mod logging;
pub mod providers;
pub mod options;
pub mod registration;
pub mod cache;
pub mod store;
pub mod config;

// Re-export commonly used types
pub use error::{SecretStoreError, SecretStoreResult};

pub use types::CancellationToken;

pub use result::{
    AggregateCause, FailureKind, Secret, SecretCause, SecretFailure, SecretResult, SecretsResult,
};

pub use logging::{Logger, NoOpLogger, SharedLogger, TracingLogger};

pub use providers::{block_on, EnvSecretProvider, MemorySecretProvider, SecretProvider};

pub use options::{NameMapper, SecretOptions, SecretProviderOptions};

pub use registration::SecretProviderRegistration;

pub use cache::{NoOpSecretCache, SecretCache, SharedCache, SlidingSecretCache};

pub use store::{CompositeSecretProvider, SecretStore, SecretStoreBuilder};

pub use config::{
    has_provider_kind, list_provider_kinds, register_provider_kind, unregister_provider_kind,
    StoreConfig,
};
