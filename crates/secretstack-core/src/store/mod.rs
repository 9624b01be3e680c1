//! Store composition
//!
//! - [`CompositeSecretProvider`]: the ordered resolution engine
//! - [`SecretStore`]: the public facade
//! - [`SecretStoreBuilder`]: registration and materialization

mod builder;
mod composite;
mod secret_store;

pub use builder::SecretStoreBuilder;
pub use composite::CompositeSecretProvider;
pub use secret_store::SecretStore;
