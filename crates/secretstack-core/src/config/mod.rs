//! Store configuration
//!
//! - `StoreConfig`: YAML description of a store (cache policy, ordered providers)
//! - Provider-kind registry: maps a `kind:` string to a provider factory

mod file;
mod registry;

pub use file::{CacheConfig, NameCase, ProviderConfig, StoreConfig};
pub use registry::{
    has_provider_kind, list_provider_kinds, register_provider_kind, unregister_provider_kind,
    ProviderKindFactory,
};
pub(crate) use registry::create_provider_kind;
