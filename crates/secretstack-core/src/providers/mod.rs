//! Secret provider contract and the in-tree providers
//!
//! - `SecretProvider` trait every backing source implements
//! - Built-in implementations: `MemorySecretProvider`, `EnvSecretProvider`
//! - `block_on` for adapters that only have an async client

mod traits;
mod compat;
mod memory;
mod env;

pub use traits::{AsAny, SecretProvider};
pub(crate) use traits::downcast_provider;
pub use compat::block_on;
pub use memory::MemorySecretProvider;
pub use env::EnvSecretProvider;
