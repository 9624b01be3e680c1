//! Optional store-wide cache of resolved secrets
//!
//! A store without caching still gets a cache: [`NoOpSecretCache`], which
//! always misses. The engine therefore never checks whether caching is on.

mod traits;
mod noop;
mod sliding;

pub use traits::{SecretCache, SharedCache};
pub use noop::NoOpSecretCache;
pub use sliding::SlidingSecretCache;
