//! Shared types used across the store and its providers

mod cancellation;

pub use cancellation::CancellationToken;
