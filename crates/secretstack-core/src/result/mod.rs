//! Lookup outcome value types

mod secret_result;
mod secrets_result;

pub use secret_result::{FailureKind, Secret, SecretCause, SecretFailure, SecretResult};
pub use secrets_result::{AggregateCause, SecretsResult};
