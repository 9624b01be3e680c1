//! Logger backed by the `tracing` crate

use super::traits::Logger;

/// Default target used for every event emitted by the store
pub const DEFAULT_TARGET: &str = "secretstack";

/// A logger that forwards to `tracing` events
///
/// Events are emitted under [`DEFAULT_TARGET`] with a `store` field naming
/// the store, so hosts running several stores can tell them apart. Whatever
/// subscriber the host installed decides where the events go.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    store_label: String,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    /// Create a tracing logger labelled with the default store name
    pub fn new() -> Self {
        Self {
            store_label: DEFAULT_TARGET.to_string(),
        }
    }

    /// Create a tracing logger whose events carry `store = <label>`
    pub fn with_store_label(label: impl Into<String>) -> Self {
        Self {
            store_label: label.into(),
        }
    }

    pub fn store_label(&self) -> &str {
        &self.store_label
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: DEFAULT_TARGET, store = %self.store_label, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: DEFAULT_TARGET, store = %self.store_label, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: DEFAULT_TARGET, store = %self.store_label, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: DEFAULT_TARGET, store = %self.store_label, "{}", message);
    }
}
