//! Outcome of looking up several secrets at once

use std::fmt;
use std::sync::Arc;

use super::secret_result::{Secret, SecretCause, SecretResult};
use crate::error::{SecretStoreError, SecretStoreResult};

/// Several causes collected from independent failures
#[derive(Debug, Clone)]
pub struct AggregateCause {
    causes: Vec<SecretCause>,
}

impl AggregateCause {
    pub fn new(causes: Vec<SecretCause>) -> Self {
        Self { causes }
    }

    pub fn causes(&self) -> &[SecretCause] {
        &self.causes
    }

    /// Collapse a list of causes: none, the single cause, or an aggregate
    pub fn combine(mut causes: Vec<SecretCause>) -> Option<SecretCause> {
        match causes.len() {
            0 => None,
            1 => causes.pop(),
            _ => Some(Arc::new(Self::new(causes))),
        }
    }
}

impl fmt::Display for AggregateCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors occurred", self.causes.len())?;
        for (index, cause) in self.causes.iter().enumerate() {
            write!(f, "\n  [{}] {}", index + 1, cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes
            .first()
            .map(|cause| cause.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Ordered collection of lookup outcomes
///
/// Successful iff every element succeeded.
#[derive(Debug, Clone, Default)]
pub struct SecretsResult {
    results: Vec<SecretResult>,
}

impl SecretsResult {
    pub fn new(results: Vec<SecretResult>) -> Self {
        Self { results }
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(SecretResult::is_success)
    }

    pub fn results(&self) -> &[SecretResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SecretResult> {
        self.results.iter()
    }

    /// The successfully resolved secrets, in order
    pub fn secrets(&self) -> impl Iterator<Item = &Secret> {
        self.results.iter().filter_map(|result| result.secret().ok())
    }

    /// Every failure message joined by newlines
    pub fn failure_message(&self) -> SecretStoreResult<String> {
        if self.is_success() {
            return Err(SecretStoreError::invalid_access(
                "all secrets were resolved; there is no failure message",
            ));
        }
        let messages: Vec<&str> = self
            .results
            .iter()
            .filter_map(|result| result.message().ok())
            .collect();
        Ok(messages.join("\n"))
    }

    /// Causes of the failures: none, the only one, or all of them aggregated
    pub fn failure_cause(&self) -> SecretStoreResult<Option<SecretCause>> {
        if self.is_success() {
            return Err(SecretStoreError::invalid_access(
                "all secrets were resolved; there is no failure cause",
            ));
        }
        let causes: Vec<SecretCause> = self
            .results
            .iter()
            .filter_map(|result| result.cause().ok().flatten().cloned())
            .collect();
        Ok(AggregateCause::combine(causes))
    }
}

impl FromIterator<SecretResult> for SecretsResult {
    fn from_iter<I: IntoIterator<Item = SecretResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for SecretsResult {
    type Item = SecretResult;
    type IntoIter = std::vec::IntoIter<SecretResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
