//! Outcome of a single secret lookup

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{SecretStoreError, SecretStoreResult};

/// Underlying cause attached to a failed lookup
pub type SecretCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Why a lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No source had the secret
    NotFound,
    /// At least one source raised an error while looking it up
    Interrupted,
    /// The caller cancelled the lookup before a source answered
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A resolved secret
///
/// The `Debug` output never contains the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    name: String,
    value: String,
    version: Option<String>,
    expires_at: Option<SystemTime>,
}

impl Secret {
    /// Create a secret that never expires
    ///
    /// Both the name and the value must be non-blank.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> SecretStoreResult<Self> {
        let name = name.into();
        let value = value.into();
        if name.trim().is_empty() {
            return Err(SecretStoreError::InvalidSecretName);
        }
        if value.trim().is_empty() {
            return Err(SecretStoreError::InvalidArgument(format!(
                "value of secret '{}' must not be blank",
                name
            )));
        }
        Ok(Self {
            name,
            value,
            version: None,
            expires_at: None,
        })
    }

    /// Set the version token
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the expiration timestamp
    pub fn with_expiration(mut self, expires_at: SystemTime) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Expiration timestamp, `None` meaning the secret never expires
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|at| SystemTime::now() >= at)
            .unwrap_or(false)
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("value", &format!("[REDACTED, {} bytes]", self.value.len()))
            .field("version", &self.version)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A failed lookup: a non-blank message, an optional cause and its kind
#[derive(Clone)]
pub struct SecretFailure {
    message: String,
    cause: Option<SecretCause>,
    kind: FailureKind,
}

impl SecretFailure {
    /// Create a failure of the given kind
    pub fn new(kind: FailureKind, message: impl Into<String>) -> SecretStoreResult<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(SecretStoreError::InvalidArgument(
                "failure message must not be blank".to_string(),
            ));
        }
        Ok(Self {
            message,
            cause: None,
            kind,
        })
    }

    pub fn not_found(message: impl Into<String>) -> SecretStoreResult<Self> {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn interrupted(message: impl Into<String>, cause: SecretCause) -> SecretStoreResult<Self> {
        Ok(Self::new(FailureKind::Interrupted, message)?.with_cause(cause))
    }

    pub fn cancelled(message: impl Into<String>) -> SecretStoreResult<Self> {
        Self::new(FailureKind::Cancelled, message)
    }

    /// Attach an underlying cause
    pub fn with_cause(mut self, cause: SecretCause) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&SecretCause> {
        self.cause.as_ref()
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

impl fmt::Debug for SecretFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretFailure")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

/// Outcome of looking up one secret
///
/// The typed accessors (`value`, `message`, ...) return
/// `SecretStoreError::InvalidAccess` when asked for data the outcome does not
/// carry, e.g. the value of a failure.
#[derive(Debug, Clone)]
pub enum SecretResult {
    Success(Secret),
    Failure(SecretFailure),
}

impl SecretResult {
    /// Successful outcome for `name` with `value`
    pub fn success(name: impl Into<String>, value: impl Into<String>) -> SecretStoreResult<Self> {
        Ok(Self::Success(Secret::new(name, value)?))
    }

    /// Not-found outcome with `message`
    pub fn not_found(message: impl Into<String>) -> SecretStoreResult<Self> {
        Ok(Self::Failure(SecretFailure::not_found(message)?))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn is_not_found(&self) -> bool {
        self.failure_kind() == Some(FailureKind::NotFound)
    }

    pub fn is_interrupted(&self) -> bool {
        self.failure_kind() == Some(FailureKind::Interrupted)
    }

    pub fn is_cancelled(&self) -> bool {
        self.failure_kind() == Some(FailureKind::Cancelled)
    }

    /// Kind of failure, `None` on success
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn secret(&self) -> SecretStoreResult<&Secret> {
        match self {
            Self::Success(secret) => Ok(secret),
            Self::Failure(failure) => Err(SecretStoreError::invalid_access(format!(
                "cannot read the secret of a failed lookup: {}",
                failure.message
            ))),
        }
    }

    pub fn failure(&self) -> SecretStoreResult<&SecretFailure> {
        match self {
            Self::Failure(failure) => Ok(failure),
            Self::Success(secret) => Err(SecretStoreError::invalid_access(format!(
                "lookup of secret '{}' succeeded and has no failure",
                secret.name
            ))),
        }
    }

    pub fn name(&self) -> SecretStoreResult<&str> {
        self.secret().map(Secret::name)
    }

    pub fn value(&self) -> SecretStoreResult<&str> {
        self.secret().map(Secret::value)
    }

    pub fn version(&self) -> SecretStoreResult<Option<&str>> {
        self.secret().map(Secret::version)
    }

    pub fn expires_at(&self) -> SecretStoreResult<Option<SystemTime>> {
        self.secret().map(Secret::expires_at)
    }

    pub fn message(&self) -> SecretStoreResult<&str> {
        self.failure().map(SecretFailure::message)
    }

    pub fn cause(&self) -> SecretStoreResult<Option<&SecretCause>> {
        self.failure().map(SecretFailure::cause)
    }

    /// Take the secret out, failing for an unsuccessful lookup
    pub fn into_secret(self) -> SecretStoreResult<Secret> {
        match self {
            Self::Success(secret) => Ok(secret),
            Self::Failure(failure) => Err(SecretStoreError::invalid_access(format!(
                "cannot read the secret of a failed lookup: {}",
                failure.message
            ))),
        }
    }

    pub fn into_value(self) -> SecretStoreResult<String> {
        self.into_secret().map(Secret::into_value)
    }
}

impl From<Secret> for SecretResult {
    fn from(secret: Secret) -> Self {
        Self::Success(secret)
    }
}

impl From<SecretFailure> for SecretResult {
    fn from(failure: SecretFailure) -> Self {
        Self::Failure(failure)
    }
}

impl TryFrom<SecretResult> for String {
    type Error = SecretStoreError;

    fn try_from(result: SecretResult) -> Result<Self, Self::Error> {
        result.into_value()
    }
}
