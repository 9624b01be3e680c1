//! YAML store configuration
//!
//! User-level config lives at `~/.config/secretstack/config.yaml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::registry::{has_provider_kind, list_provider_kinds};
use crate::error::{SecretStoreError, SecretStoreResult};

/// Configuration file structure
///
/// ```yaml
/// cache:
///   sliding_expiration_secs: 300
/// providers:
///   - kind: env
///     name: environment
///     prefix: APP_
///     case: upper
///   - kind: memory
///     name: defaults
///     secrets:
///       db-password: hunter2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Cache policy; absent means no caching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,

    /// Providers in priority order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub sliding_expiration_secs: Option<u64>,
}

/// Case folding applied after the prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    Upper,
    Lower,
}

/// One provider entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Registered provider kind (`env`, `memory`, or a custom kind)
    pub kind: String,

    /// Display name; defaults to the kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<NameCase>,

    /// Inline secrets, only meaningful for `memory`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secrets: BTreeMap<String, String>,
}

impl ProviderConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            prefix: None,
            case: None,
            secrets: BTreeMap::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }
}

impl StoreConfig {
    /// Parse and validate YAML text
    pub fn from_yaml_str(content: &str) -> SecretStoreResult<Self> {
        let config: StoreConfig = serde_yaml::from_str(content)
            .map_err(|e| SecretStoreError::Config(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the empty configuration
    pub fn load(path: impl AsRef<Path>) -> SecretStoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load the user-level configuration
    pub fn load_user() -> SecretStoreResult<Self> {
        Self::load(Self::user_path())
    }

    /// `~/.config/secretstack/config.yaml` (platform config dir)
    pub fn user_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        config_dir.join("secretstack").join("config.yaml")
    }

    /// Serialize back to YAML
    pub fn to_yaml_string(&self) -> SecretStoreResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| SecretStoreError::Config(format!("Failed to serialize YAML: {}", e)))
    }

    /// Check cache policy and provider kinds
    pub fn validate(&self) -> SecretStoreResult<()> {
        if let Some(CacheConfig {
            sliding_expiration_secs: Some(0),
        }) = self.cache
        {
            return Err(SecretStoreError::Config(
                "cache.sliding_expiration_secs must be greater than zero".to_string(),
            ));
        }

        for entry in &self.providers {
            if !has_provider_kind(&entry.kind) {
                let mut known: Vec<String> =
                    list_provider_kinds().into_iter().map(|(name, _)| name).collect();
                known.sort();
                return Err(SecretStoreError::Config(format!(
                    "Unknown provider kind '{}'. Known kinds: {}",
                    entry.kind,
                    known.join(", ")
                )));
            }
        }
        Ok(())
    }
}
