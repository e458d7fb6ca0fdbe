use serde::{Deserialize, Serialize};

use crate::{EvictionPolicy, Field, FieldSet, FormatMode, Result};

/// What the load pipeline does with a record it cannot accept as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Reject the whole load with `DirectoryError::Validation`.
    Strict,
    /// Drop the offending record and keep going.
    Skip,
    /// Fill missing fields with placeholders and repair ids from the record position.
    #[default]
    AutoFix,
}

/// Settings of the filter-result cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum number of cached filter results; `None` for unbounded.
    pub limit: Option<usize>,
    pub policy: EvictionPolicy,
    /// Time-to-live of a cached result in seconds.
    pub ttl: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: Some(100),
            policy: EvictionPolicy::FIFO,
            ttl: None,
        }
    }
}

/// Configuration of a [`UserStore`](crate::UserStore) and of the compatibility functions.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```
/// use userdir_core::{DirectoryConfig, EvictionPolicy, ValidationPolicy};
///
/// let config = DirectoryConfig::from_json(
///     r#"{"validation": "strict", "cache": {"policy": "clear", "limit": 10}}"#,
/// ).unwrap();
/// assert_eq!(config.validation, ValidationPolicy::Strict);
/// assert_eq!(config.cache.policy, EvictionPolicy::Clear);
/// assert!(config.cache.enabled);
/// assert!(!config.case_sensitive);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub validation: ValidationPolicy,
    /// Fields whose absence counts as a validation failure.
    pub required_fields: FieldSet,
    /// Default case sensitivity of substring criteria.
    pub case_sensitive: bool,
    pub enable_metrics: bool,
    pub default_format: FormatMode,
    pub cache: CacheConfig,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            validation: ValidationPolicy::AutoFix,
            required_fields: Field::all(),
            case_sensitive: false,
            enable_metrics: true,
            default_format: FormatMode::Compact,
            cache: CacheConfig::default(),
        }
    }
}

impl DirectoryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_required_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.required_fields = fields.into_iter().collect();
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    pub fn with_default_format(mut self, format: FormatMode) -> Self {
        self.default_format = format;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Shorthand for a cache with the given limit and policy.
    pub fn with_cache_limit(mut self, limit: Option<usize>, policy: EvictionPolicy) -> Self {
        self.cache.limit = limit;
        self.cache.policy = policy;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache.enabled = false;
        self
    }
}
