//! Core configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! propagation_queue_capacity = 1024
//! max_delivery_attempts = 3
//! retry_backoff_ms = 50
//! log_filter = "info,seo_core=debug"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`CoreConfig::log_filter`]
pub const LOG_ENV: &str = "SEO_LOG";

/// Core configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Bounded capacity of the change queue
    pub propagation_queue_capacity: usize,
    /// Deliveries tried per change before it is dropped
    pub max_delivery_attempts: u32,
    /// Base delay between deliveries (multiplied by attempt number)
    pub retry_backoff_ms: u64,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl CoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With queue capacity
    #[inline]
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.propagation_queue_capacity = capacity;
        self
    }

    /// With delivery attempts
    #[inline]
    #[must_use]
    pub fn with_max_delivery_attempts(mut self, attempts: u32) -> Self {
        self.max_delivery_attempts = attempts;
        self
    }

    /// With retry backoff
    #[inline]
    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Retry backoff as a duration
    #[inline]
    #[must_use]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` or `ConfigError::Invalid`.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, then apply environment overrides
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`CoreConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?.with_env_overrides();
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply `SEO_LOG` if set
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(filter) = std::env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                self.log_filter = filter;
            }
        }
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.propagation_queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "propagation_queue_capacity must be greater than zero".to_string(),
            ));
        }
        if self.max_delivery_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_delivery_attempts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns `ConfigError::Serialize` if rendering fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            propagation_queue_capacity: 1024,
            max_delivery_attempts: 3,
            retry_backoff_ms: 50,
            log_filter: "info".to_string(),
        }
    }
}
